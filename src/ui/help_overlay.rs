//! Help overlay listing the key bindings of each view

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

/// Key bindings grouped by the view they apply to
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Restaurant list",
        &[
            ("↑/k ↓/j", "Move selection"),
            ("Enter", "Open restaurant"),
            ("c", "Next cuisine filter"),
            ("n", "Next neighborhood filter"),
            ("f", "Toggle favourite"),
            ("r", "Refresh from backend"),
        ],
    ),
    (
        "Restaurant details",
        &[
            ("↑/k ↓/j", "Scroll"),
            ("g", "Back to top"),
            ("f", "Toggle favourite"),
            ("w", "Write a review"),
            ("Esc", "Back to list"),
        ],
    ),
    (
        "Review form",
        &[
            ("Tab", "Next field"),
            ("Enter", "Submit"),
            ("Esc", "Cancel"),
        ],
    ),
    (
        "List and details",
        &[
            ("s", "Post saved reviews"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    let area = frame.area();
    let height = (lines.len() as u16 + 3).min(area.height);
    let overlay_area = centered_rect(52.min(area.width), height, area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(Paragraph::new(lines), rows[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Esc or ? closes",
            Style::default().fg(Color::DarkGray),
        )),
        rows[1],
    );
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, (title, bindings)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            *title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.extend(bindings.iter().map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!(" {:>9}  ", key), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        }));
    }
    lines
}
