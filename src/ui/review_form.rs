//! Review form overlay
//!
//! Renders a centered form over the detail view for writing a review.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::{App, DraftField};

/// Renders the review form on top of the current view
pub fn render<A>(frame: &mut Frame, app: &App<A>) {
    let area = frame.area();
    let overlay_area = centered_rect(60.min(area.width), 14.min(area.height), area);

    frame.render_widget(Clear, overlay_area);

    let draft = &app.draft;
    let title = app
        .current
        .as_ref()
        .map(|r| format!(" Review {} ", r.name))
        .unwrap_or_else(|| " Write a review ".to_string());

    let mut lines = vec![
        field_line("Name", &draft.name, draft.focus == DraftField::Name),
        field_line("Rating (1-5)", &draft.rating, draft.focus == DraftField::Rating),
        field_line("Comments", &draft.comments, draft.focus == DraftField::Comments),
        Line::default(),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::LightRed),
        )));
        lines.push(Line::default());
    }

    lines.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Next field  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Submit  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Cancel"),
    ]));

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, overlay_area);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "▏" } else { "" };

    Line::from(vec![
        Span::styled(format!("{:<14}", label), label_style),
        Span::styled(format!("{}{}", value, cursor), Style::default().fg(Color::White)),
    ])
}
