//! Restaurant list screen rendering
//!
//! Renders the main list of restaurants passing the active cuisine and
//! neighborhood filters, with favourites marked.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{key_hint, status_line};
use crate::app::App;

/// Renders the restaurant list screen
pub fn render<A>(frame: &mut Frame, app: &App<A>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filters
            Constraint::Min(3),    // Restaurant list
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_filters(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    frame.render_widget(Paragraph::new(status_line(app)), chunks[2]);
    render_help(frame, chunks[3]);
}

fn filter_label(value: Option<&str>) -> String {
    value.unwrap_or("All").to_string()
}

/// Renders the active filters
fn render_filters<A>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let line = Line::from(vec![
        Span::styled("Cuisine: ", Style::default().fg(Color::Gray)),
        Span::styled(
            filter_label(app.cuisine_filter.as_deref()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Neighborhood: ", Style::default().fg(Color::Gray)),
        Span::styled(
            filter_label(app.neighborhood_filter.as_deref()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]);

    let block = Block::default()
        .title(" Filter Results ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Renders the restaurant list with the selected entry highlighted
fn render_list<A>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let visible = app.visible_restaurants();

    let lines: Vec<Line> = if visible.is_empty() {
        vec![Line::from(Span::styled(
            "No restaurants found",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        visible
            .iter()
            .enumerate()
            .map(|(i, restaurant)| {
                let is_selected = i == app.selected_index;
                let name_style = if is_selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                Line::from(vec![
                    Span::styled(if is_selected { "▸ " } else { "  " }, name_style),
                    Span::styled(
                        if restaurant.is_favorite { "★ " } else { "  " },
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(format!("{:<32}", restaurant.name), name_style),
                    Span::styled(
                        format!("{:<14}", restaurant.neighborhood),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(
                        restaurant.cuisine_type.clone(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(format!(" Restaurants ({}) ", visible.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    // Keep the selection in view
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = app.selected_index.saturating_sub(inner_height.saturating_sub(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
    ];
    spans.extend(key_hint("Enter", "Details"));
    spans.extend(key_hint("c", "Cuisine"));
    spans.extend(key_hint("n", "Neighborhood"));
    spans.extend(key_hint("f", "Favourite"));
    spans.extend(key_hint("r", "Refresh"));
    spans.extend(key_hint("?", "Help"));
    spans.extend(key_hint("q", "Quit"));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}
