//! UI rendering module for Restoview
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod restaurant_detail;
pub mod restaurant_list;
pub mod review_form;

pub use help_overlay::render as render_help_overlay;
pub use restaurant_detail::render as render_restaurant_detail;
pub use restaurant_list::render as render_restaurant_list;
pub use review_form::render as render_review_form;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
};

use crate::app::App;

/// Creates a rect of the given size centered in `area`
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Connectivity, pending reviews and the last status message, shared by every view
pub(crate) fn status_line<A>(app: &App<A>) -> Line<'static> {
    let mut spans = if app.online {
        vec![Span::styled("● Online", Style::default().fg(Color::Green))]
    } else {
        vec![Span::styled("○ Offline", Style::default().fg(Color::Red))]
    };

    if !app.queued.is_empty() {
        spans.push(Span::styled(
            format!(" │ {} review(s) waiting to be posted", app.queued.len()),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" │ {}", status),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Shorthand for a highlighted key followed by its description
pub(crate) fn key_hint(key: &str, description: &str) -> [Span<'static>; 2] {
    [
        Span::styled(key.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw(format!(" {}  ", description)),
    ]
}
