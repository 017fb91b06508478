//! Restaurant detail screen UI
//!
//! Renders a single restaurant with its address, opening hours and reviews,
//! marking reviews that are still waiting to be posted.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{key_hint, status_line};
use crate::app::App;
use crate::data::{image_url_for_restaurant, sorted_hours, Restaurant, Review};

mod colors {
    use ratatui::style::Color;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Favourite marker and rating stars
    pub const STAR: Color = Color::Yellow;
    /// Reviews not yet posted
    pub const PENDING: Color = Color::LightRed;
}

/// Renders the restaurant detail screen
pub fn render<A>(frame: &mut Frame, app: &App<A>) {
    let area = frame.area();

    let Some(restaurant) = app.current.as_ref() else {
        render_no_data(frame, area);
        return;
    };

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            format!(" {} ", restaurant.name),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content (scrollable)
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help text
        ])
        .split(inner_area);

    let mut lines = build_info_lines(restaurant, &app.api_url);
    lines.push(Line::default());
    lines.extend(build_hours_lines(restaurant));
    lines.push(Line::default());
    lines.extend(build_review_lines(&app.reviews, |review| app.is_queued(review)));

    // Long comments wrap, so measure rows rather than lines
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let content_height = u16::try_from(paragraph.line_count(chunks[0].width)).unwrap_or(u16::MAX);
    let max_scroll = content_height.saturating_sub(chunks[0].height);
    let scroll_offset = app.detail_scroll_offset.min(max_scroll);

    frame.render_widget(paragraph.scroll((scroll_offset, 0)), chunks[0]);

    if scroll_offset > 0 {
        render_scroll_indicator(frame, chunks[0], "\u{25B2} more", false);
    }
    if scroll_offset < max_scroll {
        render_scroll_indicator(frame, chunks[0], "\u{25BC} more", true);
    }

    frame.render_widget(Paragraph::new(status_line(app)), chunks[1]);
    render_help_text(frame, chunks[2]);
}

/// Name, address, cuisine, image and favourite state
fn build_info_lines(restaurant: &Restaurant, api_url: &str) -> Vec<Line<'static>> {
    let favourite = if restaurant.is_favorite {
        Span::styled("★ Remove from favourites", Style::default().fg(colors::STAR))
    } else {
        Span::styled("☆ Add to favourites", Style::default().fg(colors::SECONDARY))
    };

    vec![
        field_line("Address", restaurant.address.clone()),
        field_line("Cuisine", restaurant.cuisine_type.clone()),
        field_line("Neighborhood", restaurant.neighborhood.clone()),
        field_line("Image", image_url_for_restaurant(api_url, restaurant)),
        Line::from(vec![Span::raw("  "), favourite]),
    ]
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), Style::default().fg(colors::SECONDARY)),
        Span::styled(value, Style::default().fg(colors::PRIMARY)),
    ])
}

/// Opening hours, one day per line
fn build_hours_lines(restaurant: &Restaurant) -> Vec<Line<'static>> {
    let mut lines = vec![section_header("HOURS")];
    let hours = sorted_hours(restaurant);
    if hours.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Hours not available",
            Style::default().fg(colors::SECONDARY),
        )));
    }
    for (day, hours) in hours {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", day), Style::default().fg(colors::SECONDARY)),
            Span::styled(hours.to_string(), Style::default().fg(colors::PRIMARY)),
        ]));
    }
    lines
}

/// Review list, newest last
fn build_review_lines(
    reviews: &[Review],
    is_queued: impl Fn(&Review) -> bool,
) -> Vec<Line<'static>> {
    let mut lines = vec![section_header("REVIEWS")];
    if reviews.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No reviews yet!",
            Style::default().fg(colors::SECONDARY),
        )));
        return lines;
    }

    for review in reviews {
        let mut title = vec![
            Span::raw("  "),
            Span::styled(
                review.name.clone(),
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  {}",
                    review.created_at.with_timezone(&Local).format("%B %-d, %Y")
                ),
                Style::default().fg(colors::SECONDARY),
            ),
        ];
        if is_queued(review) {
            title.push(Span::styled(
                "  (pending)",
                Style::default().fg(colors::PENDING),
            ));
        }
        lines.push(Line::from(title));

        let stars = usize::from(review.rating.min(5));
        lines.push(Line::from(vec![
            Span::styled(
                format!("  Rating: {} ", review.rating),
                Style::default().fg(colors::SECONDARY),
            ),
            Span::styled(
                format!("{}{}", "★".repeat(stars), "☆".repeat(5 - stars)),
                Style::default().fg(colors::STAR),
            ),
        ]));
        if !review.comments.is_empty() {
            lines.push(Line::from(format!("  {}", review.comments)));
        }
        lines.push(Line::default());
    }
    lines
}

fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))
}

fn render_scroll_indicator(frame: &mut Frame, area: Rect, text: &'static str, bottom: bool) {
    if area.width < 10 || area.height == 0 {
        return;
    }
    let indicator_area = Rect {
        x: area.x + area.width.saturating_sub(8),
        y: if bottom {
            area.y + area.height.saturating_sub(1)
        } else {
            area.y
        },
        width: 8,
        height: 1,
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(colors::SECONDARY),
    )));
    frame.render_widget(paragraph, indicator_area);
}

fn render_help_text(frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled("<- Back", Style::default().fg(colors::SECONDARY)),
        Span::raw("  "),
    ];
    spans.extend(key_hint("j/k", "Scroll"));
    spans.extend(key_hint("f", "Favourite"));
    spans.extend(key_hint("w", "Write review"));
    spans.extend(key_hint("s", "Sync"));
    spans.extend(key_hint("q", "Quit"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders a message when the restaurant could not be loaded
fn render_no_data(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "Restaurant not available",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(message, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::ui::test_support::{app, buffer_text, restaurant};
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn render_to_text(app: &App<()>, height: u16) -> String {
        let backend = TestBackend::new(100, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        buffer_text(&terminal)
    }

    fn detail_app(dir: &TempDir) -> App<()> {
        let mut app = app(dir.path());
        app.current = Some(restaurant(1, "Mission Chinese Food", "Asian", "Manhattan"));
        app.state = AppState::RestaurantDetail(1);
        app
    }

    #[test]
    fn test_renders_restaurant_info() {
        let dir = TempDir::new().unwrap();
        let app = detail_app(&dir);

        let content = render_to_text(&app, 30);

        assert!(content.contains("Mission Chinese Food"));
        assert!(content.contains("1 Main St"));
        assert!(content.contains("Manhattan"));
        assert!(content.contains("http://localhost:1337/img/1.jpg"));
        assert!(content.contains("Add to favourites"));
    }

    #[test]
    fn test_favourite_label_follows_flag() {
        let dir = TempDir::new().unwrap();
        let mut app = detail_app(&dir);
        if let Some(current) = app.current.as_mut() {
            current.is_favorite = true;
        }

        let content = render_to_text(&app, 30);

        assert!(content.contains("Remove from favourites"));
    }

    #[test]
    fn test_hours_are_listed_in_weekday_order() {
        let dir = TempDir::new().unwrap();
        let app = detail_app(&dir);

        let content = render_to_text(&app, 30);

        let monday = content.find("Monday").expect("Monday should be listed");
        let tuesday = content.find("Tuesday").expect("Tuesday should be listed");
        assert!(monday < tuesday);
    }

    #[test]
    fn test_no_reviews_message() {
        let dir = TempDir::new().unwrap();
        let app = detail_app(&dir);

        let content = render_to_text(&app, 30);

        assert!(content.contains("No reviews yet!"));
    }

    #[test]
    fn test_reviews_render_with_pending_marker() {
        let dir = TempDir::new().unwrap();
        let mut app = detail_app(&dir);
        let mut posted = Review::new_local(1, "Steve", 4, "Great dumplings");
        posted.id = Some(1);
        let waiting = Review::new_local(1, "Ana", 2, "Too loud");
        app.reviews = vec![posted, waiting.clone()];
        app.queued = vec![waiting];

        let content = render_to_text(&app, 40);

        assert!(content.contains("Steve"));
        assert!(content.contains("Rating: 4"));
        assert!(content.contains("Great dumplings"));
        assert!(content.contains("Ana"));
        assert_eq!(content.matches("(pending)").count(), 1);
    }

    #[test]
    fn test_scrolling_reaches_end_of_wrapped_reviews() {
        let dir = TempDir::new().unwrap();
        let mut app = detail_app(&dir);
        app.reviews = vec![
            Review::new_local(1, "Ana", 5, "Lovely dumplings and noodles. ".repeat(20)),
            Review::new_local(1, "Zed", 3, "Final words"),
        ];
        app.detail_scroll_offset = u16::MAX;

        let backend = TestBackend::new(40, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
        let content = buffer_text(&terminal);

        assert!(content.contains("Final words"), "Last review should scroll into view");
    }

    #[test]
    fn test_missing_restaurant_shows_placeholder() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());
        app.state = AppState::RestaurantDetail(99);

        let content = render_to_text(&app, 24);

        assert!(content.contains("Restaurant not available"));
    }
}
