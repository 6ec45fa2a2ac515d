//! UI rendering module for marquee
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod browse;
pub mod details;
pub mod help_overlay;
pub mod my_list;
pub mod search;

use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::page::Page;

/// Brand color used for highlights
pub(crate) const ACCENT: Color = Color::Red;

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    match app.state {
        AppState::Loading => render_loading(frame),
        AppState::Browse(page) => browse::render(frame, app, page),
        AppState::MyList => my_list::render(frame, app),
    }

    if app.search_open {
        search::render_dropdown(frame, app);
    }
    if let Some(modal) = &app.details {
        details::render(frame, modal, app);
    }
    if app.show_help {
        help_overlay::render(frame);
    }
    render_notification(frame, app);
}

/// Renders a loading message while the first page is fetched
fn render_loading(frame: &mut Frame) {
    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let lines = vec![
        Line::from(Span::styled(
            "MARQUEE",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from("Loading catalog..."),
    ];
    let loading_text = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Renders the navigation bar: brand, page tabs, My List and the search box
pub(crate) fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let active_page = match app.state {
        AppState::Browse(page) => Some(page),
        _ => None,
    };

    let mut spans = vec![
        Span::styled(
            "MARQUEE",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    let tabs = Page::ALL
        .iter()
        .map(|page| (page.title(), active_page == Some(*page)))
        .chain(std::iter::once(("My List", app.state == AppState::MyList)));
    for (title, active) in tabs {
        let style = if active {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(title, style));
        spans.push(Span::raw("  "));
    }

    if app.search_open {
        spans.push(Span::styled("Search: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(app.search.query().to_string()));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let separator = "─".repeat(area.width as usize);
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders the key hints at the bottom of the screen with data freshness
pub(crate) fn render_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], app: &App) {
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {}  ", label)));
    }

    if let Some(last_refresh) = app.last_refresh {
        let elapsed = Local::now() - last_refresh;
        let mins_ago = elapsed.num_minutes();
        let freshness_text = if mins_ago < 1 {
            "│ Data: just now".to_string()
        } else if mins_ago < 60 {
            format!("│ Data: {}m ago", mins_ago)
        } else {
            format!("│ Data: {}h ago", elapsed.num_hours())
        };
        spans.push(Span::styled(freshness_text, Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Shows the current notification in the top right corner
fn render_notification(frame: &mut Frame, app: &App) {
    let Some(notification) = &app.notification else {
        return;
    };

    let area = frame.area();
    let width = (notification.message.chars().count() as u16 + 4).min(area.width);
    let toast = Rect {
        x: area.width.saturating_sub(width),
        y: area.y + 2u16.min(area.height),
        width,
        height: 3u16.min(area.height),
    }
    .intersection(area);

    frame.render_widget(Clear, toast);
    let paragraph = Paragraph::new(notification.message.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT)),
        );
    frame.render_widget(paragraph, toast);
}

/// Shortens `text` to at most `width` characters, ending with `…` when cut
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Helper function to create a centered rect
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

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::App;
    use crate::cli::StartupConfig;
    use crate::content::{FeedOrigin, LoadedFeed};
    use crate::loader::LoadMessage;
    use crate::page::Page;
    use crate::tmdb::{ContentItem, MediaType};
    use crate::watchlist::MyList;

    pub fn item(id: u64, title: &str, media_type: MediaType) -> ContentItem {
        ContentItem {
            id,
            title: title.to_string(),
            media_type,
            year: Some(2021),
            vote_average: 7.9,
            description: "Spice must flow.".to_string(),
            image: None,
            backdrop: None,
            genres: vec!["Science Fiction".to_string(), "Adventure".to_string()],
            duration: "155 min".to_string(),
            popularity: 10.0,
        }
    }

    /// App browsing the home page with three titles per carousel
    pub fn browsing_app() -> App {
        let now = std::time::Instant::now();
        let mut app = App::new(MyList::in_memory(), StartupConfig::default());
        for feed in Page::Home.feeds() {
            let items = (1..=3)
                .map(|id| item(id, &format!("{} {}", feed.title(), id), MediaType::Movie))
                .collect();
            app.apply(
                LoadMessage::FeedLoaded(LoadedFeed {
                    feed: *feed,
                    items,
                    origin: FeedOrigin::Network,
                }),
                now,
            );
        }
        app.take_requests();
        app
    }

    pub fn loading_app() -> App {
        App::new(MyList::in_memory(), StartupConfig::default())
    }

    /// Renders the whole UI and returns the buffer as one string
    pub fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_loading_screen() {
        let content = render_to_string(&loading_app(), 80, 24);
        assert!(content.contains("Loading catalog"));
    }

    #[test]
    fn test_notification_is_drawn() {
        let mut app = browsing_app();
        app.notify("Added to My List", std::time::Instant::now());

        let content = render_to_string(&app, 100, 30);
        assert!(content.contains("Added to My List"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Dune", 10), "Dune");
        assert_eq!(truncate("Blade Runner", 6), "Blade…");
        assert_eq!(truncate("Anything", 0), "");
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 20);
    }
}
