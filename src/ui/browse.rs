//! Catalog page rendering
//!
//! A page is a hero banner (home only) above a vertical stack of carousels.
//! Each carousel shows a horizontal window of titles that follows its cursor.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{render_footer, render_header, truncate, ACCENT};
use crate::app::{App, Row};
use crate::content::{Feed, FeedOrigin};
use crate::page::Page;
use crate::tmdb::ContentItem;

/// Width of one title card, including spacing
const CARD_WIDTH: usize = 22;

/// Lines taken by one carousel: heading, cards, metadata
const ROW_HEIGHT: u16 = 3;

const HERO_HEIGHT: u16 = 5;

const HINTS: &[(&str, &str)] = &[
    ("↑/↓", "Rows"),
    ("←/→", "Titles"),
    ("Enter", "Details"),
    ("Tab", "Page"),
    ("/", "Search"),
    ("m", "My List"),
    ("r", "Refresh"),
    ("?", "Help"),
    ("q", "Quit"),
];

/// Renders a catalog page
pub fn render(frame: &mut Frame, app: &App, page: Page) {
    let area = frame.area();
    let hero_height = if page == Page::Home && app.hero_item().is_some() {
        HERO_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(hero_height),
            Constraint::Min(ROW_HEIGHT),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    if hero_height > 0 {
        render_hero(frame, app, chunks[1]);
    }
    render_rows(frame, app, page, chunks[2]);
    render_footer(frame, chunks[3], HINTS, app);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let Some(item) = app.hero_item() else {
        return;
    };

    let mut meta = vec![
        Span::styled(item.rating_label(), Style::default().fg(Color::Green)),
        Span::raw(format!("  {}  {}", item.year_label(), item.media_type.label())),
    ];
    if let Some(details) = &app.hero {
        meta.push(Span::raw(format!("  {}", details.item.duration)));
        meta.push(Span::styled(
            format!("  {}", details.classification()),
            Style::default().fg(Color::Yellow),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(
            item.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        Line::from(Span::styled(
            item.description.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn render_rows(frame: &mut Frame, app: &App, page: Page, area: Rect) {
    let feeds = page.feeds();
    let visible = (area.height / ROW_HEIGHT).max(1) as usize;
    let first = first_visible(app.selected_row, visible, feeds.len());

    for (slot, (index, feed)) in feeds
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .enumerate()
    {
        let row_area = Rect {
            x: area.x,
            y: area.y + slot as u16 * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT,
        }
        .intersection(area);
        let lines = row_lines(
            *feed,
            app.rows.get(feed),
            index == app.selected_row,
            area.width as usize,
        );
        frame.render_widget(Paragraph::new(lines), row_area);
    }
}

/// First row index to draw so that `selected` stays on screen
fn first_visible(selected: usize, visible: usize, total: usize) -> usize {
    if total <= visible {
        return 0;
    }
    selected
        .saturating_sub(visible.saturating_sub(1))
        .min(total - visible)
}

fn origin_tag(origin: FeedOrigin) -> Option<&'static str> {
    match origin {
        FeedOrigin::Stale => Some(" (offline)"),
        FeedOrigin::Fallback => Some(" (unavailable)"),
        _ => None,
    }
}

fn row_lines(feed: Feed, row: Option<&Row>, selected: bool, width: usize) -> Vec<Line<'static>> {
    let heading_style = if selected {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };
    let marker = if selected { "▸ " } else { "  " };

    let mut heading = vec![Span::styled(format!("{}{}", marker, feed.title()), heading_style)];

    let Some(row) = row else {
        return vec![
            Line::from(heading),
            Line::from(Span::styled(
                "  Loading...",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];
    };

    if let Some(tag) = origin_tag(row.origin) {
        heading.push(Span::styled(tag, Style::default().fg(Color::DarkGray)));
    }

    let meta = match row.items.get(row.cursor) {
        Some(item) if selected => Line::from(Span::styled(
            format!("  {}", meta_line(item)),
            Style::default().fg(Color::Gray),
        )),
        _ => Line::from(""),
    };

    vec![
        Line::from(heading),
        card_line(row, selected, width),
        meta,
    ]
}

/// One-line summary of a title: year, kind, rating and genres
pub(crate) fn meta_line(item: &ContentItem) -> String {
    format!(
        "{} · {} · {} · {}",
        item.year_label(),
        item.media_type.label(),
        item.rating_label(),
        item.genre_label()
    )
}

fn card_line(row: &Row, selected: bool, width: usize) -> Line<'static> {
    if row.items.is_empty() {
        return Line::from(Span::styled(
            "  Nothing to show",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let visible = (width.saturating_sub(2) / CARD_WIDTH).max(1);
    let first = first_visible(row.cursor, visible, row.items.len());

    let mut spans = vec![Span::raw(if first > 0 { "‹ " } else { "  " })];
    for (index, item) in row.items.iter().enumerate().skip(first).take(visible) {
        let label = format!("{:<width$}", truncate(&item.title, CARD_WIDTH - 2), width = CARD_WIDTH - 2);
        let style = if selected && index == row.cursor {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }
    if first + visible < row.items.len() {
        spans.push(Span::raw("›"));
    }

    Line::from(spans)
}
