//! My List screen rendering

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::browse::meta_line;
use super::{render_footer, render_header, truncate, ACCENT};
use crate::app::App;

const HINTS: &[(&str, &str)] = &[
    ("↑/↓", "Navigate"),
    ("Enter", "Details"),
    ("f", "Filter"),
    ("s", "Sort"),
    ("x", "Remove"),
    ("Esc", "Back"),
    ("q", "Quit"),
];

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_toolbar(frame, app, chunks[1]);
    render_entries(frame, app, chunks[2]);
    render_footer(frame, chunks[3], HINTS, app);
}

fn render_toolbar(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.pending_removal {
        Line::from(Span::styled(
            "Remove this title from My List? y to confirm, any other key to cancel",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(vec![
            Span::styled("Show: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.list_filter.label()),
            Span::styled("   Sort: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.list_sort.label()),
            Span::styled(
                format!("   {} saved", app.my_list.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_entries(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" My List ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let entries = app.my_list_view();
    if entries.is_empty() {
        let message = if app.my_list.is_empty() {
            "Your list is empty. Press a in a title's details to save it here."
        } else {
            "No titles match this filter."
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Keep the cursor inside the visible window
    let visible = area.height.saturating_sub(2).max(1) as usize;
    let first = app.list_cursor.saturating_sub(visible - 1);
    let title_width = (area.width as usize).saturating_sub(4).min(40);

    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(index, entry)| {
            let selected = index == app.list_cursor;
            let title_style = if selected {
                Style::default()
                    .fg(ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let added = entry.added_at.with_timezone(&Local).format("%b %d");
            Line::from(vec![
                Span::raw(if selected { "▸ " } else { "  " }),
                Span::styled(
                    format!("{:<width$}", truncate(&entry.item.title, title_width), width = title_width),
                    title_style,
                ),
                Span::styled(
                    format!("  {}", meta_line(&entry.item)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  added {}", added),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
