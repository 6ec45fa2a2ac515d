//! Search dropdown rendering
//!
//! The query itself is drawn in the header; this module draws the result
//! list underneath it.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{truncate, ACCENT};
use crate::app::App;
use crate::search::{DropdownState, MIN_QUERY_CHARS};

const DROPDOWN_WIDTH: u16 = 60;

/// Renders the dropdown under the header while search has focus
pub fn render_dropdown(frame: &mut Frame, app: &App) {
    let lines = dropdown_lines(app);
    let area = frame.area();
    let width = DROPDOWN_WIDTH.min(area.width);
    let dropdown = Rect {
        x: area.width.saturating_sub(width),
        y: area.y + 2,
        width,
        height: lines.len() as u16 + 2,
    }
    .intersection(area);

    frame.render_widget(Clear, dropdown);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(paragraph, dropdown);
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

fn dropdown_lines(app: &App) -> Vec<Line<'static>> {
    let search = &app.search;
    let text_width = DROPDOWN_WIDTH as usize - 20;

    match search.dropdown() {
        DropdownState::Hidden => {
            if search.query().trim().chars().count() < MIN_QUERY_CHARS {
                vec![muted(format!(
                    "Type at least {} characters to search",
                    MIN_QUERY_CHARS
                ))]
            } else {
                vec![muted("Searching soon...")]
            }
        }
        DropdownState::Loading => vec![muted("Searching...")],
        DropdownState::NoResults(query) => vec![
            Line::from(format!("No results for \"{}\"", truncate(query, text_width))),
            muted("Try another title"),
        ],
        DropdownState::Error => vec![
            Line::from(Span::styled(
                "Search failed",
                Style::default().fg(Color::Red),
            )),
            muted("Press Enter to try again"),
        ],
        DropdownState::Results(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let selected = index == search.selected();
                let title_style = if selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::raw(if selected { "▸ " } else { "  " }),
                    Span::styled(truncate(&item.title, text_width), title_style),
                    Span::styled(
                        format!("  {} · {}", item.year_label(), item.media_type.label()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("  {}", item.rating_label()),
                        Style::default().fg(Color::Green),
                    ),
                ])
            })
            .collect(),
    }
}
