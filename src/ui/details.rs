//! Details modal
//!
//! Shows everything known about a title on top of the current view. While the
//! full details load, the record the modal was opened from is shown.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, ACCENT};
use crate::app::{App, DetailsModal, DetailsState};
use crate::tmdb::{ContentDetails, MediaType};

fn label_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value.into()),
    ])
}

fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}

fn detail_lines(details: &ContentDetails) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    match details.item.media_type {
        MediaType::Movie => {
            lines.push(label_line("Director", details.director.clone()));
            if let Some(date) = &details.release_date {
                lines.push(label_line("Released", date.clone()));
            }
            if let Some(budget) = details.budget.filter(|b| *b > 0) {
                lines.push(label_line("Budget", format_money(budget)));
            }
            if let Some(revenue) = details.revenue.filter(|r| *r > 0) {
                lines.push(label_line("Revenue", format_money(revenue)));
            }
        }
        MediaType::Tv => {
            lines.push(label_line("Created by", details.creators.join(", ")));
            if let (Some(seasons), Some(episodes)) =
                (details.number_of_seasons, details.number_of_episodes)
            {
                lines.push(label_line(
                    "Episodes",
                    format!("{} episodes over {} seasons", episodes, seasons),
                ));
            }
            if let Some(first) = &details.first_air_date {
                let last = details.last_air_date.as_deref().unwrap_or("?");
                lines.push(label_line("Aired", format!("{} to {}", first, last)));
            }
            if let Some(status) = &details.status {
                lines.push(label_line("Status", status.clone()));
            }
            if let Some(networks) = &details.networks {
                lines.push(label_line("Networks", networks.clone()));
            }
        }
    }

    if !details.cast.is_empty() {
        lines.push(label_line("Cast", details.cast.join(", ")));
    }
    if let Some(url) = details.trailer_url() {
        lines.push(label_line("Trailer", url));
    }
    if let Some(homepage) = &details.homepage {
        lines.push(label_line("Website", homepage.clone()));
    }
    lines
}

/// Renders the modal over the current view
pub fn render(frame: &mut Frame, modal: &DetailsModal, app: &App) {
    let area = frame.area();
    let width = area.width.saturating_sub(8).min(90);
    let height = area.height.saturating_sub(4).min(24);
    let modal_area = centered_rect(width, height, area);

    frame.render_widget(Clear, modal_area);

    let item = modal.content();
    let in_list = app.my_list.contains(item.id, item.media_type);

    let mut meta = vec![
        Span::styled(item.rating_label(), Style::default().fg(Color::Green)),
        Span::raw(format!(
            "  {}  {}  {}",
            item.year_label(),
            item.media_type.label(),
            item.duration
        )),
    ];
    if let DetailsState::Ready(details) = &modal.state {
        meta.push(Span::styled(
            format!("  {}", details.classification()),
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            item.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(meta),
        label_line("Genres", item.genre_label()),
        Line::from(""),
        Line::from(item.description.clone()),
        Line::from(""),
    ];

    match &modal.state {
        DetailsState::Loading => lines.push(Line::from(Span::styled(
            "Loading details...",
            Style::default().fg(Color::DarkGray),
        ))),
        DetailsState::Failed(reason) => lines.push(Line::from(Span::styled(
            format!("Details unavailable: {}", reason),
            Style::default().fg(Color::Red),
        ))),
        DetailsState::Ready(details) => lines.extend(detail_lines(details)),
    }

    lines.push(Line::from(""));
    let list_hint = if in_list {
        Span::styled("✓ In My List  d Remove", Style::default().fg(Color::Green))
    } else {
        Span::styled("a Add to My List", Style::default().fg(Color::Yellow))
    };
    lines.push(Line::from(vec![
        list_hint,
        Span::styled("  Esc Close", Style::default().fg(Color::DarkGray)),
    ]));

    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, modal_area);
}
