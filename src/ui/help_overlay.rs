//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered_rect, ACCENT};

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame) {
    let area = frame.area();

    let overlay_area = centered_rect(52, 28, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Browsing"),
        help_line("↑/k, ↓/j", "Previous/next row"),
        help_line("←/h, →/l", "Previous/next title"),
        help_line("Enter", "Open details"),
        help_line("Tab, S-Tab", "Next/previous page"),
        help_line("/", "Search"),
        help_line("m", "My List"),
        help_line("r", "Refresh page"),
        Line::from(""),
        section("Details"),
        help_line("a", "Add to My List"),
        help_line("d", "Remove from My List"),
        help_line("Esc", "Close"),
        Line::from(""),
        section("My List"),
        help_line("f", "Filter: all, movies, series"),
        help_line("s", "Sort: added, title, year"),
        help_line("x, then y", "Remove title"),
        help_line("Esc", "Back to browsing"),
        Line::from(""),
        help_line("?", "Toggle this help"),
        help_line("q", "Quit application"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}
