//! Keyboard reference dialog

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::layout::centered_rect_fixed;

/// Render the keyboard reference over the current view
pub fn render(frame: &mut Frame) {
    let lines = help_lines();
    let height = (lines.len() + 2) as u16;

    let area = centered_rect_fixed(52, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    frame.render_widget(Paragraph::new(lines), inner);
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        section(" Roster"),
        key_line("j / k", "Move selection"),
        key_line("g / G", "First / last client"),
        key_line("/", "Search"),
        key_line("a", "Add client"),
        key_line("e, Enter", "Edit client"),
        key_line("v", "View audit trail"),
        key_line("t", "Toggle active / inactive"),
        key_line("s", "Cycle status filter"),
        key_line("Ctrl+d", "Delete client"),
        key_line("r", "Reload roster from disk"),
        Line::from(""),
        section(" Client Editor"),
        key_line("Tab", "Next field"),
        key_line("Up / Down", "Change selector"),
        key_line("Ctrl+a", "View audit trail"),
        key_line("Enter", "Save"),
        key_line("Esc", "Cancel"),
        Line::from(""),
        section(" Audit Trail"),
        key_line("[ / ]", "Previous / next page"),
        key_line("f", "Filter entries"),
        key_line("F", "Clear filters"),
        key_line("x", "Export CSV"),
        key_line("j / k", "Scroll entries"),
        key_line("Esc", "Close overlay"),
        Line::from(""),
        section(" General"),
        key_line("?", "This help"),
        key_line("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(description.to_string()),
    ])
}
