//! Bottom status bar

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::services::ClientService;
use crate::tui::app::App;

/// Render roster stats, the transient status message, and key hints
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let service = ClientService::new(app.storage);
    let stats = service.stats().unwrap_or_default();

    let mut spans = vec![
        Span::styled(
            format!(" {} clients", stats.total),
            Style::default().fg(Color::White),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{} active", stats.active),
            Style::default().fg(Color::Green),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.settings.effective_base_url(),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(message) = &app.status_message {
        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = "q:Quit  ?:Help ";
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let pad = (area.width as usize).saturating_sub(used + hints.chars().count());
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
