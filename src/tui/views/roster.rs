//! Client roster table and search box

use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::models::{AccountStatus, CallingStatus, Client};
use crate::tui::app::App;
use crate::tui::widgets::render_field;

/// Render the search box above the roster
pub fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    render_field(frame, inner, &app.search_input, app.search_active);
}

/// Render the roster table
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let filter_suffix = match app.status_filter {
        Some(AccountStatus::Active) => " · Active",
        Some(AccountStatus::Inactive) => " · Inactive",
        None => "",
    };
    let border_style = if app.search_active || app.has_dialog() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .title(format!(" Clients ({}){} ", app.clients.len(), filter_suffix))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    if app.clients.is_empty() {
        let message = if app.search_input.is_empty() {
            "No clients yet. Press 'a' to add one.".to_string()
        } else {
            format!("No clients match '{}'.", app.search_input.value())
        };
        frame.render_widget(
            Paragraph::new(format!("\n\n{}", message))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(vec!["ID", "Code", "Name", "Mobile", "Account", "Calling"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app.clients.iter().map(client_row).collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(block)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = TableState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn client_row(client: &Client) -> Row<'static> {
    let account_style = match client.account_status {
        AccountStatus::Active => Style::default().fg(Color::Green),
        AccountStatus::Inactive => Style::default().fg(Color::DarkGray),
    };
    Row::new(vec![
        Cell::from(client.id.to_string()),
        Cell::from(client.trading_code.clone()).style(Style::default().fg(Color::Cyan)),
        Cell::from(client.name.clone()),
        Cell::from(client.mobile_no.clone()),
        Cell::from(client.account_status.to_string()).style(account_style),
        Cell::from(client.calling_status.to_string())
            .style(Style::default().fg(calling_status_color(client.calling_status))),
    ])
}

fn calling_status_color(status: CallingStatus) -> Color {
    match status {
        CallingStatus::NotCalled => Color::White,
        CallingStatus::FollowUp => Color::Yellow,
        CallingStatus::PaymentCommitted => Color::Blue,
        CallingStatus::PaymentReceived => Color::Green,
        CallingStatus::NotInterested => Color::Red,
    }
}
