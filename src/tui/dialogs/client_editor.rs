//! Client add/edit dialog
//!
//! One form serves both adding and editing. The calling status selector
//! drives which conditional inputs appear below it, mirroring how the
//! status mapping on the model works.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::models::{
    AccountStatus, CallingStatus, Client, ClientId, ConditionalField, FieldKind, FieldValue,
};
use crate::services::ClientService;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::{render_field, TextInput};

/// Calling statuses in selector order
const CALLING_STATUSES: &[CallingStatus] = &[
    CallingStatus::NotCalled,
    CallingStatus::FollowUp,
    CallingStatus::PaymentCommitted,
    CallingStatus::PaymentReceived,
    CallingStatus::NotInterested,
];

/// Focusable fields of the editor, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    TradingCode,
    Name,
    Mobile,
    Email,
    AccountStatus,
    CallingStatus,
    /// Index into the conditional inputs of the selected status
    Conditional(usize),
}

/// State of the client editor form
#[derive(Debug, Clone)]
pub struct ClientFormState {
    /// Field currently holding focus
    pub focused_field: ClientField,
    pub code_input: TextInput,
    pub name_input: TextInput,
    pub mobile_input: TextInput,
    pub email_input: TextInput,
    /// Account status toggle
    pub active: bool,
    /// Index into [`CALLING_STATUSES`]
    pub calling_index: usize,
    /// Inputs for the selected status, in descriptor order
    pub conditional_inputs: Vec<TextInput>,
    /// Client being edited, or `None` when adding
    pub editing: Option<ClientId>,
    /// Validation error shown at the bottom of the dialog
    pub error_message: Option<String>,
}

impl ClientFormState {
    /// Empty form for adding a client
    pub fn new() -> Self {
        Self {
            focused_field: ClientField::TradingCode,
            code_input: TextInput::new().label("Trading Code").placeholder("ACME01"),
            name_input: TextInput::new()
                .label("Name")
                .placeholder("Acme Trading Ltd"),
            mobile_input: TextInput::new()
                .label("Mobile")
                .placeholder("+8801700000000"),
            email_input: TextInput::new().label("Email").placeholder("optional"),
            active: true,
            calling_index: 0,
            conditional_inputs: Vec::new(),
            editing: None,
            error_message: None,
        }
    }

    /// Form prefilled from an existing client.
    ///
    /// The trading code is shown but not editable, so focus starts on the
    /// name instead.
    pub fn from_client(client: &Client) -> Self {
        let mut form = Self::new();
        form.focused_field = ClientField::Name;
        form.code_input = TextInput::new()
            .label("Trading Code")
            .content(client.trading_code.as_str());
        form.name_input = TextInput::new().label("Name").content(client.name.as_str());
        form.mobile_input = TextInput::new()
            .label("Mobile")
            .content(client.mobile_no.as_str());
        form.email_input = TextInput::new()
            .label("Email")
            .placeholder("optional")
            .content(client.email.as_deref().unwrap_or(""));
        form.active = client.account_status == AccountStatus::Active;
        form.calling_index = CALLING_STATUSES
            .iter()
            .position(|s| *s == client.calling_status)
            .unwrap_or(0);
        form.editing = Some(client.id);
        form.conditional_inputs = client
            .calling_status
            .conditional_fields()
            .iter()
            .map(|descriptor| {
                let input = conditional_input(descriptor.label, descriptor.kind);
                match client.conditional_value(descriptor.field) {
                    Some(value) => input.content(value),
                    None => input,
                }
            })
            .collect();
        form
    }

    /// Status the selector currently points at
    pub fn selected_calling_status(&self) -> CallingStatus {
        CALLING_STATUSES[self.calling_index % CALLING_STATUSES.len()]
    }

    /// Select the next calling status, replacing the conditional inputs
    pub fn next_calling_status(&mut self) {
        self.calling_index = (self.calling_index + 1) % CALLING_STATUSES.len();
        self.rebuild_conditional_inputs();
    }

    /// Select the previous calling status, replacing the conditional inputs
    pub fn prev_calling_status(&mut self) {
        self.calling_index =
            (self.calling_index + CALLING_STATUSES.len() - 1) % CALLING_STATUSES.len();
        self.rebuild_conditional_inputs();
    }

    /// Flip the account status. Conditional values describe the calling
    /// workflow of one account state, so the inputs reset too.
    pub fn toggle_active(&mut self) {
        self.active = !self.active;
        self.rebuild_conditional_inputs();
    }

    /// Fresh empty inputs for the selected status; values entered under a
    /// different status do not carry over
    fn rebuild_conditional_inputs(&mut self) {
        self.conditional_inputs = self
            .selected_calling_status()
            .conditional_fields()
            .iter()
            .map(|descriptor| conditional_input(descriptor.label, descriptor.kind))
            .collect();
    }

    /// First field in the tab order; the trading code is skipped while
    /// editing an existing client
    fn first_field(&self) -> ClientField {
        if self.editing.is_some() {
            ClientField::Name
        } else {
            ClientField::TradingCode
        }
    }

    /// Move focus to the next field
    pub fn next_field(&mut self) {
        let cond_count = self.conditional_inputs.len();
        self.focused_field = match self.focused_field {
            ClientField::TradingCode => ClientField::Name,
            ClientField::Name => ClientField::Mobile,
            ClientField::Mobile => ClientField::Email,
            ClientField::Email => ClientField::AccountStatus,
            ClientField::AccountStatus => ClientField::CallingStatus,
            ClientField::CallingStatus => {
                if cond_count > 0 {
                    ClientField::Conditional(0)
                } else {
                    self.first_field()
                }
            }
            ClientField::Conditional(i) => {
                if i + 1 < cond_count {
                    ClientField::Conditional(i + 1)
                } else {
                    self.first_field()
                }
            }
        };
    }

    /// Move focus to the previous field
    pub fn prev_field(&mut self) {
        let cond_count = self.conditional_inputs.len();
        let last = if cond_count > 0 {
            ClientField::Conditional(cond_count - 1)
        } else {
            ClientField::CallingStatus
        };
        self.focused_field = match self.focused_field {
            ClientField::TradingCode => last,
            ClientField::Name => {
                if self.editing.is_some() {
                    last
                } else {
                    ClientField::TradingCode
                }
            }
            ClientField::Mobile => ClientField::Name,
            ClientField::Email => ClientField::Mobile,
            ClientField::AccountStatus => ClientField::Email,
            ClientField::CallingStatus => ClientField::AccountStatus,
            ClientField::Conditional(0) => ClientField::CallingStatus,
            ClientField::Conditional(i) => ClientField::Conditional(i - 1),
        };
    }

    /// Text input holding focus, if the focused field is one
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused_field {
            ClientField::TradingCode => Some(&mut self.code_input),
            ClientField::Name => Some(&mut self.name_input),
            ClientField::Mobile => Some(&mut self.mobile_input),
            ClientField::Email => Some(&mut self.email_input),
            ClientField::Conditional(i) => self.conditional_inputs.get_mut(i),
            _ => None,
        }
    }

    /// Parse the conditional inputs into typed values.
    ///
    /// Every input of the selected status must hold a parseable value of
    /// the descriptor's kind.
    pub fn parse_conditional_values(&self) -> Result<Vec<(ConditionalField, FieldValue)>, String> {
        let status = self.selected_calling_status();
        let mut values = Vec::new();
        for (descriptor, input) in status
            .conditional_fields()
            .iter()
            .zip(&self.conditional_inputs)
        {
            let raw = input.value().trim();
            if raw.is_empty() {
                return Err(format!("{} is required", descriptor.label));
            }
            let value = match descriptor.kind {
                FieldKind::Date => {
                    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", descriptor.label))?;
                    FieldValue::Date(date)
                }
                FieldKind::Amount => {
                    let amount: f64 = raw
                        .parse()
                        .map_err(|_| format!("{} must be a number", descriptor.label))?;
                    if amount < 0.0 {
                        return Err(format!("{} cannot be negative", descriptor.label));
                    }
                    FieldValue::Amount(amount)
                }
            };
            values.push((descriptor.field, value));
        }
        Ok(values)
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

impl Default for ClientFormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Empty input for one conditional descriptor
fn conditional_input(label: &str, kind: FieldKind) -> TextInput {
    TextInput::new().label(label).placeholder(match kind {
        FieldKind::Date => "YYYY-MM-DD",
        FieldKind::Amount => "0.00",
    })
}

/// Render the client editor dialog
pub fn render(frame: &mut Frame, app: &App) {
    let form = &app.client_form;
    let cond_count = form.conditional_inputs.len();

    let area = centered_rect_fixed(58, 12 + cond_count as u16, frame.area());
    frame.render_widget(Clear, area);

    let title = if form.editing.is_some() {
        " Edit Client "
    } else {
        " Add Client "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![
        Constraint::Length(1), // trading code
        Constraint::Length(1), // name
        Constraint::Length(1), // mobile
        Constraint::Length(1), // email
        Constraint::Length(1),
        Constraint::Length(1), // account status
        Constraint::Length(1), // calling status
    ];
    constraints.extend(std::iter::repeat(Constraint::Length(1)).take(cond_count));
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Length(1)); // error
    constraints.push(Constraint::Length(1)); // hints
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints(constraints)
        .split(inner);

    if form.editing.is_some() {
        // Trading code is fixed once assigned
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{:<18}", "Trading Code"),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    form.code_input.value().to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])),
            chunks[0],
        );
    } else {
        render_field(
            frame,
            chunks[0],
            &form.code_input,
            form.focused_field == ClientField::TradingCode,
        );
    }
    render_field(
        frame,
        chunks[1],
        &form.name_input,
        form.focused_field == ClientField::Name,
    );
    render_field(
        frame,
        chunks[2],
        &form.mobile_input,
        form.focused_field == ClientField::Mobile,
    );
    render_field(
        frame,
        chunks[3],
        &form.email_input,
        form.focused_field == ClientField::Email,
    );

    render_account_status_line(frame, chunks[5], form);
    render_calling_status_line(frame, chunks[6], form);

    for (i, input) in form.conditional_inputs.iter().enumerate() {
        render_field(
            frame,
            chunks[7 + i],
            input,
            form.focused_field == ClientField::Conditional(i),
        );
    }

    if let Some(error) = &form.error_message {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[8 + cond_count],
        );
    }

    frame.render_widget(
        Paragraph::new("[Tab] Next field  [Enter] Save  [Esc] Cancel")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[9 + cond_count],
    );
}

fn render_account_status_line(frame: &mut Frame, area: Rect, form: &ClientFormState) {
    let focused = form.focused_field == ClientField::AccountStatus;
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let (value, value_style) = if form.active {
        ("Active", Style::default().fg(Color::Green))
    } else {
        ("Inactive", Style::default().fg(Color::DarkGray))
    };
    let mut spans = vec![
        Span::styled(format!("{:<18}", "Account Status"), label_style),
        Span::styled(value, value_style),
    ];
    if focused {
        spans.push(Span::styled(
            "  (space toggles)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_calling_status_line(frame: &mut Frame, area: Rect, form: &ClientFormState) {
    let focused = form.focused_field == ClientField::CallingStatus;
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![
        Span::styled(format!("{:<18}", "Calling Status"), label_style),
        Span::styled(
            form.selected_calling_status().to_string(),
            Style::default().fg(Color::Yellow),
        ),
    ];
    if focused {
        spans.push(Span::styled(
            "  (up/down changes)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Handle key input for the client editor.
/// Returns true if the key was handled.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
            true
        }
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            // Stack the audit overlay above the editor; the form stays
            // mounted and takes focus back when the overlay closes
            app.open_audit_from_editor();
            true
        }
        KeyCode::Tab => {
            app.client_form.clear_error();
            app.client_form.next_field();
            true
        }
        KeyCode::BackTab => {
            app.client_form.clear_error();
            app.client_form.prev_field();
            true
        }
        KeyCode::Enter => {
            if let Err(message) = save_client(app) {
                app.client_form.set_error(message);
            }
            true
        }
        KeyCode::Up => match app.client_form.focused_field {
            ClientField::CallingStatus => {
                app.client_form.clear_error();
                app.client_form.prev_calling_status();
                true
            }
            ClientField::AccountStatus => {
                app.client_form.clear_error();
                app.client_form.toggle_active();
                true
            }
            _ => false,
        },
        KeyCode::Down => match app.client_form.focused_field {
            ClientField::CallingStatus => {
                app.client_form.clear_error();
                app.client_form.next_calling_status();
                true
            }
            ClientField::AccountStatus => {
                app.client_form.clear_error();
                app.client_form.toggle_active();
                true
            }
            _ => false,
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.client_form.focused_field == ClientField::AccountStatus {
                if c == ' ' {
                    app.client_form.toggle_active();
                }
            } else if let Some(input) = app.client_form.focused_input() {
                input.insert(c);
                app.client_form.clear_error();
            }
            true
        }
        KeyCode::Backspace => {
            if let Some(input) = app.client_form.focused_input() {
                input.backspace();
                app.client_form.clear_error();
            }
            true
        }
        KeyCode::Delete => {
            if let Some(input) = app.client_form.focused_input() {
                input.delete();
            }
            true
        }
        KeyCode::Left => {
            if let Some(input) = app.client_form.focused_input() {
                input.move_left();
            }
            true
        }
        KeyCode::Right => {
            if let Some(input) = app.client_form.focused_input() {
                input.move_right();
            }
            true
        }
        KeyCode::Home => {
            if let Some(input) = app.client_form.focused_input() {
                input.move_start();
            }
            true
        }
        KeyCode::End => {
            if let Some(input) = app.client_form.focused_input() {
                input.move_end();
            }
            true
        }
        _ => false,
    }
}

/// Persist the form through the client service
fn save_client(app: &mut App) -> Result<(), String> {
    let values = app.client_form.parse_conditional_values()?;
    let code = app.client_form.code_input.value().trim().to_string();
    let name = app.client_form.name_input.value().trim().to_string();
    let mobile = app.client_form.mobile_input.value().trim().to_string();
    let email = app.client_form.email_input.value().trim().to_string();
    let account_status = if app.client_form.active {
        AccountStatus::Active
    } else {
        AccountStatus::Inactive
    };
    let calling_status = app.client_form.selected_calling_status();
    let editing = app.client_form.editing;

    let service = ClientService::new(app.storage);
    let saved = match editing {
        Some(id) => {
            // Trading code never changes through the editor
            service
                .update(id, None, Some(&name), Some(&mobile), Some(&email))
                .map_err(|e| e.to_string())?;
            // Account status first; it resets workflow values on change,
            // which the calling status call below then re-applies.
            service
                .set_account_status(id, account_status)
                .map_err(|e| e.to_string())?;
            service
                .set_calling_status(id, calling_status, &values)
                .map_err(|e| e.to_string())?
        }
        None => {
            let mut saved = service
                .create(&code, &name, &mobile, Some(&email))
                .map_err(|e| e.to_string())?;
            if account_status != AccountStatus::Active {
                saved = service
                    .set_account_status(saved.id, account_status)
                    .map_err(|e| e.to_string())?;
            }
            if calling_status != CallingStatus::NotCalled {
                saved = service
                    .set_calling_status(saved.id, calling_status, &values)
                    .map_err(|e| e.to_string())?;
            }
            saved
        }
    };

    let verb = if editing.is_some() { "updated" } else { "added" };
    app.close_dialog();
    app.refresh_clients();
    app.set_status(format!("Client '{}' {}", saved.trading_code, verb));
    Ok(())
}
