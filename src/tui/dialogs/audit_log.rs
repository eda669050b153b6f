//! Audit trail overlay
//!
//! Shows the paginated change history of one client, fetched from the
//! platform API in the background. A filter panel opens on top of the
//! overlay; pagination and filtering both go through the viewer session.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::audit::{
    AuditAction, AuditFilters, AuditLogEntry, ViewerState, EMPTY_VALUE_PLACEHOLDER,
};
use crate::tui::app::App;
use crate::tui::layout::{centered_rect, centered_rect_fixed};
use crate::tui::widgets::{render_field, TextInput};

/// Action filter choices in selector order; `None` matches every action
const ACTION_CHOICES: &[Option<AuditAction>] = &[
    None,
    Some(AuditAction::Create),
    Some(AuditAction::Update),
    Some(AuditAction::Delete),
];

/// Badge color for an action; every variant maps to a color
pub fn action_color(action: AuditAction) -> Color {
    match action {
        AuditAction::Update => Color::Blue,
        AuditAction::Create => Color::Green,
        AuditAction::Delete => Color::Red,
        AuditAction::Unknown => Color::Gray,
    }
}

/// Focusable fields of the filter panel, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Action,
    Actor,
    From,
    To,
}

/// State of the audit filter form
#[derive(Debug, Clone)]
pub struct FilterFormState {
    /// Field currently holding focus
    pub focused_field: FilterField,
    /// Index into [`ACTION_CHOICES`]
    pub action_index: usize,
    pub actor_input: TextInput,
    pub from_input: TextInput,
    pub to_input: TextInput,
    /// Validation error shown at the bottom of the panel
    pub error_message: Option<String>,
}

impl FilterFormState {
    pub fn new() -> Self {
        Self {
            focused_field: FilterField::Action,
            action_index: 0,
            actor_input: TextInput::new().label("Actor").placeholder("any"),
            from_input: TextInput::new().label("From").placeholder("YYYY-MM-DD"),
            to_input: TextInput::new().label("To").placeholder("YYYY-MM-DD"),
            error_message: None,
        }
    }

    /// Form prefilled from the filters currently applied
    pub fn from_filters(filters: &AuditFilters) -> Self {
        let mut form = Self::new();
        form.action_index = ACTION_CHOICES
            .iter()
            .position(|choice| *choice == filters.action)
            .unwrap_or(0);
        if let Some(actor) = &filters.actor {
            form.actor_input = TextInput::new()
                .label("Actor")
                .placeholder("any")
                .content(actor.as_str());
        }
        if let Some(from) = filters.from {
            form.from_input = TextInput::new()
                .label("From")
                .placeholder("YYYY-MM-DD")
                .content(from.to_string());
        }
        if let Some(to) = filters.to {
            form.to_input = TextInput::new()
                .label("To")
                .placeholder("YYYY-MM-DD")
                .content(to.to_string());
        }
        form
    }

    /// Action the selector currently points at
    pub fn selected_action(&self) -> Option<AuditAction> {
        ACTION_CHOICES[self.action_index % ACTION_CHOICES.len()]
    }

    /// Selector value as shown in the panel
    pub fn selected_action_label(&self) -> String {
        match self.selected_action() {
            Some(action) => action.to_string(),
            None => "All".to_string(),
        }
    }

    pub fn next_action(&mut self) {
        self.action_index = (self.action_index + 1) % ACTION_CHOICES.len();
    }

    pub fn prev_action(&mut self) {
        self.action_index = (self.action_index + ACTION_CHOICES.len() - 1) % ACTION_CHOICES.len();
    }

    pub fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            FilterField::Action => FilterField::Actor,
            FilterField::Actor => FilterField::From,
            FilterField::From => FilterField::To,
            FilterField::To => FilterField::Action,
        };
    }

    pub fn prev_field(&mut self) {
        self.focused_field = match self.focused_field {
            FilterField::Action => FilterField::To,
            FilterField::Actor => FilterField::Action,
            FilterField::From => FilterField::Actor,
            FilterField::To => FilterField::From,
        };
    }

    /// Text input holding focus, if the focused field is one
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused_field {
            FilterField::Action => None,
            FilterField::Actor => Some(&mut self.actor_input),
            FilterField::From => Some(&mut self.from_input),
            FilterField::To => Some(&mut self.to_input),
        }
    }

    /// Build filter criteria from the form.
    ///
    /// A blank actor counts as unset; dates must parse as YYYY-MM-DD.
    pub fn build(&self) -> Result<AuditFilters, String> {
        let actor = self.actor_input.value().trim();
        Ok(AuditFilters {
            action: self.selected_action(),
            actor: if actor.is_empty() {
                None
            } else {
                Some(actor.to_string())
            },
            from: parse_date_field(self.from_input.value(), "from")?,
            to: parse_date_field(self.to_input.value(), "to")?,
        })
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}

impl Default for FilterFormState {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_date_field(raw: &str, which: &str) -> Result<Option<NaiveDate>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Invalid {} date (use YYYY-MM-DD)", which))
}

/// Render the audit trail overlay
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(84, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Audit Trail - {} ", app.audit.display_code()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    match app.audit.state() {
        ViewerState::Loading => render_notice(frame, chunks[0], "Loading audit history..."),
        ViewerState::Loaded => render_entries(frame, chunks[0], app),
        _ => render_notice(frame, chunks[0], "No audit logs found."),
    }
    render_footer(frame, chunks[1], app);

    if app.audit.filter_panel_open() {
        render_filter_panel(frame, app);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(format!("\n{}", text))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_entries(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app.audit.entries().iter().map(entry_item).collect();
    let mut state = ListState::default();
    state.select(Some(app.audit_scroll.min(items.len().saturating_sub(1))));

    let list = List::new(items).highlight_symbol("▶ ");
    frame.render_stateful_widget(list, area, &mut state);
}

/// One audit entry as a multi-line list item
fn entry_item(entry: &AuditLogEntry) -> ListItem<'static> {
    let actor = match &entry.actor_contact {
        Some(contact) => format!("{} ({})", entry.actor, contact),
        None => entry.actor.clone(),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(entry.format_created_at(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(
            format!("{:<7}", entry.action.to_string()),
            Style::default()
                .fg(action_color(entry.action))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(actor, Style::default().fg(Color::White)),
    ])];

    for change in &entry.changes {
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!("{}: ", change.label()),
                Style::default().fg(Color::Cyan),
            ),
            value_span(change.display_old(), Color::Red),
            Span::styled(" → ", Style::default().fg(Color::DarkGray)),
            value_span(change.display_new(), Color::Green),
        ]));
    }

    if let Some(metadata) = &entry.metadata {
        if let Some(ip) = &metadata.ip_address {
            lines.push(Line::from(Span::styled(
                format!("    from {}", ip),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    ListItem::new(lines)
}

/// Span for a before/after value; the blank placeholder renders dimmed
/// instead of in the old/new color
fn value_span(value: &str, color: Color) -> Span<'static> {
    if value == EMPTY_VALUE_PLACEHOLDER {
        Span::styled(
            value.to_string(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(value.to_string(), Style::default().fg(color))
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut left = format!(" Page {} of {}", app.audit.page(), app.audit.total_pages());
    if let Some(total) = app.audit.total_logs() {
        left.push_str(&format!("  ({} entries)", total));
    }

    let mut spans = vec![Span::styled(left, Style::default().fg(Color::Gray))];
    if !app.audit.filters().is_empty() {
        spans.push(Span::styled("  filtered", Style::default().fg(Color::Yellow)));
    }

    // Paging controls dim out at the bounds
    let dim = Style::default().fg(Color::DarkGray);
    let prev_style = if app.audit.can_prev_page() {
        Style::default().fg(Color::White)
    } else {
        dim
    };
    let next_style = if app.audit.can_next_page() {
        Style::default().fg(Color::White)
    } else {
        dim
    };
    let right = [
        Span::styled("[:Prev", prev_style),
        Span::styled("  ", dim),
        Span::styled("]:Next", next_style),
        Span::styled("  f:Filter  F:Clear  x:Export  Esc:Close ", dim),
    ];

    let used: usize = spans
        .iter()
        .chain(right.iter())
        .map(|s| s.content.chars().count())
        .sum();
    spans.push(Span::raw(
        " ".repeat((area.width as usize).saturating_sub(used)),
    ));
    spans.extend(right);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_filter_panel(frame: &mut Frame, app: &App) {
    let form = &app.filter_form;
    let area = centered_rect_fixed(46, 9, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Filter Audit Trail ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(1), // action
            Constraint::Length(1), // actor
            Constraint::Length(1), // from
            Constraint::Length(1), // to
            Constraint::Length(1),
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

    render_action_line(frame, chunks[0], form);
    render_field(
        frame,
        chunks[1],
        &form.actor_input,
        form.focused_field == FilterField::Actor,
    );
    render_field(
        frame,
        chunks[2],
        &form.from_input,
        form.focused_field == FilterField::From,
    );
    render_field(
        frame,
        chunks[3],
        &form.to_input,
        form.focused_field == FilterField::To,
    );

    if let Some(error) = &form.error_message {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[5],
        );
    }

    frame.render_widget(
        Paragraph::new("[Enter] Apply  [Esc] Cancel")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[6],
    );
}

fn render_action_line(frame: &mut Frame, area: Rect, form: &FilterFormState) {
    let focused = form.focused_field == FilterField::Action;
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![
        Span::styled(format!("{:<18}", "Action"), label_style),
        Span::styled(
            form.selected_action_label(),
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

/// Handle key input for the audit overlay.
/// Returns true if the key was handled.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if app.audit.filter_panel_open() {
        handle_filter_key(app, key)
    } else {
        handle_overlay_key(app, key)
    }
}

fn handle_overlay_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
            true
        }
        KeyCode::Left | KeyCode::Char('[') => {
            app.audit.prev_page();
            app.audit_scroll = 0;
            true
        }
        KeyCode::Right | KeyCode::Char(']') => {
            app.audit.next_page();
            app.audit_scroll = 0;
            true
        }
        KeyCode::Char('f') => {
            app.filter_form = FilterFormState::from_filters(app.audit.filters());
            app.audit.toggle_filter_panel();
            true
        }
        KeyCode::Char('F') => {
            if !app.audit.filters().is_empty() {
                app.audit.apply_filters(AuditFilters::default());
                app.audit_scroll = 0;
            }
            true
        }
        KeyCode::Char('x') => {
            app.start_export();
            true
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.audit_scroll + 1 < app.audit.entries().len() {
                app.audit_scroll += 1;
            }
            true
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.audit_scroll = app.audit_scroll.saturating_sub(1);
            true
        }
        _ => false,
    }
}

fn handle_filter_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.audit.toggle_filter_panel();
            true
        }
        KeyCode::Enter => {
            match app.filter_form.build() {
                Ok(filters) => {
                    app.audit.apply_filters(filters);
                    app.audit.toggle_filter_panel();
                    app.audit_scroll = 0;
                }
                Err(message) => app.filter_form.set_error(message),
            }
            true
        }
        KeyCode::Tab => {
            app.filter_form.clear_error();
            app.filter_form.next_field();
            true
        }
        KeyCode::BackTab => {
            app.filter_form.clear_error();
            app.filter_form.prev_field();
            true
        }
        KeyCode::Up => {
            if app.filter_form.focused_field == FilterField::Action {
                app.filter_form.prev_action();
            }
            true
        }
        KeyCode::Down => {
            if app.filter_form.focused_field == FilterField::Action {
                app.filter_form.next_action();
            }
            true
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(input) = app.filter_form.focused_input() {
                input.insert(c);
                app.filter_form.clear_error();
            }
            true
        }
        KeyCode::Backspace => {
            if let Some(input) = app.filter_form.focused_input() {
                input.backspace();
                app.filter_form.clear_error();
            }
            true
        }
        KeyCode::Delete => {
            if let Some(input) = app.filter_form.focused_input() {
                input.delete();
            }
            true
        }
        KeyCode::Left => {
            if let Some(input) = app.filter_form.focused_input() {
                input.move_left();
            }
            true
        }
        KeyCode::Right => {
            if let Some(input) = app.filter_form.focused_input() {
                input.move_right();
            }
            true
        }
        KeyCode::Home => {
            if let Some(input) = app.filter_form.focused_input() {
                input.move_start();
            }
            true
        }
        KeyCode::End => {
            if let Some(input) = app.filter_form.focused_input() {
                input.move_end();
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_has_a_badge_color() {
        assert_eq!(action_color(AuditAction::Update), Color::Blue);
        assert_eq!(action_color(AuditAction::Create), Color::Green);
        assert_eq!(action_color(AuditAction::Delete), Color::Red);
        assert_eq!(action_color(AuditAction::Unknown), Color::Gray);
    }

    #[test]
    fn test_entry_item_has_header_and_one_row_per_change() {
        use crate::audit::ChangeRecord;

        let entry = AuditLogEntry {
            id: "a1".to_string(),
            entity_id: "c1".to_string(),
            display_code: Some("ACME".to_string()),
            action: AuditAction::Update,
            actor: "jane".to_string(),
            actor_contact: None,
            changes: vec![ChangeRecord {
                field: "name".to_string(),
                field_label: Some("Name".to_string()),
                old_value: Some("Acme".to_string()),
                new_value: Some("Acme Ltd".to_string()),
            }],
            metadata: None,
            created_at: "2025-03-05T14:30:00Z".parse().unwrap(),
        };

        let item = entry_item(&entry);
        assert_eq!(item.height(), 2);
    }

    #[test]
    fn test_value_span_dims_the_placeholder() {
        let real = value_span("Acme", Color::Red);
        assert_eq!(real.style.fg, Some(Color::Red));

        let blank = value_span(EMPTY_VALUE_PLACEHOLDER, Color::Red);
        assert_eq!(blank.style.fg, Some(Color::DarkGray));
        assert!(blank.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_blank_form_builds_empty_filters() {
        let form = FilterFormState::new();
        let filters = form.build().unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_build_rejects_bad_date() {
        let mut form = FilterFormState::new();
        form.from_input = form.from_input.clone().content("03/01/2025");

        let err = form.build().unwrap_err();
        assert!(err.contains("from date"));
    }

    #[test]
    fn test_build_ignores_blank_actor() {
        let mut form = FilterFormState::new();
        form.actor_input = form.actor_input.clone().content("   ");

        let filters = form.build().unwrap();
        assert!(filters.actor.is_none());
    }

    #[test]
    fn test_from_filters_roundtrip() {
        let filters = AuditFilters {
            action: Some(AuditAction::Delete),
            actor: Some("jane".to_string()),
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 3, 31),
        };

        let form = FilterFormState::from_filters(&filters);
        assert_eq!(form.build().unwrap(), filters);
    }

    #[test]
    fn test_action_selector_wraps() {
        let mut form = FilterFormState::new();
        assert_eq!(form.selected_action(), None);

        for _ in 0..ACTION_CHOICES.len() {
            form.next_action();
        }
        assert_eq!(form.selected_action(), None);

        form.prev_action();
        assert_eq!(form.selected_action(), Some(AuditAction::Delete));
    }
}
