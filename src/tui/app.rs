//! Application state for the TUI
//!
//! Holds the client roster view, the audit trail session, and whichever
//! dialog is currently open.

use std::path::PathBuf;

use crate::audit::{AuditFilters, ViewerSession};
use crate::config::{Settings, TrailPaths};
use crate::error::TrailError;
use crate::models::{AccountStatus, Client, ClientId};
use crate::services::ClientService;
use crate::storage::Storage;
use crate::tui::dialogs::audit_log::FilterFormState;
use crate::tui::dialogs::client_editor::ClientFormState;
use crate::tui::event::ExportOutcome;
use crate::tui::widgets::TextInput;

/// Currently open dialog, if any
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveDialog {
    /// No dialog open
    None,
    /// Add a new client
    AddClient,
    /// Edit the client with the given id
    EditClient(ClientId),
    /// Audit trail overlay for the selected client
    AuditLog,
    /// Keyboard reference
    Help,
    /// Yes/no confirmation with a message
    Confirm(String),
}

/// A CSV export waiting to be picked up by a background worker
#[derive(Debug)]
pub struct ExportRequest {
    /// Entity whose history is exported
    pub entity_id: String,
    /// Trading code used in the file name
    pub display_code: String,
    /// Filters forwarded to the export endpoint
    pub filters: AuditFilters,
    /// Directory the file is written into
    pub export_dir: PathBuf,
}

/// Top-level application state
pub struct App<'a> {
    /// Client roster storage
    pub storage: &'a Storage,
    /// Application settings
    pub settings: &'a Settings,
    /// Data directory paths
    pub paths: &'a TrailPaths,
    /// Set when the main loop should exit
    pub should_quit: bool,
    /// Currently open dialog
    pub active_dialog: ActiveDialog,
    /// Dialog the audit overlay is stacked on top of; restored when the
    /// overlay closes
    pub suspended_dialog: Option<ActiveDialog>,
    /// Audit trail viewing session
    pub audit: ViewerSession,
    /// Selected row inside the audit overlay
    pub audit_scroll: usize,
    /// Clients matching the current search and status filter
    pub clients: Vec<Client>,
    /// Selected row in the roster table
    pub selected_index: usize,
    /// Search query input
    pub search_input: TextInput,
    /// True while the search box has focus
    pub search_active: bool,
    /// Account status the roster is narrowed to
    pub status_filter: Option<AccountStatus>,
    /// Transient message shown in the status bar
    pub status_message: Option<String>,
    /// Client add/edit form
    pub client_form: ClientFormState,
    /// Audit filter form
    pub filter_form: FilterFormState,
    /// Export waiting for a worker
    pub pending_export: Option<ExportRequest>,
}

impl<'a> App<'a> {
    /// Create the application state; call [`App::refresh_clients`] before
    /// the first draw
    pub fn new(storage: &'a Storage, settings: &'a Settings, paths: &'a TrailPaths) -> Self {
        Self {
            storage,
            settings,
            paths,
            should_quit: false,
            active_dialog: ActiveDialog::None,
            suspended_dialog: None,
            audit: ViewerSession::new(),
            audit_scroll: 0,
            clients: Vec::new(),
            selected_index: 0,
            search_input: TextInput::new()
                .placeholder("Press / to search by code, name, mobile or email"),
            search_active: false,
            status_filter: None,
            status_message: None,
            client_form: ClientFormState::new(),
            filter_form: FilterFormState::new(),
            pending_export: None,
        }
    }

    /// Request the main loop to exit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Reload the roster view from storage, applying search and filter
    pub fn refresh_clients(&mut self) {
        let service = ClientService::new(self.storage);
        let mut clients = match service.search(self.search_input.value()) {
            Ok(clients) => clients,
            Err(err) => {
                tracing::error!(error = %err, "failed to load client roster");
                self.set_status(format!("Failed to load clients: {}", err));
                return;
            }
        };
        if let Some(status) = self.status_filter {
            clients.retain(|client| client.account_status == status);
        }
        self.clients = clients;
        if self.selected_index >= self.clients.len() {
            self.selected_index = self.clients.len().saturating_sub(1);
        }
    }

    /// Client under the cursor, if any
    pub fn selected_client(&self) -> Option<&Client> {
        self.clients.get(self.selected_index)
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.clients.len() {
            self.selected_index += 1;
        }
    }

    /// Advance the account status filter: all, active, inactive
    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(AccountStatus::Active),
            Some(AccountStatus::Active) => Some(AccountStatus::Inactive),
            Some(AccountStatus::Inactive) => None,
        };
        self.selected_index = 0;
        self.refresh_clients();
    }

    /// Open a dialog, initializing its form state
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        match &dialog {
            ActiveDialog::AddClient => {
                self.client_form = ClientFormState::new();
            }
            ActiveDialog::EditClient(id) => match self.storage.clients.get(*id) {
                Ok(Some(client)) => {
                    self.client_form = ClientFormState::from_client(&client);
                }
                Ok(None) => {
                    self.set_status(format!("Client {} no longer exists", id));
                    return;
                }
                Err(err) => {
                    self.set_status(format!("Failed to load client: {}", err));
                    return;
                }
            },
            _ => {}
        }
        self.active_dialog = dialog;
    }

    /// Open the audit trail overlay for the client under the cursor
    pub fn open_audit_for_selected(&mut self) {
        let Some(client) = self.selected_client() else {
            return;
        };
        let entity_id = client.id.to_string();
        let display_code = client.trading_code.clone();
        self.audit.open(entity_id, display_code);
        if self.audit.is_open() {
            self.audit_scroll = 0;
            self.suspended_dialog = None;
            self.active_dialog = ActiveDialog::AuditLog;
        }
    }

    /// Open the audit trail overlay for the client being edited, keeping
    /// the editor mounted underneath. A form that is adding a new client
    /// has no entity yet, so nothing opens.
    pub fn open_audit_from_editor(&mut self) {
        let Some(id) = self.client_form.editing else {
            return;
        };
        let client = match self.storage.clients.get(id) {
            Ok(Some(client)) => client,
            Ok(None) => return,
            Err(err) => {
                tracing::error!(error = %err, "client lookup for audit overlay failed");
                return;
            }
        };
        self.audit.open(client.id.to_string(), client.trading_code);
        if self.audit.is_open() {
            self.audit_scroll = 0;
            self.suspended_dialog = Some(self.active_dialog.clone());
            self.active_dialog = ActiveDialog::AuditLog;
        }
    }

    /// Close the active dialog, discarding any audit session state.
    ///
    /// Closing the audit overlay returns focus to the dialog it was
    /// stacked on, if any.
    pub fn close_dialog(&mut self) {
        if self.active_dialog == ActiveDialog::AuditLog {
            self.audit.close();
            if let Some(dialog) = self.suspended_dialog.take() {
                self.active_dialog = dialog;
                return;
            }
        }
        self.active_dialog = ActiveDialog::None;
    }

    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    /// Queue a CSV export of the open audit session
    pub fn start_export(&mut self) {
        if !self.audit.is_open() {
            return;
        }
        self.pending_export = Some(ExportRequest {
            entity_id: self.audit.entity_id().to_string(),
            display_code: self.audit.display_code().to_string(),
            filters: self.audit.filters().clone(),
            export_dir: self.paths.export_dir(),
        });
        self.set_status("Exporting audit history...");
    }

    /// Hand a queued export to the caller
    pub fn take_export_request(&mut self) -> Option<ExportRequest> {
        self.pending_export.take()
    }

    /// Record the outcome of a background export
    pub fn finish_export(&mut self, result: Result<ExportOutcome, TrailError>) {
        match result {
            Ok(outcome) => {
                self.set_status(format!(
                    "Exported {} entries to {}",
                    outcome.rows,
                    outcome.path.display()
                ));
            }
            Err(err) => {
                tracing::error!(error = %err, "audit export failed");
                self.clear_status();
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
