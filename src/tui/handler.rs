//! Event handling for the TUI
//!
//! Routes events to the active dialog, the search box, or the roster,
//! and feeds background worker results into the application state.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::AccountStatus;
use crate::services::ClientService;
use crate::tui::app::{ActiveDialog, App};
use crate::tui::event::Event;

/// Apply one event to the application state
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::AuditPage { generation, result } => {
            app.audit.apply_response(generation, result);
            if app.audit_scroll >= app.audit.entries().len() {
                app.audit_scroll = 0;
            }
            Ok(())
        }
        Event::ExportDone { result } => {
            app.finish_export(result);
            Ok(())
        }
        Event::Tick | Event::Mouse(_) | Event::Resize(_, _) => Ok(()),
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if app.has_dialog() {
        return handle_dialog_key(app, key);
    }
    if app.search_active {
        return handle_search_key(app, key);
    }
    handle_roster_key(app, key)
}

/// Handle keys while the roster table has focus
fn handle_roster_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(client) = app.selected_client() {
                let message = format!(
                    "Delete client '{}' ({})? This cannot be undone.",
                    client.name, client.trading_code
                );
                app.open_dialog(ActiveDialog::Confirm(message));
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),
        KeyCode::Char('/') => {
            app.search_active = true;
            app.clear_status();
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.selected_index = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.selected_index = app.clients.len().saturating_sub(1);
        }
        KeyCode::Char('a') | KeyCode::Char('n') => app.open_dialog(ActiveDialog::AddClient),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(client) = app.selected_client() {
                let id = client.id;
                app.open_dialog(ActiveDialog::EditClient(id));
            }
        }
        KeyCode::Char('v') => app.open_audit_for_selected(),
        KeyCode::Char('t') => toggle_account_status(app),
        KeyCode::Char('s') => app.cycle_status_filter(),
        KeyCode::Char('r') => reload_roster(app),
        _ => {}
    }
    Ok(())
}

/// Handle keys while the search box has focus
fn handle_search_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            app.search_input.clear();
            app.search_active = false;
            app.selected_index = 0;
            app.refresh_clients();
        }
        KeyCode::Enter | KeyCode::Down => app.search_active = false,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input.insert(c);
            app.selected_index = 0;
            app.refresh_clients();
        }
        KeyCode::Backspace => {
            app.search_input.backspace();
            app.selected_index = 0;
            app.refresh_clients();
        }
        KeyCode::Delete => {
            app.search_input.delete();
            app.selected_index = 0;
            app.refresh_clients();
        }
        KeyCode::Left => app.search_input.move_left(),
        KeyCode::Right => app.search_input.move_right(),
        KeyCode::Home => app.search_input.move_start(),
        KeyCode::End => app.search_input.move_end(),
        _ => {}
    }
    Ok(())
}

/// Handle keys when a dialog is open
fn handle_dialog_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match &app.active_dialog {
        ActiveDialog::Help => {
            // Close help on any key
            app.close_dialog();
        }
        ActiveDialog::AddClient | ActiveDialog::EditClient(_) => {
            super::dialogs::client_editor::handle_key(app, key);
        }
        ActiveDialog::AuditLog => {
            super::dialogs::audit_log::handle_key(app, key);
        }
        ActiveDialog::Confirm(message) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let message = message.clone();
                app.close_dialog();
                execute_confirmed_action(app, &message);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        ActiveDialog::None => {}
    }
    Ok(())
}

/// Run the action a confirmation dialog approved
fn execute_confirmed_action(app: &mut App, message: &str) {
    if message.starts_with("Delete client") {
        delete_selected_client(app);
    }
}

fn delete_selected_client(app: &mut App) {
    let Some(client) = app.selected_client().cloned() else {
        return;
    };
    let service = ClientService::new(app.storage);
    match service.delete(client.id) {
        Ok(()) => {
            app.refresh_clients();
            app.set_status(format!("Client '{}' deleted", client.trading_code));
        }
        Err(err) => app.set_status(format!("Failed to delete client: {}", err)),
    }
}

fn toggle_account_status(app: &mut App) {
    let Some(client) = app.selected_client() else {
        return;
    };
    let id = client.id;
    let target = match client.account_status {
        AccountStatus::Active => AccountStatus::Inactive,
        AccountStatus::Inactive => AccountStatus::Active,
    };
    let service = ClientService::new(app.storage);
    match service.set_account_status(id, target) {
        Ok(updated) => {
            app.refresh_clients();
            app.set_status(format!(
                "Client '{}' is now {}",
                updated.trading_code, updated.account_status
            ));
        }
        Err(err) => app.set_status(format!("Failed to update status: {}", err)),
    }
}

fn reload_roster(app: &mut App) {
    match app.storage.clients.load() {
        Ok(()) => {
            app.refresh_clients();
            app.set_status("Roster reloaded from disk");
        }
        Err(err) => app.set_status(format!("Failed to reload roster: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, TrailPaths};
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn create_test_env() -> (TempDir, Storage, Settings) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrailPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage, Settings::default())
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_quit_key() {
        let (_tmp, storage, settings) = create_test_env();
        let paths = storage.paths().clone();
        let mut app = App::new(&storage, &settings, &paths);

        handle_event(&mut app, press(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_search_mode_captures_keys() {
        let (_tmp, storage, settings) = create_test_env();
        let paths = storage.paths().clone();
        let mut app = App::new(&storage, &settings, &paths);

        handle_event(&mut app, press(KeyCode::Char('/'))).unwrap();
        assert!(app.search_active);

        // 'q' goes into the query instead of quitting
        handle_event(&mut app, press(KeyCode::Char('q'))).unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.search_input.value(), "q");

        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert!(!app.search_active);
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn test_delete_flow_requires_confirmation() {
        let (_tmp, storage, settings) = create_test_env();
        let service = ClientService::new(&storage);
        service
            .create("ACME01", "Acme Trading", "+8801700000001", None)
            .unwrap();

        let paths = storage.paths().clone();
        let mut app = App::new(&storage, &settings, &paths);
        app.refresh_clients();
        assert_eq!(app.clients.len(), 1);

        handle_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
        )
        .unwrap();
        assert!(matches!(app.active_dialog, ActiveDialog::Confirm(_)));

        // Declining keeps the client
        handle_event(&mut app, press(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.active_dialog, ActiveDialog::None);
        assert_eq!(app.clients.len(), 1);

        // Confirming deletes it
        handle_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
        )
        .unwrap();
        handle_event(&mut app, press(KeyCode::Char('y'))).unwrap();
        assert!(app.clients.is_empty());
        assert_eq!(storage.clients.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_overlay_opens_for_selected_client() {
        let (_tmp, storage, settings) = create_test_env();
        let service = ClientService::new(&storage);
        let client = service
            .create("ACME01", "Acme Trading", "+8801700000001", None)
            .unwrap();

        let paths = storage.paths().clone();
        let mut app = App::new(&storage, &settings, &paths);
        app.refresh_clients();

        handle_event(&mut app, press(KeyCode::Char('v'))).unwrap();
        assert_eq!(app.active_dialog, ActiveDialog::AuditLog);
        assert!(app.audit.is_open());
        assert_eq!(app.audit.entity_id(), client.id.to_string());

        // The session queued the first-page fetch
        let request = app.audit.take_request().unwrap();
        assert_eq!(request.page, 1);

        // Esc closes and discards the session
        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.active_dialog, ActiveDialog::None);
        assert!(!app.audit.is_open());
    }

    #[test]
    fn test_audit_overlay_stacks_over_editor() {
        let (_tmp, storage, settings) = create_test_env();
        let service = ClientService::new(&storage);
        let client = service
            .create("ACME01", "Acme Trading", "+8801700000001", None)
            .unwrap();

        let paths = storage.paths().clone();
        let mut app = App::new(&storage, &settings, &paths);
        app.refresh_clients();

        handle_event(&mut app, press(KeyCode::Char('e'))).unwrap();
        assert_eq!(app.active_dialog, ActiveDialog::EditClient(client.id));

        handle_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)),
        )
        .unwrap();
        assert_eq!(app.active_dialog, ActiveDialog::AuditLog);
        assert!(app.audit.is_open());
        assert_eq!(
            app.suspended_dialog,
            Some(ActiveDialog::EditClient(client.id))
        );

        // Closing the overlay hands focus back to the editor
        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.active_dialog, ActiveDialog::EditClient(client.id));
        assert!(!app.audit.is_open());
        assert!(app.suspended_dialog.is_none());

        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.active_dialog, ActiveDialog::None);
    }

    #[test]
    fn test_stale_audit_response_is_dropped() {
        let (_tmp, storage, settings) = create_test_env();
        let service = ClientService::new(&storage);
        service
            .create("ACME01", "Acme Trading", "+8801700000001", None)
            .unwrap();

        let paths = storage.paths().clone();
        let mut app = App::new(&storage, &settings, &paths);
        app.refresh_clients();

        handle_event(&mut app, press(KeyCode::Char('v'))).unwrap();
        let request = app.audit.take_request().unwrap();

        // Close before the response lands
        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        handle_event(
            &mut app,
            Event::AuditPage {
                generation: request.generation,
                result: Err(crate::error::TrailError::Api("timeout".to_string())),
            },
        )
        .unwrap();

        assert!(!app.audit.is_open());
        assert!(app.audit.entries().is_empty());
    }

    #[test]
    fn test_toggle_account_status() {
        let (_tmp, storage, settings) = create_test_env();
        let service = ClientService::new(&storage);
        service
            .create("ACME01", "Acme Trading", "+8801700000001", None)
            .unwrap();

        let paths = storage.paths().clone();
        let mut app = App::new(&storage, &settings, &paths);
        app.refresh_clients();

        handle_event(&mut app, press(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.clients[0].account_status, AccountStatus::Inactive);

        handle_event(&mut app, press(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.clients[0].account_status, AccountStatus::Active);
    }
}
