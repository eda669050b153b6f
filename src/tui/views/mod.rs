//! View rendering
//!
//! Composes the frame: search box, roster table, status bar, and the
//! active dialog on top.

pub mod roster;
pub mod status_bar;

use ratatui::Frame;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::AppLayout;

/// Render the whole UI for one frame
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    roster::render_search(frame, app, layout.search);
    roster::render(frame, app, layout.main);
    status_bar::render(frame, app, layout.status_bar);

    match &app.active_dialog {
        ActiveDialog::AddClient | ActiveDialog::EditClient(_) => {
            dialogs::client_editor::render(frame, app);
        }
        ActiveDialog::AuditLog => {
            // The overlay can sit on top of the client editor; keep the
            // editor visible underneath
            if matches!(
                app.suspended_dialog,
                Some(ActiveDialog::AddClient | ActiveDialog::EditClient(_))
            ) {
                dialogs::client_editor::render(frame, app);
            }
            dialogs::audit_log::render(frame, app);
        }
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::Confirm(message) => dialogs::confirm::render(frame, message),
        ActiveDialog::None => {}
    }
}
