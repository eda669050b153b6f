//! Terminal setup and teardown
//!
//! Initializes and restores the terminal, including the panic hook that
//! restores it on crash, and runs the main event loop with its
//! background fetch and export workers.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::panic;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::api::{ApiConfig, AuditApi};
use crate::audit::FetchRequest;
use crate::config::{Settings, TrailPaths};
use crate::error::{TrailError, TrailResult};
use crate::export::csv::write_audit_csv;
use crate::export::export_filename;
use crate::storage::Storage;

use super::app::{App, ExportRequest};
use super::event::{Event, EventHandler, ExportOutcome};
use super::handler::handle_event;

/// Type alias for the terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    // Restore the terminal before printing panic info
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal_impl();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    restore_terminal_impl()?;
    Ok(())
}

fn restore_terminal_impl() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application
pub fn run_tui(storage: &Storage, settings: &Settings, paths: &TrailPaths) -> Result<()> {
    let api = Arc::new(AuditApi::new(&ApiConfig::from_settings(settings))?);

    let mut terminal = init_terminal()?;

    let mut app = App::new(storage, settings, paths);
    app.refresh_clients();

    let events = EventHandler::default();

    loop {
        // Hand fetches and exports queued by the last event to workers
        dispatch_workers(&mut app, &api, &events);

        terminal.draw(|frame| {
            super::views::render(frame, &app);
        })?;

        let event = events.next()?;
        handle_event(&mut app, event)?;

        if app.should_quit {
            break;
        }
    }

    restore_terminal()?;

    Ok(())
}

fn dispatch_workers(app: &mut App, api: &Arc<AuditApi>, events: &EventHandler) {
    if let Some(request) = app.audit.take_request() {
        spawn_page_fetch(Arc::clone(api), events.sender(), request);
    }
    if let Some(request) = app.take_export_request() {
        spawn_export(Arc::clone(api), events.sender(), request);
    }
}

/// Fetch one history page on a background thread.
///
/// The response goes back through the event channel tagged with the
/// request's generation so stale pages can be recognized and dropped.
fn spawn_page_fetch(api: Arc<AuditApi>, sender: mpsc::Sender<Event>, request: FetchRequest) {
    thread::spawn(move || {
        let result = api.fetch_page(
            &request.entity_id,
            request.page,
            request.limit,
            &request.filters,
        );
        let _ = sender.send(Event::AuditPage {
            generation: request.generation,
            result,
        });
    });
}

/// Run one export on a background thread
fn spawn_export(api: Arc<AuditApi>, sender: mpsc::Sender<Event>, request: ExportRequest) {
    thread::spawn(move || {
        let result = run_export(&api, &request);
        let _ = sender.send(Event::ExportDone { result });
    });
}

/// Fetch the flat export payload and write it as CSV
fn run_export(api: &AuditApi, request: &ExportRequest) -> TrailResult<ExportOutcome> {
    let payload = api.fetch_export(&request.entity_id, &request.filters)?;
    let rows = payload.data.len();

    let path = request
        .export_dir
        .join(export_filename(&request.display_code, "csv", Utc::now()));
    let file = File::create(&path).map_err(|e| {
        TrailError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    write_audit_csv(&payload, &mut writer)?;
    writer.flush().map_err(|e| {
        TrailError::Export(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(ExportOutcome { rows, path })
}
