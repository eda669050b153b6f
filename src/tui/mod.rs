//! Terminal user interface
//!
//! Interactive roster browser with the audit trail overlay. Network
//! fetches and exports run on background threads so the UI never blocks
//! on the platform API.

pub mod app;
pub mod dialogs;
pub mod event;
pub mod handler;
pub mod layout;
pub mod terminal;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;
