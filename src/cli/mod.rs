//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service and API layers.

pub mod client;
pub mod export;
pub mod history;

pub use client::{handle_client_command, ClientCommands};
pub use export::{handle_export_command, ExportCommands};
pub use history::{handle_history_command, HistoryCommands};
