//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables and detail views.

pub mod client;
pub mod history;

pub use client::{format_client_details, format_client_list, format_roster_stats};
pub use history::{format_history_entry, format_history_page};
