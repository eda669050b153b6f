//! trailscope - Terminal-based audit trail inspector
//!
//! This library provides the core functionality for trailscope, a terminal
//! client for the audit trail the platform records against every tracked
//! client. It pairs a local client roster with the platform's audit-log
//! API and exposes both a CLI and an interactive TUI.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (clients, statuses, conditional fields)
//! - `storage`: JSON file storage for the client roster
//! - `services`: Business logic layer
//! - `api`: HTTP client for the platform's audit endpoints
//! - `audit`: Audit entry model, filters, and the viewer session
//! - `export`: CSV, JSON, and YAML export writers
//! - `display`: Terminal output formatting
//! - `cli`: Command handlers
//! - `tui`: Interactive terminal interface
//!
//! # Example
//!
//! ```rust,ignore
//! use trailscope::config::{paths::TrailPaths, settings::Settings};
//!
//! let paths = TrailPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::TrailError;
