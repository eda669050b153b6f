//! Configuration module for trailscope
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Environment overrides for the audit API endpoint

pub mod paths;
pub mod settings;

pub use paths::TrailPaths;
pub use settings::Settings;
