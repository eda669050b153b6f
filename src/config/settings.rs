//! User settings for trailscope
//!
//! Manages persisted preferences: the audit API endpoint, request timeout,
//! and display formatting. The API base URL can be overridden per-invocation
//! with the `TRAILSCOPE_API_URL` environment variable; the override is
//! resolved once at startup, not re-read by individual components.

use serde::{Deserialize, Serialize};

use super::paths::TrailPaths;
use crate::error::TrailError;

/// Environment variable that overrides the persisted API base URL
pub const API_URL_ENV: &str = "TRAILSCOPE_API_URL";

/// Audit API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the audit-log API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User settings for trailscope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Audit API connection settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Timestamp format for rendered audit entries (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_base_url() -> String {
    // Local development address; production deployments set TRAILSCOPE_API_URL
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_date_format() -> String {
    "%d %b %Y %H:%M".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api: ApiSettings::default(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TrailPaths) -> Result<Self, TrailError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TrailError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| TrailError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TrailPaths) -> Result<(), TrailError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TrailError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| TrailError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The API base URL in effect: `TRAILSCOPE_API_URL` when set, otherwise
    /// the persisted (or default) value
    pub fn effective_base_url(&self) -> String {
        std::env::var(API_URL_ENV).unwrap_or_else(|_| self.api.base_url.clone())
    }

    /// Whether the base URL comes from the environment override
    pub fn base_url_from_env() -> bool {
        std::env::var(API_URL_ENV).is_ok()
    }
}
