//! Path management for trailscope
//!
//! Provides XDG-compliant path resolution for configuration, roster data,
//! exports, and the operator log.
//!
//! ## Path Resolution Order
//!
//! 1. `TRAILSCOPE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/trailscope` or `~/.config/trailscope`
//! 3. Windows: `%APPDATA%\trailscope`

use std::path::PathBuf;

use crate::error::TrailError;

/// Manages all paths used by trailscope
#[derive(Debug, Clone)]
pub struct TrailPaths {
    /// Base directory for all trailscope data
    base_dir: PathBuf,
}

impl TrailPaths {
    /// Create a new TrailPaths instance
    ///
    /// Path resolution:
    /// 1. `TRAILSCOPE_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/trailscope` or `~/.config/trailscope`
    /// 3. Windows: `%APPDATA%\trailscope`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TrailError> {
        let base_dir = if let Ok(custom) = std::env::var("TRAILSCOPE_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TrailPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/trailscope/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/trailscope/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the export directory (~/.config/trailscope/exports/)
    ///
    /// Default destination for audit exports triggered from the TUI.
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the client roster file
    pub fn roster_file(&self) -> PathBuf {
        self.data_dir().join("clients.json")
    }

    /// Get the path to the operator log file
    ///
    /// The TUI logs here instead of stderr so fetch failures stay off the
    /// alternate screen.
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("trailscope.log")
    }

    /// Ensure all required directories exist
    ///
    /// Creates:
    /// - Base directory (~/.config/trailscope/)
    /// - Data directory (~/.config/trailscope/data/)
    /// - Export directory (~/.config/trailscope/exports/)
    pub fn ensure_directories(&self) -> Result<(), TrailError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TrailError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TrailError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir())
            .map_err(|e| TrailError::Io(format!("Failed to create export directory: {}", e)))?;

        Ok(())
    }

    /// Check if trailscope has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TrailError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| TrailError::Config("Could not determine home directory".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("trailscope"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TrailError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TrailError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("trailscope"))
}
