//! Storage layer for trailscope
//!
//! JSON file storage for the client roster with atomic writes and
//! automatic directory creation.

pub mod file_io;
pub mod roster;

pub use file_io::{read_json, write_json_atomic};
pub use roster::RosterStore;

use crate::config::TrailPaths;
use crate::error::TrailError;

/// Storage coordinator owning the on-disk data files
pub struct Storage {
    paths: TrailPaths,
    pub clients: RosterStore,
}

impl Storage {
    /// Create a new Storage instance, making sure the directories exist
    pub fn new(paths: TrailPaths) -> Result<Self, TrailError> {
        paths.ensure_directories()?;

        Ok(Self {
            clients: RosterStore::new(paths.roster_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TrailPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TrailError> {
        self.clients.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TrailError> {
        self.clients.save()
    }
}
