//! Persistence for the listings filter state
//!
//! The browser build keeps the serialized `Filters` under a single
//! local-storage entry; here the same payload lives in one JSON file. It
//! is read once at startup and rewritten after every mutation,
//! last-write-wins. A missing or corrupt file degrades to defaults and is
//! logged, never surfaced.

use crate::error::Result;
use crate::models::Filters;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed store for the single persisted `Filters` entry
#[derive(Debug, Clone)]
pub struct FilterStore {
    path: PathBuf,
}

impl FilterStore {
    /// Store backed by the given file path
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted filter state. Missing or unreadable content
    /// yields `Filters::default()`.
    #[must_use]
    pub fn load(&self) -> Filters {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(filters) => filters,
                Err(err) => {
                    debug!(path = %self.path.display(), %err, "corrupt filter state, using defaults");
                    Filters::default()
                }
            },
            Err(err) => {
                debug!(path = %self.path.display(), %err, "no persisted filter state, using defaults");
                Filters::default()
            }
        }
    }

    /// Rewrite the persisted entry with the current filter state
    ///
    /// # Errors
    /// Returns `ZivaasError::Io` when the file cannot be written
    pub fn save(&self, filters: &Filters) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(filters)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    /// Load, mutate and persist in one step, returning the new state
    ///
    /// # Errors
    /// Returns `ZivaasError::Io` when the rewrite fails
    pub fn update(&self, mutate: impl FnOnce(&mut Filters)) -> Result<Filters> {
        let mut filters = self.load();
        mutate(&mut filters);
        self.save(&filters)?;
        Ok(filters)
    }
}
