//! TOML-backed preference store with an explicit load/save lifecycle.

use std::path::{Path, PathBuf};

use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::{Preferences, StoreError};

/// Default preference file name.
pub const DEFAULT_PREFS_FILE: &str = "gridcraft.toml";

/// Owns the preference file and its in-memory copy.
#[derive(Debug, Clone, Getters)]
pub struct PreferenceStore {
    path: PathBuf,
    preferences: Preferences,
}

impl PreferenceStore {
    /// Reads preferences from `path`; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            info!("No preference file, using defaults");
            return Ok(Self {
                path,
                preferences: Preferences::default(),
            });
        }

        debug!("Loading preferences from file");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::new(format!("Failed to read preferences: {}", e)))?;
        let preferences: Preferences = toml::from_str(&content)
            .map_err(|e| StoreError::new(format!("Failed to parse preferences: {}", e)))?;

        if let Err(e) = preferences.validate() {
            warn!(error = %e, "Stored preferences do not describe a playable match");
        }
        info!(size = preferences.board_size(), "Preferences loaded");
        Ok(Self { path, preferences })
    }

    /// Writes the in-memory preferences to disk.
    ///
    /// # Errors
    ///
    /// Fails when serialization or the write fails.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&self) -> Result<(), StoreError> {
        let content = toml::to_string_pretty(&self.preferences)
            .map_err(|e| StoreError::new(format!("Failed to serialize preferences: {}", e)))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(format!("Failed to create directory: {}", e)))?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| StoreError::new(format!("Failed to write preferences: {}", e)))?;
        debug!("Preferences saved");
        Ok(())
    }

    /// Applies a change and saves it.
    ///
    /// The change is kept in memory only if the result validates and the
    /// write succeeds.
    ///
    /// # Errors
    ///
    /// Returns the validation or write failure; the stored value is unchanged.
    #[instrument(skip(self, change))]
    pub fn update<F>(&mut self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Preferences),
    {
        let previous = self.preferences.clone();
        change(&mut self.preferences);
        let result = self.preferences.validate().and_then(|()| self.save());
        if let Err(e) = &result {
            warn!(error = %e, "Discarding preference change");
            self.preferences = previous;
        }
        result
    }

    /// Replaces the whole value and saves it.
    ///
    /// # Errors
    ///
    /// See [`PreferenceStore::update`].
    pub fn replace(&mut self, preferences: Preferences) -> Result<(), StoreError> {
        self.update(|current| *current = preferences)
    }
}
