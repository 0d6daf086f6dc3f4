//! Settings Persistence
//!
//! Loads and saves the UI settings document as pretty-printed JSON
//! under the application directory (`~/.promptdeck/settings.json` by
//! default). Writes are skipped when the canonical form of the new
//! document equals what is already on disk, so reordered keys or
//! whitespace churn never touch the file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::settings::Settings;
use crate::utils::error::AppResult;
use crate::utils::json::canonical_eq;
use crate::utils::paths;

/// File-backed store for the settings document.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store over an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store over the default settings path.
    pub fn default_path() -> AppResult<Self> {
        Ok(Self::new(paths::settings_path()?))
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a settings document has been saved before.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the settings document. A missing file yields the default
    /// (empty) settings; use [`SettingsStore::exists`] to distinguish.
    pub fn load(&self) -> AppResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save the settings document unconditionally.
    pub fn save(&self, settings: &Settings) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            paths::ensure_dir(parent)?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Save only when the document differs from what is on disk,
    /// comparing canonical forms. Returns whether a write happened.
    pub fn save_if_changed(&self, settings: &Settings) -> AppResult<bool> {
        if self.path.exists() {
            let existing = fs::read_to_string(&self.path)?;
            if let Ok(on_disk) = serde_json::from_str::<serde_json::Value>(&existing) {
                if canonical_eq(&on_disk, settings) {
                    debug!(path = %self.path.display(), "settings unchanged, skipping write");
                    return Ok(false);
                }
            }
        }

        self.save(settings)?;
        Ok(true)
    }
}
