//! Cross-Platform Path Utilities
//!
//! Functions for resolving the application directory and the
//! settings file it contains.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Promptdeck directory (~/.promptdeck/)
pub fn promptdeck_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".promptdeck"))
}

/// Get the UI settings file path (~/.promptdeck/settings.json)
pub fn settings_path() -> AppResult<PathBuf> {
    Ok(promptdeck_dir()?.join("settings.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Promptdeck directory, creating if it doesn't exist
pub fn ensure_promptdeck_dir() -> AppResult<PathBuf> {
    let path = promptdeck_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}
