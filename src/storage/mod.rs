//! Persistence Layer
//!
//! File-backed storage for user data.

pub mod settings_store;

pub use settings_store::SettingsStore;
