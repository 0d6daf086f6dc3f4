//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod api;
pub mod conversation;
pub mod folder;
pub mod prompt;
pub mod settings;

pub use api::*;
pub use conversation::*;
pub use folder::*;
pub use prompt::*;
pub use settings::*;
