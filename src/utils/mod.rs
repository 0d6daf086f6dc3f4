//! Utility Functions
//!
//! Common utilities used throughout the application.

pub mod error;
pub mod ids;
pub mod json;
pub mod paths;

pub use error::{AppError, AppResult};
