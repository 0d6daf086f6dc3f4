//! promptdeck
//!
//! Backend for a prompt-library chat UI: placeholder templates with
//! typed variables, a folder/item settings tree with file persistence,
//! and an HTTP API that answers conversations through a pluggable chat
//! backend (OpenAI or an offline echo).

pub mod models;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

pub use utils::error::{AppError, AppResult};
