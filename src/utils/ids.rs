//! Item ID Generation
//!
//! Sidebar items carry ids of the form `<prefix>:<millis>-<uuid4>`.
//! The timestamp keeps ids roughly sortable by creation time, the
//! UUID suffix rules out collisions within the same millisecond.

use chrono::Utc;
use uuid::Uuid;

/// Id prefix for conversations
pub const CONVERSATION_PREFIX: &str = "cc";
/// Id prefix for conversation folders
pub const CONVERSATION_FOLDER_PREFIX: &str = "ccf";
/// Id prefix for prompts
pub const PROMPT_PREFIX: &str = "cp";
/// Id prefix for prompt folders
pub const PROMPT_FOLDER_PREFIX: &str = "cpf";

/// Generate a fresh item id with the given prefix.
pub fn generate_id(prefix: &str) -> String {
    format!("{}:{}-{}", prefix, Utc::now().timestamp_millis(), Uuid::new_v4())
}
