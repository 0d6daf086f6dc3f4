//! Folder Model
//!
//! A folder groups either conversations or prompts, never both. The
//! kind serializes as `type` on the wire and doubles as the tag that
//! distinguishes folders from plain items inside the untagged item
//! enums.

use serde::{Deserialize, Serialize};

/// The kind of a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    Chat,
    Prompt,
}

/// A named grouping container for conversations or prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder id
    pub id: String,
    /// The title shown in the sidebar
    pub title: String,
    /// The kind of items this folder groups
    #[serde(rename = "type")]
    pub kind: FolderKind,
}

impl Folder {
    /// Create a folder of the given kind.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: FolderKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
        }
    }
}
