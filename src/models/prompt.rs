//! Prompt Models
//!
//! Data structures for the reusable prompt library. A prompt's content
//! may contain `{{...}}` placeholder markers; those are parsed on
//! demand by the template engine, never stored.

use serde::{Deserialize, Serialize};

use crate::models::folder::Folder;

/// A reusable prompt template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique prompt id
    pub id: String,
    /// Id of the containing folder, empty when at root level
    #[serde(default)]
    pub folder_id: String,
    /// The title shown in the sidebar
    pub title: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Raw template text, possibly containing placeholder markers
    #[serde(default)]
    pub content: String,
}

impl Prompt {
    /// Create an empty prompt.
    pub fn new(id: impl Into<String>, title: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            folder_id: folder_id.into(),
            title: title.into(),
            description: String::new(),
            content: String::new(),
        }
    }
}

/// An item in the prompt sidebar: either a folder or a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptItem {
    Folder(Folder),
    Prompt(Prompt),
}

impl PromptItem {
    /// The id of the underlying item.
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Prompt(prompt) => &prompt.id,
        }
    }

    /// The title of the underlying item.
    pub fn title(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.title,
            Self::Prompt(prompt) => &prompt.title,
        }
    }

    /// Returns the folder, if this item is one.
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Prompt(_) => None,
        }
    }

    /// Returns the prompt, if this item is one.
    pub fn as_prompt(&self) -> Option<&Prompt> {
        match self {
            Self::Folder(_) => None,
            Self::Prompt(prompt) => Some(prompt),
        }
    }
}
