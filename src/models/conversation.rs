//! Conversation Models
//!
//! Data structures for chat conversations and their messages. Field
//! names serialize in camelCase to stay wire-compatible with the
//! settings documents the web UI reads and writes.

use serde::{Deserialize, Serialize};

use crate::models::folder::Folder;

/// Default conversation temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A message in a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// The role of the message sender
    pub role: ChatRole,
    /// The content of the message
    pub content: String,
    /// When the message was sent (ISO 8601)
    #[serde(default)]
    pub time: String,
    /// Whether the message represents a failed exchange
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Model parameters attached to a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationModel {
    /// The name of the model
    pub name: String,
    /// The maximum length of the conversation
    pub max_length: u32,
    /// The token limit of the underlying conversation
    pub token_limit: u32,
}

impl Default for ConversationModel {
    fn default() -> Self {
        Self {
            name: "GPT-3.5".to_string(),
            max_length: 12_000,
            token_limit: 4_000,
        }
    }
}

/// A chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Unique conversation id
    pub id: String,
    /// Id of the containing folder, empty when at root level
    #[serde(default)]
    pub folder_id: String,
    /// The title shown in the sidebar
    pub title: String,
    /// The messages exchanged so far
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Model parameters
    #[serde(default)]
    pub model: ConversationModel,
    /// The system prompt, empty means use the backend default
    #[serde(default)]
    pub system_prompt: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl Conversation {
    /// Create an empty conversation with default model parameters.
    pub fn new(id: impl Into<String>, title: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            folder_id: folder_id.into(),
            title: title.into(),
            messages: Vec::new(),
            model: ConversationModel::default(),
            system_prompt: String::new(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// An item in the conversation sidebar: either a folder or a conversation.
///
/// Folders are distinguished on the wire by their `type` tag; membership
/// is expressed only through `folderId` back-references, folders carry
/// no embedded children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversationItem {
    Folder(Folder),
    Conversation(Conversation),
}

impl ConversationItem {
    /// The id of the underlying item.
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.id,
            Self::Conversation(conversation) => &conversation.id,
        }
    }

    /// The title of the underlying item.
    pub fn title(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.title,
            Self::Conversation(conversation) => &conversation.title,
        }
    }

    /// Returns the folder, if this item is one.
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Conversation(_) => None,
        }
    }

    /// Returns the conversation, if this item is one.
    pub fn as_conversation(&self) -> Option<&Conversation> {
        match self {
            Self::Folder(_) => None,
            Self::Conversation(conversation) => Some(conversation),
        }
    }
}
