//! Settings Snapshot
//!
//! The full serializable state of both sidebar collections. This is
//! the unit of persistence, of export/import, and of the canonical
//! equality check that decides whether a write is needed.
//!
//! Deserialization is deliberately lenient: missing or null
//! collections become empty ones, and null or malformed array entries
//! are dropped instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::conversation::ConversationItem;
use crate::models::prompt::PromptItem;

/// The persisted settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Conversation folders and root-level conversations
    #[serde(default, deserialize_with = "lenient_items")]
    pub conversation_items: Vec<ConversationItem>,
    /// Prompt folders and root-level prompts
    #[serde(default, deserialize_with = "lenient_items")]
    pub prompt_items: Vec<PromptItem>,
}

impl Settings {
    /// Merge an imported settings document into this one.
    ///
    /// Both collections are appended independently. Imported items are
    /// never deduplicated against existing ids; re-importing the same
    /// file yields duplicates, matching the established export/import
    /// behavior.
    pub fn merge_imported(&mut self, imported: Settings) {
        self.conversation_items.extend(imported.conversation_items);
        self.prompt_items.extend(imported.prompt_items);
    }
}

/// Deserialize an item collection, tolerating null and bad entries.
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter(|value| !value.is_null())
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}
