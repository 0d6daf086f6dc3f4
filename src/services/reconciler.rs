//! Settings Tree Reconciler
//!
//! Owns the two sidebar collections (conversation items, prompt items)
//! and provides the create/rename/delete/update operations that keep
//! their structural invariants intact:
//!
//! - membership is expressed only through `folderId` back-references;
//!   a non-folder item's `folderId` is either empty or the id of an
//!   existing folder in the same collection
//! - ids are unique per collection, folders and plain items share the
//!   same id namespace
//! - deleting a folder cascades to every item referencing it
//!
//! All operations are total: an unknown id is a silent no-op. Mutating
//! operations return whether they actually applied so callers (and
//! tests) can distinguish a no-op from a change, e.g. to clear the
//! current selection after a delete.

use crate::models::conversation::{Conversation, ConversationItem};
use crate::models::folder::{Folder, FolderKind};
use crate::models::prompt::{Prompt, PromptItem};
use crate::models::settings::Settings;
use crate::utils::error::{AppError, AppResult};
use crate::utils::ids::{
    generate_id, CONVERSATION_FOLDER_PREFIX, CONVERSATION_PREFIX, PROMPT_FOLDER_PREFIX,
    PROMPT_PREFIX,
};

/// Reconciler over a settings snapshot.
///
/// The default-title counters are per-session and only ever increase,
/// so numbering survives deletions without collisions.
#[derive(Debug, Default)]
pub struct SettingsReconciler {
    settings: Settings,
    next_conversation_folder_index: u32,
    next_prompt_folder_index: u32,
    next_conversation_index: u32,
    next_prompt_index: u32,
}

impl SettingsReconciler {
    /// Create a reconciler over empty collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconciler over an existing snapshot (e.g. loaded from
    /// the settings store). Counters start fresh.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// The current snapshot.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Consume the reconciler, returning the snapshot.
    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Replace the snapshot wholesale, keeping the title counters.
    pub fn apply(&mut self, settings: Settings) {
        self.settings = settings;
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a conversation folder at the end of the collection.
    pub fn create_conversation_folder(&mut self) -> Folder {
        self.next_conversation_folder_index += 1;
        let folder = Folder::new(
            generate_id(CONVERSATION_FOLDER_PREFIX),
            format!("New Folder #{}", self.next_conversation_folder_index),
            FolderKind::Chat,
        );
        self.settings
            .conversation_items
            .push(ConversationItem::Folder(folder.clone()));
        folder
    }

    /// Create a prompt folder at the end of the collection.
    pub fn create_prompt_folder(&mut self) -> Folder {
        self.next_prompt_folder_index += 1;
        let folder = Folder::new(
            generate_id(PROMPT_FOLDER_PREFIX),
            format!("New Folder #{}", self.next_prompt_folder_index),
            FolderKind::Prompt,
        );
        self.settings
            .prompt_items
            .push(PromptItem::Folder(folder.clone()));
        folder
    }

    /// Create a conversation, attached to `folder_id` when it names an
    /// existing conversation folder, otherwise at root level.
    pub fn create_conversation(&mut self, folder_id: Option<&str>) -> Conversation {
        self.next_conversation_index += 1;

        let parent = folder_id
            .filter(|id| self.conversation_folder_exists(id))
            .unwrap_or("");
        let conversation = Conversation::new(
            generate_id(CONVERSATION_PREFIX),
            format!("New Conversation #{}", self.next_conversation_index),
            parent,
        );
        self.settings
            .conversation_items
            .push(ConversationItem::Conversation(conversation.clone()));
        conversation
    }

    /// Create a prompt, attached to `folder_id` when it names an
    /// existing prompt folder, otherwise at root level.
    pub fn create_prompt(&mut self, folder_id: Option<&str>) -> Prompt {
        self.next_prompt_index += 1;

        let parent = folder_id
            .filter(|id| self.prompt_folder_exists(id))
            .unwrap_or("");
        let prompt = Prompt::new(
            generate_id(PROMPT_PREFIX),
            format!("New Prompt #{}", self.next_prompt_index),
            parent,
        );
        self.settings
            .prompt_items
            .push(PromptItem::Prompt(prompt.clone()));
        prompt
    }

    // ------------------------------------------------------------------
    // Rename
    // ------------------------------------------------------------------

    /// Rename a conversation item (folder or conversation). A title
    /// that trims to empty is a no-op.
    pub fn rename_conversation_item(&mut self, id: &str, new_title: &str) -> bool {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return false;
        }

        for item in &mut self.settings.conversation_items {
            match item {
                ConversationItem::Folder(folder) if folder.id == id => {
                    folder.title = new_title.to_string();
                    return true;
                }
                ConversationItem::Conversation(conversation) if conversation.id == id => {
                    conversation.title = new_title.to_string();
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    /// Rename a prompt item (folder or prompt). A title that trims to
    /// empty is a no-op.
    pub fn rename_prompt_item(&mut self, id: &str, new_title: &str) -> bool {
        let new_title = new_title.trim();
        if new_title.is_empty() {
            return false;
        }

        for item in &mut self.settings.prompt_items {
            match item {
                PromptItem::Folder(folder) if folder.id == id => {
                    folder.title = new_title.to_string();
                    return true;
                }
                PromptItem::Prompt(prompt) if prompt.id == id => {
                    prompt.title = new_title.to_string();
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Deletion
    // ------------------------------------------------------------------

    /// Delete a conversation by id. Returns whether anything was removed;
    /// a `true` result means the caller must clear a matching selection.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.settings.conversation_items.len();
        self.settings.conversation_items.retain(|item| match item {
            ConversationItem::Conversation(conversation) => conversation.id != id,
            ConversationItem::Folder(_) => true,
        });
        self.settings.conversation_items.len() != before
    }

    /// Delete a prompt by id.
    pub fn delete_prompt(&mut self, id: &str) -> bool {
        let before = self.settings.prompt_items.len();
        self.settings.prompt_items.retain(|item| match item {
            PromptItem::Prompt(prompt) => prompt.id != id,
            PromptItem::Folder(_) => true,
        });
        self.settings.prompt_items.len() != before
    }

    /// Delete a conversation folder and every conversation inside it.
    pub fn delete_conversation_folder(&mut self, id: &str) -> bool {
        if !self.conversation_folder_exists(id) {
            return false;
        }

        self.settings.conversation_items.retain(|item| match item {
            ConversationItem::Folder(folder) => folder.id != id,
            ConversationItem::Conversation(conversation) => conversation.folder_id != id,
        });
        true
    }

    /// Delete a prompt folder and every prompt inside it.
    pub fn delete_prompt_folder(&mut self, id: &str) -> bool {
        if !self.prompt_folder_exists(id) {
            return false;
        }

        self.settings.prompt_items.retain(|item| match item {
            PromptItem::Folder(folder) => folder.id != id,
            PromptItem::Prompt(prompt) => prompt.folder_id != id,
        });
        true
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Replace a conversation by id. A dangling `folderId` on the new
    /// value is repaired to root. With flat membership a changed
    /// `folderId` relocates the item implicitly.
    pub fn update_conversation(&mut self, mut conversation: Conversation) -> bool {
        if !conversation.folder_id.is_empty()
            && !self.conversation_folder_exists(&conversation.folder_id)
        {
            conversation.folder_id.clear();
        }

        for item in &mut self.settings.conversation_items {
            if let ConversationItem::Conversation(existing) = item {
                if existing.id == conversation.id {
                    *existing = conversation;
                    return true;
                }
            }
        }
        false
    }

    /// Replace a prompt by id, repairing a dangling `folderId` to root.
    pub fn update_prompt(&mut self, mut prompt: Prompt) -> bool {
        if !prompt.folder_id.is_empty() && !self.prompt_folder_exists(&prompt.folder_id) {
            prompt.folder_id.clear();
        }

        for item in &mut self.settings.prompt_items {
            if let PromptItem::Prompt(existing) = item {
                if existing.id == prompt.id {
                    *existing = prompt;
                    return true;
                }
            }
        }
        false
    }

    /// Merge an imported settings document (see [`Settings::merge_imported`]).
    pub fn merge_imported(&mut self, imported: Settings) {
        self.settings.merge_imported(imported);
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Find a conversation by id.
    pub fn find_conversation(&self, id: &str) -> Option<&Conversation> {
        self.settings
            .conversation_items
            .iter()
            .filter_map(ConversationItem::as_conversation)
            .find(|conversation| conversation.id == id)
    }

    /// Find a prompt by id.
    pub fn find_prompt(&self, id: &str) -> Option<&Prompt> {
        self.settings
            .prompt_items
            .iter()
            .filter_map(PromptItem::as_prompt)
            .find(|prompt| prompt.id == id)
    }

    /// Derived view: the conversations inside a folder (empty id means
    /// root-level conversations).
    pub fn conversations_in(&self, folder_id: &str) -> Vec<&Conversation> {
        self.settings
            .conversation_items
            .iter()
            .filter_map(ConversationItem::as_conversation)
            .filter(|conversation| conversation.folder_id == folder_id)
            .collect()
    }

    /// Derived view: the prompts inside a folder.
    pub fn prompts_in(&self, folder_id: &str) -> Vec<&Prompt> {
        self.settings
            .prompt_items
            .iter()
            .filter_map(PromptItem::as_prompt)
            .filter(|prompt| prompt.folder_id == folder_id)
            .collect()
    }

    fn conversation_folder_exists(&self, id: &str) -> bool {
        self.settings
            .conversation_items
            .iter()
            .filter_map(ConversationItem::as_folder)
            .any(|folder| folder.id == id)
    }

    fn prompt_folder_exists(&self, id: &str) -> bool {
        self.settings
            .prompt_items
            .iter()
            .filter_map(PromptItem::as_folder)
            .any(|folder| folder.id == id)
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Check the structural invariants of the current snapshot.
    pub fn validate(&self) -> AppResult<()> {
        let mut conversation_ids: Vec<&str> = Vec::new();
        for item in &self.settings.conversation_items {
            if conversation_ids.contains(&item.id()) {
                return Err(AppError::validation(format!(
                    "Duplicate conversation item id: {}",
                    item.id()
                )));
            }
            conversation_ids.push(item.id());
        }

        let mut prompt_ids: Vec<&str> = Vec::new();
        for item in &self.settings.prompt_items {
            if prompt_ids.contains(&item.id()) {
                return Err(AppError::validation(format!(
                    "Duplicate prompt item id: {}",
                    item.id()
                )));
            }
            prompt_ids.push(item.id());
        }

        for conversation in self
            .settings
            .conversation_items
            .iter()
            .filter_map(ConversationItem::as_conversation)
        {
            if !conversation.folder_id.is_empty()
                && !self.conversation_folder_exists(&conversation.folder_id)
            {
                return Err(AppError::validation(format!(
                    "Conversation {} references missing folder {}",
                    conversation.id, conversation.folder_id
                )));
            }
        }

        for prompt in self
            .settings
            .prompt_items
            .iter()
            .filter_map(PromptItem::as_prompt)
        {
            if !prompt.folder_id.is_empty() && !self.prompt_folder_exists(&prompt.folder_id) {
                return Err(AppError::validation(format!(
                    "Prompt {} references missing folder {}",
                    prompt.id, prompt.folder_id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_folder_numbering() {
        let mut reconciler = SettingsReconciler::new();
        let first = reconciler.create_conversation_folder();
        let second = reconciler.create_conversation_folder();

        assert_eq!(first.title, "New Folder #1");
        assert_eq!(second.title, "New Folder #2");
        assert_ne!(first.id, second.id);
        reconciler.validate().unwrap();
    }

    #[test]
    fn test_numbering_survives_deletions() {
        let mut reconciler = SettingsReconciler::new();
        let first = reconciler.create_conversation_folder();
        reconciler.delete_conversation_folder(&first.id);

        // the counter keeps increasing, it is never derived from length
        let second = reconciler.create_conversation_folder();
        assert_eq!(second.title, "New Folder #2");
    }

    #[test]
    fn test_create_conversation_in_folder() {
        let mut reconciler = SettingsReconciler::new();
        let folder = reconciler.create_conversation_folder();
        let conversation = reconciler.create_conversation(Some(&folder.id));

        assert_eq!(conversation.folder_id, folder.id);
        assert_eq!(conversation.title, "New Conversation #1");
        assert_eq!(reconciler.conversations_in(&folder.id).len(), 1);
        reconciler.validate().unwrap();
    }

    #[test]
    fn test_create_conversation_with_unknown_folder_goes_to_root() {
        let mut reconciler = SettingsReconciler::new();
        let conversation = reconciler.create_conversation(Some("ccf:nope"));
        assert!(conversation.folder_id.is_empty());
        reconciler.validate().unwrap();
    }

    #[test]
    fn test_folder_delete_cascades() {
        let mut reconciler = SettingsReconciler::new();
        let folder = reconciler.create_conversation_folder();
        let inside = reconciler.create_conversation(Some(&folder.id));
        let outside = reconciler.create_conversation(None);

        assert!(reconciler.delete_conversation_folder(&folder.id));

        assert!(reconciler.find_conversation(&inside.id).is_none());
        assert!(reconciler.find_conversation(&outside.id).is_some());
        assert_eq!(reconciler.settings().conversation_items.len(), 1);
        reconciler.validate().unwrap();
    }

    #[test]
    fn test_prompt_folder_delete_cascades() {
        let mut reconciler = SettingsReconciler::new();
        let folder = reconciler.create_prompt_folder();
        let inside = reconciler.create_prompt(Some(&folder.id));

        assert!(reconciler.delete_prompt_folder(&folder.id));
        assert!(reconciler.find_prompt(&inside.id).is_none());
        assert!(reconciler.settings().prompt_items.is_empty());
    }

    #[test]
    fn test_rename_whitespace_is_noop() {
        let mut reconciler = SettingsReconciler::new();
        let conversation = reconciler.create_conversation(None);

        assert!(!reconciler.rename_conversation_item(&conversation.id, "   "));
        assert_eq!(
            reconciler.find_conversation(&conversation.id).unwrap().title,
            "New Conversation #1"
        );

        assert!(reconciler.rename_conversation_item(&conversation.id, "  Trip notes "));
        assert_eq!(
            reconciler.find_conversation(&conversation.id).unwrap().title,
            "Trip notes"
        );
    }

    #[test]
    fn test_unknown_ids_are_silent_noops() {
        let mut reconciler = SettingsReconciler::new();
        reconciler.create_conversation(None);

        assert!(!reconciler.delete_conversation("cc:missing"));
        assert!(!reconciler.delete_conversation_folder("ccf:missing"));
        assert!(!reconciler.rename_conversation_item("cc:missing", "x"));
        assert!(!reconciler.update_conversation(Conversation::new("cc:missing", "x", "")));
        assert_eq!(reconciler.settings().conversation_items.len(), 1);
    }

    #[test]
    fn test_update_relocates_between_folders() {
        let mut reconciler = SettingsReconciler::new();
        let folder_a = reconciler.create_conversation_folder();
        let folder_b = reconciler.create_conversation_folder();
        let conversation = reconciler.create_conversation(Some(&folder_a.id));

        let mut moved = conversation.clone();
        moved.folder_id = folder_b.id.clone();
        assert!(reconciler.update_conversation(moved));

        assert!(reconciler.conversations_in(&folder_a.id).is_empty());
        assert_eq!(reconciler.conversations_in(&folder_b.id).len(), 1);
        reconciler.validate().unwrap();
    }

    #[test]
    fn test_update_repairs_dangling_folder_reference() {
        let mut reconciler = SettingsReconciler::new();
        let conversation = reconciler.create_conversation(None);

        let mut dangling = conversation.clone();
        dangling.folder_id = "ccf:gone".to_string();
        assert!(reconciler.update_conversation(dangling));

        assert!(reconciler
            .find_conversation(&conversation.id)
            .unwrap()
            .folder_id
            .is_empty());
        reconciler.validate().unwrap();
    }

    #[test]
    fn test_update_prompt_replaces_content() {
        let mut reconciler = SettingsReconciler::new();
        let prompt = reconciler.create_prompt(None);

        let mut edited = prompt.clone();
        edited.content = "Summarize:\n\n{{text}}".to_string();
        assert!(reconciler.update_prompt(edited));

        assert_eq!(
            reconciler.find_prompt(&prompt.id).unwrap().content,
            "Summarize:\n\n{{text}}"
        );
    }

    #[test]
    fn test_counters_are_independent_per_kind() {
        let mut reconciler = SettingsReconciler::new();
        reconciler.create_conversation_folder();
        let prompt_folder = reconciler.create_prompt_folder();
        let prompt = reconciler.create_prompt(None);

        assert_eq!(prompt_folder.title, "New Folder #1");
        assert_eq!(prompt.title, "New Prompt #1");
    }
}
