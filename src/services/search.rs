//! Sidebar Search
//!
//! Normalization and token-based AND matching over item titles. No
//! ranking, no fuzziness: an item matches when its normalized title
//! contains every search token as a substring.

use crate::models::conversation::ConversationItem;
use crate::models::prompt::PromptItem;

/// Normalize a string for searching: lowercase, German umlauts
/// transliterated, whitespace runs collapsed to single spaces.
pub fn to_search_string(value: &str) -> String {
    let lowered = value
        .to_lowercase()
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss")
        .replace('\t', "  ")
        .replace('\n', " ")
        .replace('\r', "");

    lowered.split(' ').filter(|part| !part.is_empty()).collect::<Vec<_>>().join(" ")
}

/// Split a search term into unique normalized tokens.
pub fn search_terms(term: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for part in to_search_string(term).split(' ') {
        let part = part.trim();
        if part.is_empty() || tokens.iter().any(|t| t == part) {
            continue;
        }
        tokens.push(part.to_string());
    }
    tokens
}

/// Whether a normalized title contains every token.
fn title_matches(title: &str, tokens: &[String]) -> bool {
    let normalized = to_search_string(title);
    tokens.iter().all(|token| normalized.contains(token.as_str()))
}

/// Filter conversation items by title. An empty term matches everything.
pub fn filter_conversation_items(items: &[ConversationItem], term: &str) -> Vec<ConversationItem> {
    let tokens = search_terms(term);
    if tokens.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| title_matches(item.title(), &tokens))
        .cloned()
        .collect()
}

/// Filter prompt items by title. An empty term matches everything.
pub fn filter_prompt_items(items: &[PromptItem], term: &str) -> Vec<PromptItem> {
    let tokens = search_terms(term);
    if tokens.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| title_matches(item.title(), &tokens))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conversation::Conversation;

    fn items(titles: &[&str]) -> Vec<ConversationItem> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                ConversationItem::Conversation(Conversation::new(format!("cc:{i}"), *title, ""))
            })
            .collect()
    }

    fn titles(items: &[ConversationItem]) -> Vec<String> {
        items.iter().map(|item| item.title().to_string()).collect()
    }

    #[test]
    fn test_normalization() {
        assert_eq!(to_search_string("  Grüße\taus\nKöln  "), "gruesse aus koeln");
        assert_eq!(to_search_string("Straße"), "strasse");
    }

    #[test]
    fn test_terms_are_unique() {
        assert_eq!(search_terms("foo  foo bar"), vec!["foo", "bar"]);
        assert!(search_terms("   ").is_empty());
    }

    #[test]
    fn test_and_matching() {
        let list = items(&["Weather Report", "Weather", "Sunny Day"]);

        let single = filter_conversation_items(&list, "weather");
        assert_eq!(titles(&single), vec!["Weather Report", "Weather"]);

        let both = filter_conversation_items(&list, "weather report");
        assert_eq!(titles(&both), vec!["Weather Report"]);

        assert!(filter_conversation_items(&list, "sunny report").is_empty());
    }

    #[test]
    fn test_empty_term_matches_all() {
        let list = items(&["A", "B"]);
        assert_eq!(filter_conversation_items(&list, "").len(), 2);
        assert_eq!(filter_conversation_items(&list, " \t ").len(), 2);
    }

    #[test]
    fn test_umlaut_search() {
        let list = items(&["Grüße"]);
        assert_eq!(filter_conversation_items(&list, "gruesse").len(), 1);
    }
}
