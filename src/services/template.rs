//! Placeholder Template Engine
//!
//! Extracts `{{...}}` placeholder markers from prompt templates and
//! substitutes user-supplied values back into the template text.
//!
//! Marker grammar:
//!
//! ```text
//! {{name}}                   free-text variable, no help text
//! {{name:description}}       free-text variable with help text
//! {{name:list:A,B,C}}        list variable with comma-separated options
//! {{name:text:description}}  explicit free-text kind
//! ```
//!
//! An unrecognized kind token is not an error; the whole segment after
//! the name is treated as the description and the kind defaults to
//! text. Markers with an empty name are malformed and ignored.
//!
//! Both operations are pure functions of their inputs.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Regex matching one placeholder marker: name up to the first `:`,
/// everything after it up to the closing braces.
const VARIABLE_PATTERN: &str = r"\{\{([^:}]*):?([^}]*)\}\}";

/// Input kind of a template variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    /// Free text input
    Text,
    /// Selection from an enumerated list of options
    List,
}

/// A variable referenced by a prompt template.
///
/// Derived from the template content on every parse, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name, unique within one parse pass
    pub name: String,
    /// Help text, or the option list for `List` variables
    pub description: String,
    /// Input kind
    #[serde(rename = "type")]
    pub kind: VariableKind,
}

impl Variable {
    /// Options of a `List` variable: the description split on commas,
    /// trimmed, with empty items dropped.
    pub fn list_options(&self) -> Vec<String> {
        self.description
            .split(',')
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn variable_regex() -> Regex {
    Regex::new(VARIABLE_PATTERN).unwrap()
}

/// Map a kind token to a `VariableKind`, if it is one.
fn parse_kind(token: &str) -> Option<VariableKind> {
    match token.to_ascii_lowercase().as_str() {
        "list" => Some(VariableKind::List),
        "text" => Some(VariableKind::Text),
        _ => None,
    }
}

/// Split the segment after the name into kind and description.
fn split_kind(rest: &str) -> (VariableKind, String) {
    let rest = rest.trim();

    if let Some((head, tail)) = rest.split_once(':') {
        if let Some(kind) = parse_kind(head.trim()) {
            return (kind, tail.trim().to_string());
        }
    } else if let Some(kind) = parse_kind(rest) {
        return (kind, String::new());
    }

    (VariableKind::Text, rest.to_string())
}

/// Extract the variables referenced by a template.
///
/// Variables appear in first-occurrence order, one entry per unique
/// name (case-sensitive; the first marker wins even when later ones
/// carry a different description). Markers whose name trims to empty
/// are skipped.
pub fn parse_variables(content: &str) -> Vec<Variable> {
    let regex = variable_regex();
    let mut variables: Vec<Variable> = Vec::new();

    for captures in regex.captures_iter(content) {
        let name = captures[1].trim();
        if name.is_empty() {
            continue;
        }
        if variables.iter().any(|v| v.name == name) {
            continue;
        }

        let (kind, description) = split_kind(&captures[2]);

        variables.push(Variable {
            name: name.to_string(),
            description,
            kind,
        });
    }

    variables
}

/// Substitute values into a template.
///
/// Every marker whose name matches a variable in `variables` is
/// replaced by the positionally aligned entry of `values`. Markers
/// whose name is unknown are replaced with the empty string
/// (best-effort policy: substitution never fails). Malformed markers
/// with an empty name are left untouched, mirroring extraction.
pub fn render_template(content: &str, variables: &[Variable], values: &[String]) -> String {
    if content.is_empty() {
        return String::new();
    }

    let regex = variable_regex();
    regex
        .replace_all(content, |captures: &Captures| {
            let name = captures[1].trim();
            if name.is_empty() {
                // malformed marker, keep verbatim
                return captures[0].to_string();
            }

            variables
                .iter()
                .position(|variable| variable.name == name)
                .and_then(|index| values.get(index))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_simple_marker() {
        let variables = parse_variables("Review this code:\n\n{{code}}");
        assert_eq!(variables.len(), 1);
        assert_eq!(variables[0].name, "code");
        assert_eq!(variables[0].kind, VariableKind::Text);
        assert!(variables[0].description.is_empty());
    }

    #[test]
    fn test_parse_description() {
        let variables = parse_variables("{{language:The target language}}");
        assert_eq!(variables[0].description, "The target language");
        assert_eq!(variables[0].kind, VariableKind::Text);
    }

    #[test]
    fn test_parse_list_kind_with_options() {
        let variables = parse_variables("{{color:list:Red,Green,Blue}}");
        assert_eq!(variables.len(), 1);
        assert_eq!(variables[0].kind, VariableKind::List);
        assert_eq!(variables[0].list_options(), vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn test_list_options_drop_empty_items() {
        let variables = parse_variables("{{color:list:Red,,Green, ,Blue,}}");
        assert_eq!(variables[0].list_options(), vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn test_unrecognized_kind_folds_into_description() {
        let variables = parse_variables("{{a:fancy:stuff}}");
        assert_eq!(variables[0].kind, VariableKind::Text);
        assert_eq!(variables[0].description, "fancy:stuff");
    }

    #[test]
    fn test_bare_kind_token() {
        let variables = parse_variables("{{choice:list}}");
        assert_eq!(variables[0].kind, VariableKind::List);
        assert!(variables[0].description.is_empty());
        assert!(variables[0].list_options().is_empty());
    }

    #[test]
    fn test_first_occurrence_wins_on_duplicates() {
        let variables = parse_variables("{{a:first}} and {{a:different desc}}");
        assert_eq!(variables.len(), 1);
        assert_eq!(variables[0].description, "first");
    }

    #[test]
    fn test_first_occurrence_order_preserved() {
        let variables = parse_variables("{{z}} {{a}} {{m}}");
        let names: Vec<&str> = variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_empty_name_is_skipped() {
        assert!(parse_variables("{{}} {{ : desc }}").is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_variables("").is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let template = "{{b:list:1,2}} {{a}} {{b}}";
        assert_eq!(parse_variables(template), parse_variables(template));
    }

    #[test]
    fn test_render_round_trip() {
        let template = "Hello {{name}}, you are {{age}}";
        let variables = parse_variables(template);
        let rendered = render_template(template, &variables, &values(&["Ada", "30"]));
        assert_eq!(rendered, "Hello Ada, you are 30");
    }

    #[test]
    fn test_render_repeated_marker() {
        let template = "{{name}} and {{name}} again";
        let variables = parse_variables(template);
        let rendered = render_template(template, &variables, &values(&["Ada"]));
        assert_eq!(rendered, "Ada and Ada again");
    }

    #[test]
    fn test_render_ignores_marker_suffix_when_matching() {
        // the marker keeps its kind/description, matching happens by name
        let template = "Pick {{color:list:Red,Green,Blue}}";
        let variables = parse_variables(template);
        let rendered = render_template(template, &variables, &values(&["Green"]));
        assert_eq!(rendered, "Pick Green");
    }

    #[test]
    fn test_render_unknown_name_becomes_empty() {
        let rendered = render_template("Hello {{missing}}!", &[], &[]);
        assert_eq!(rendered, "Hello !");
    }

    #[test]
    fn test_render_without_markers_is_noop() {
        let template = "No markers here";
        let once = render_template(template, &[], &[]);
        let twice = render_template(&once, &[], &[]);
        assert_eq!(twice, template);
    }

    #[test]
    fn test_render_keeps_malformed_markers() {
        let rendered = render_template("keep {{}} this", &[], &[]);
        assert_eq!(rendered, "keep {{}} this");
    }
}
