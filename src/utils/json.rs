//! Canonical JSON Forms
//!
//! Recursive key-sorting of JSON values so that two documents that
//! differ only in object key order compare equal. Array order is left
//! untouched because it is semantically significant (message order,
//! sidebar order).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::utils::error::AppResult;

/// Recursively rebuild a JSON value with object keys sorted alphabetically.
///
/// Arrays are mapped element-wise; scalars pass through unchanged.
pub fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut sorted = Map::new();
            for (key, val) in entries {
                sorted.insert(key, sort_keys(val));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Serialize a value into its canonical (key-sorted) JSON string.
pub fn canonical_string<T: Serialize>(value: &T) -> AppResult<String> {
    let json = serde_json::to_value(value)?;
    Ok(sort_keys(json).to_string())
}

/// Compare two serializable values by their canonical JSON forms.
///
/// Used to decide whether a settings write is actually needed.
pub fn canonical_eq<A: Serialize, B: Serialize>(a: &A, b: &B) -> bool {
    match (canonical_string(a), canonical_string(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_keys_nested() {
        let messy = json!({
            "z": { "b": 1, "a": 2 },
            "a": [ { "y": true, "x": false } ]
        });

        let sorted = sort_keys(messy);
        assert_eq!(
            sorted.to_string(),
            r#"{"a":[{"x":false,"y":true}],"z":{"a":2,"b":1}}"#
        );
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let a = json!({ "title": "Chat", "id": "1" });
        let b = json!({ "id": "1", "title": "Chat" });
        assert!(canonical_eq(&a, &b));
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = json!({ "items": [1, 2] });
        let b = json!({ "items": [2, 1] });
        assert!(!canonical_eq(&a, &b));
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(sort_keys(json!(42)), json!(42));
        assert_eq!(sort_keys(json!("x")), json!("x"));
        assert_eq!(sort_keys(Value::Null), Value::Null);
    }
}
