//! Shared utility functions for common string and JSON operations.
//!
//! ## JSON Extraction Helpers
//!
//! - `json_string_list` - Extract a string list, tolerating a bare string

use serde_json::Value;

// =============================================================================
// JSON Value Extraction Helpers
// =============================================================================

/// Extract a list of strings by key.
///
/// A bare string becomes a one-element list, non-string items are dropped,
/// and a missing or null key yields an empty list. Returns `None` only when
/// the key holds some other JSON type.
pub fn json_string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    match value.get(key) {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::String(s)) => Some(vec![s.clone()]),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ),
        Some(_) => None,
    }
}

// =============================================================================
// String Utilities
// =============================================================================

/// Keep at most `max_chars` characters, never splitting a code point.
#[inline]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_string_list_variants() {
        let value = json!({
            "list": ["a", " b ", 3, "", null],
            "single": "only",
            "null": null,
            "number": 7
        });
        assert_eq!(json_string_list(&value, "list"), Some(vec!["a".into(), "b".into()]));
        assert_eq!(json_string_list(&value, "single"), Some(vec!["only".into()]));
        assert_eq!(json_string_list(&value, "null"), Some(vec![]));
        assert_eq!(json_string_list(&value, "missing"), Some(vec![]));
        assert_eq!(json_string_list(&value, "number"), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("", 3), "");
    }
}
