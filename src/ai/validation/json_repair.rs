//! JSON Repair
//!
//! Model output is usually clean JSON, but not always. This handles the
//! common ways it goes wrong:
//! - Markdown code fence wrapping (```json ... ```)
//! - Trailing commas before `]` or `}`
//! - Missing closing braces/brackets or an unterminated final string
//! - JSON embedded in explanatory text

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{Result, RoastError};

/// Extract and parse JSON from a model response
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    JsonRepairer::new().parse_or_repair(content).map(|(value, _)| value)
}

/// JSON repair strategies, tried from least to most invasive
#[derive(Debug, Default)]
pub struct JsonRepairer;

impl JsonRepairer {
    pub fn new() -> Self {
        Self
    }

    /// Parse JSON, attempting repair if the first parse fails
    ///
    /// Returns `(value, was_repaired)`.
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool)> {
        let cleaned = Self::strip_code_fences(raw.trim().trim_start_matches('\u{feff}'));

        if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
            return Ok((value, false));
        }
        debug!("Model output is not valid JSON, attempting repair");

        let closed = Self::close_open_structures(&Self::drop_trailing_commas(cleaned));
        if let Ok(value) = serde_json::from_str::<Value>(&closed) {
            warn!("Repaired malformed JSON in model output");
            return Ok((value, true));
        }

        // Objects before arrays
        for opener in ['{', '['] {
            if let Some(value) = Self::embedded_value(cleaned, opener) {
                warn!("Extracted JSON from surrounding text in model output");
                return Ok((value, true));
            }
        }

        Err(RoastError::LlmApi(format!(
            "Model output is not JSON: {}...",
            cleaned.chars().take(120).collect::<String>()
        )))
    }

    fn strip_code_fences(s: &str) -> &str {
        let mut body = s;
        if body.starts_with("```") {
            body = match body.find('\n') {
                Some(newline) => &body[newline + 1..],
                None => body.trim_start_matches('`'),
            };
        }
        body.trim_end().trim_end_matches("```").trim()
    }

    /// Remove commas that directly precede a closing bracket, outside strings
    fn drop_trailing_commas(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut scan = StringState::default();
        let mut chars = s.chars();

        while let Some(ch) = chars.next() {
            let in_string = scan.feed(ch);
            if ch == ',' && !in_string {
                let rest = chars.clone().find(|c| !c.is_whitespace());
                if matches!(rest, Some(']') | Some('}')) {
                    continue;
                }
            }
            out.push(ch);
        }
        out
    }

    /// Close an unterminated string and any brackets left open, innermost first
    fn close_open_structures(s: &str) -> String {
        let mut out = s.to_string();
        let mut scan = StringState::default();
        let mut open = Vec::new();

        for ch in s.chars() {
            if scan.feed(ch) {
                continue;
            }
            match ch {
                '{' => open.push('}'),
                '[' => open.push(']'),
                '}' | ']' => {
                    open.pop();
                }
                _ => {}
            }
        }

        if scan.in_string {
            out.push('"');
        }
        while let Some(closer) = open.pop() {
            out.push(closer);
        }
        out
    }

    /// First balanced value opened by `opener` that parses, scanning past
    /// candidates that do not
    fn embedded_value(s: &str, opener: char) -> Option<Value> {
        let mut rest = s;
        while let Some(start) = rest.find(opener) {
            let tail = &rest[start..];
            if let Some(embedded) = Self::balanced_prefix(tail) {
                let candidate = Self::drop_trailing_commas(embedded);
                if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
                    return Some(value);
                }
            }
            rest = &tail[opener.len_utf8()..];
        }
        None
    }

    /// Complete bracketed value at the start of `s`
    fn balanced_prefix(s: &str) -> Option<&str> {
        let mut scan = StringState::default();
        let mut depth = 0usize;

        for (offset, ch) in s.char_indices() {
            if scan.feed(ch) {
                continue;
            }
            match ch {
                '{' | '[' => depth += 1,
                '}' | ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(&s[..offset + ch.len_utf8()]);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// Tracks whether a character stream is inside a JSON string literal
#[derive(Default)]
struct StringState {
    in_string: bool,
    escaped: bool,
}

impl StringState {
    /// Feed one character; returns true if it belongs to a string literal
    /// (opening and closing quotes included)
    fn feed(&mut self, ch: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_string = false;
            }
            return true;
        }
        if ch == '"' {
            self.in_string = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let (value, repaired) = JsonRepairer::new()
            .parse_or_repair(r#"{"verdict": "Ship It"}"#)
            .unwrap();
        assert!(!repaired);
        assert_eq!(value["verdict"], "Ship It");
    }

    #[test]
    fn test_strip_code_fences() {
        let input = "```json\n{\"verdict\": \"Skip It\"}\n```";
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(!repaired);
        assert_eq!(value["verdict"], "Skip It");
    }

    #[test]
    fn test_fix_trailing_comma() {
        let input = r#"{"roast": ["a", "b",], "good_things": [],}"#;
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["roast"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_trailing_comma_inside_string_is_kept() {
        let input = r#"{"roast": ["wait, ]"],}"#;
        let (value, _) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert_eq!(value["roast"][0], "wait, ]");
    }

    #[test]
    fn test_close_truncated_output() {
        let input = r#"{"verdict": "Almost There", "roast": ["too many TOD"#;
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["verdict"], "Almost There");
        assert_eq!(value["roast"][0], "too many TOD");
    }

    #[test]
    fn test_extract_from_mixed() {
        let input = "Here is my verdict:\n{\"verdict\": \"Ship It\", \"roast\": []}\nEnjoy!";
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["verdict"], "Ship It");
    }

    #[test]
    fn test_extract_skips_bracketed_prose() {
        let input = "Verdict [final]:\n{\"verdict\": \"Ship It\", \"roast\": [\"r\"]}";
        let (value, repaired) = JsonRepairer::new().parse_or_repair(input).unwrap();
        assert!(repaired);
        assert_eq!(value["verdict"], "Ship It");
        assert_eq!(value["roast"][0], "r");

        let numbered = "Score [1] of [3], details {draft} below:\n{\"verdict\": \"Skip It\"}";
        let (value, _) = JsonRepairer::new().parse_or_repair(numbered).unwrap();
        assert_eq!(value["verdict"], "Skip It");
    }

    #[test]
    fn test_plain_prose_is_an_error() {
        let err = extract_json_from_response("I cannot review this repository.").unwrap_err();
        assert!(matches!(err, RoastError::LlmApi(_)));
    }

    #[test]
    fn test_empty_output_is_an_error() {
        assert!(extract_json_from_response("").is_err());
        assert!(extract_json_from_response("```json\n```").is_err());
    }
}
