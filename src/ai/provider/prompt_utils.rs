//! Prompt building utilities for LLM providers.

use serde_json::Value;

/// System instruction for providers without native schema enforcement.
///
/// Returns a generic JSON-only instruction if schema is null.
pub fn build_schema_instruction(schema: &Value) -> String {
    if schema.is_null() {
        return "Always respond with valid JSON.".to_string();
    }

    let schema_str = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
    format!(
        "Always respond with valid JSON matching this schema:\n\n```json\n{}\n```\n\nRespond ONLY with valid JSON, no explanation.",
        schema_str
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_schema() {
        let result = build_schema_instruction(&Value::Null);
        assert!(result.contains("JSON"));
        assert!(!result.contains("schema"));
    }

    #[test]
    fn test_with_schema() {
        let schema = json!({"type": "object", "properties": {"verdict": {"type": "string"}}});
        let result = build_schema_instruction(&schema);
        assert!(result.contains("\"verdict\""));
        assert!(result.contains("ONLY"));
    }
}
