//! AI Response Validation
//!
//! Turns raw model output into a `VerdictRecord`:
//! - JSON repair for malformed output
//! - Shape validation and normalization against the verdict schema
//!
//! ## Design Philosophy
//! - Repair on format issues, fail on structural errors

mod json_repair;
mod response;

pub use json_repair::{JsonRepairer, extract_json_from_response};
pub use response::{
    IssueSeverity, LIST_FIELDS, ResponseValidator, ValidationIssue, ValidationResult,
};

use serde_json::Value;
use tracing::debug;

use crate::types::{Result, RoastError, VerdictRecord};

/// Repair + validation pipeline
#[derive(Debug, Default)]
pub struct ValidationPipeline {
    repairer: JsonRepairer,
    validator: ResponseValidator,
}

impl ValidationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process raw model text
    pub fn process(&self, raw_response: &str) -> Result<ProcessedResponse> {
        let (value, was_repaired) = self.repairer.parse_or_repair(raw_response)?;
        self.finish(value, was_repaired)
    }

    /// Process already-parsed provider content
    ///
    /// Providers that could not decode the text themselves hand it over as a
    /// JSON string; that string goes through repair first.
    pub fn process_value(&self, content: Value) -> Result<ProcessedResponse> {
        match content {
            Value::String(text) => self.process(&text),
            value => self.finish(value, false),
        }
    }

    fn finish(&self, value: Value, was_repaired: bool) -> Result<ProcessedResponse> {
        let (record, validation) = self.validator.validate_verdict(&value);
        for issue in &validation.issues {
            debug!("Verdict validation: {}", issue);
        }

        match record {
            Some(record) => Ok(ProcessedResponse {
                record,
                was_repaired,
                validation,
            }),
            None => Err(RoastError::LlmApi(format!(
                "Response does not match the verdict schema: {}",
                validation.error_summary()
            ))),
        }
    }
}

/// Result of the full validation pipeline
#[derive(Debug)]
pub struct ProcessedResponse {
    /// Normalized record
    pub record: VerdictRecord,
    /// Whether JSON repair was needed
    pub was_repaired: bool,
    /// Warnings raised during normalization
    pub validation: ValidationResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;
    use serde_json::json;

    #[test]
    fn test_pipeline_valid_response() {
        let pipeline = ValidationPipeline::new();
        let processed = pipeline
            .process(r#"{"verdict":"Ship It","roast":["r"],"good_things":["g"],"suggestions":["s"]}"#)
            .unwrap();
        assert_eq!(processed.record.verdict, Verdict::ShipIt);
        assert!(!processed.was_repaired);
        assert!(processed.validation.issues.is_empty());
    }

    #[test]
    fn test_pipeline_repairs_json() {
        let pipeline = ValidationPipeline::new();
        let processed = pipeline
            .process("```json\n{\"verdict\":\"Skip It\",\"roast\":[\"r\",],\"good_things\":[],\"suggestions\":[]\n```")
            .unwrap();
        assert!(processed.was_repaired);
        assert_eq!(processed.record.roast, vec!["r"]);
    }

    #[test]
    fn test_pipeline_accepts_bracketed_preamble() {
        let pipeline = ValidationPipeline::new();
        let processed = pipeline
            .process("Verdict [final]:\n{\"verdict\":\"Ship It\",\"roast\":[\"r\"],\"good_things\":[],\"suggestions\":[]}")
            .unwrap();
        assert_eq!(processed.record.verdict, Verdict::ShipIt);
        assert_eq!(processed.record.roast, vec!["r"]);
        assert!(processed.was_repaired);
    }

    #[test]
    fn test_pipeline_string_content_is_reparsed() {
        let pipeline = ValidationPipeline::new();
        let processed = pipeline
            .process_value(Value::String(r#"{"verdict":"almost there"}"#.to_string()))
            .unwrap();
        assert_eq!(processed.record.verdict, Verdict::AlmostThere);
    }

    #[test]
    fn test_pipeline_rejects_wrong_shape() {
        let pipeline = ValidationPipeline::new();
        let err = pipeline
            .process_value(json!({"rating": 10}))
            .unwrap_err();
        assert!(err.to_string().contains("verdict schema"));
    }
}
