//! Response Validation
//!
//! Checks the shape of a model response against the verdict schema and
//! normalizes it into a `VerdictRecord`:
//! - `verdict` must name one of the three labels (matched leniently)
//! - list fields tolerate a bare string, missing keys and non-string items
//!
//! Anything that cannot be normalized is an `Error` issue; tolerated
//! deviations are recorded as `Warning`s.

use serde_json::Value;
use std::fmt;

use crate::types::{Verdict, VerdictRecord, json_string_list};

/// List fields of the verdict schema, in schema order
pub const LIST_FIELDS: [&str; 3] = ["roast", "good_things", "suggestions"];

/// Severity levels for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Response is unusable
    Error,
    /// Response usable after normalization
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Error => write!(f, "ERROR"),
            IssueSeverity::Warning => write!(f, "WARN"),
        }
    }
}

/// A single validation issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
    pub field: Option<&'static str>,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
            field: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
            field: None,
        }
    }

    pub fn at(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.severity, field, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// All issues found in one response
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// No `Error` issues
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    /// Error messages joined for diagnostics
    pub fn error_summary(&self) -> String {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

/// Verdict response validator
#[derive(Debug, Default)]
pub struct ResponseValidator;

impl ResponseValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate and normalize a parsed response
    ///
    /// The record is `Some` exactly when the result has no errors.
    pub fn validate_verdict(&self, value: &Value) -> (Option<VerdictRecord>, ValidationResult) {
        let mut result = ValidationResult::default();

        if !value.is_object() {
            result.add(ValidationIssue::error("response is not a JSON object"));
            return (None, result);
        }

        let verdict = self.validate_verdict_label(value, &mut result);
        let mut lists = LIST_FIELDS.map(|field| self.validate_list(value, field, &mut result));

        if lists[0].as_ref().is_some_and(Vec::is_empty) {
            result.add(ValidationIssue::warning("no roast lines").at("roast"));
        }

        match (verdict, &mut lists) {
            (Some(verdict), [Some(roast), Some(good_things), Some(suggestions)]) => {
                let record = VerdictRecord {
                    verdict,
                    roast: std::mem::take(roast),
                    good_things: std::mem::take(good_things),
                    suggestions: std::mem::take(suggestions),
                };
                (Some(record), result)
            }
            _ => (None, result),
        }
    }

    fn validate_verdict_label(&self, value: &Value, result: &mut ValidationResult) -> Option<Verdict> {
        let raw = match value.get("verdict") {
            None | Some(Value::Null) => {
                result.add(ValidationIssue::error("missing required field").at("verdict"));
                return None;
            }
            Some(Value::String(s)) => s,
            Some(other) => {
                result.add(
                    ValidationIssue::error(format!("expected a string, got {}", other))
                        .at("verdict"),
                );
                return None;
            }
        };

        match Verdict::from_label(raw) {
            Some(verdict) => {
                if verdict.label() != raw {
                    result.add(
                        ValidationIssue::warning(format!(
                            "normalized '{}' to '{}'",
                            raw,
                            verdict.label()
                        ))
                        .at("verdict"),
                    );
                }
                Some(verdict)
            }
            None => {
                result.add(
                    ValidationIssue::error(format!("unrecognized verdict '{}'", raw))
                        .at("verdict"),
                );
                None
            }
        }
    }

    fn validate_list(
        &self,
        value: &Value,
        field: &'static str,
        result: &mut ValidationResult,
    ) -> Option<Vec<String>> {
        let Some(items) = json_string_list(value, field) else {
            result.add(ValidationIssue::error("expected a list of strings").at(field));
            return None;
        };

        match value.get(field) {
            None | Some(Value::Null) => {
                result.add(ValidationIssue::warning("missing, using empty list").at(field));
            }
            Some(Value::String(_)) => {
                result.add(ValidationIssue::warning("bare string wrapped in a list").at(field));
            }
            Some(Value::Array(raw)) if raw.len() != items.len() => {
                result.add(
                    ValidationIssue::warning(format!(
                        "dropped {} blank or non-string item(s)",
                        raw.len() - items.len()
                    ))
                    .at(field),
                );
            }
            _ => {}
        }
        Some(items)
    }
}
