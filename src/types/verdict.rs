//! Verdict Record
//!
//! Structured review result. Always structurally complete: failure paths
//! produce a degraded record, never an absent one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Review classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Ship It")]
    ShipIt,
    #[serde(rename = "Almost There")]
    AlmostThere,
    #[serde(rename = "Skip It")]
    SkipIt,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::ShipIt, Verdict::AlmostThere, Verdict::SkipIt];

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::ShipIt => "Ship It",
            Verdict::AlmostThere => "Almost There",
            Verdict::SkipIt => "Skip It",
        }
    }

    /// Lenient label match: case, punctuation and spacing are ignored
    pub fn from_label(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "shipit" => Some(Verdict::ShipIt),
            "almostthere" => Some(Verdict::AlmostThere),
            "skipit" => Some(Verdict::SkipIt),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            format!(
                "Unknown verdict: {}. Valid values: Ship It, Almost There, Skip It",
                s
            )
        })
    }
}

/// Complete review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub verdict: Verdict,
    pub roast: Vec<String>,
    pub good_things: Vec<String>,
    pub suggestions: Vec<String>,
}

impl VerdictRecord {
    /// Degraded record returned when synthesis fails
    pub fn fallback(reason: impl fmt::Display) -> Self {
        Self {
            verdict: Verdict::SkipIt,
            roast: vec![format!("AI Error: {}", reason)],
            good_things: Vec::new(),
            suggestions: vec!["Try again in a moment.".to_string()],
        }
    }
}
