//! Reviewer Personas
//!
//! A `PersonaSelector` maps evidence to the persona that reviews it: an
//! ordered list of rules, first match wins, with a default reviewer when no
//! rule matches. A persona may pin the verdict, which is then enforced on
//! every record produced under it, fallback included.

use crate::config::PersonaConfig;
use crate::types::{EvidencePackage, Verdict, VerdictRecord};

/// Voice and constraints of one reviewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: &'static str,
    /// Prompt text describing who the reviewer is and how they judge
    pub instructions: String,
    /// Verdict enforced regardless of model output
    pub forced_verdict: Option<Verdict>,
}

impl Persona {
    /// Senior engineer: brutal, funny, insightful
    pub fn staff_engineer() -> Self {
        Self {
            name: "staff-engineer",
            instructions: "You are a Senior Staff Software Engineer. You are brutal, funny, but \
                           insightful. You are reviewing a GitHub repository.\n\
                           Task:\n\
                           1. Analyze the file structure and code snippets.\n\
                           2. Give a verdict: \"Ship It\" (good), \"Almost There\" (okay) or \"Skip It\" (bad).\n\
                           3. Roast: a few funny, slightly mean sentences about the code quality.\n\
                           4. Good things: 3-4 genuine compliments.\n\
                           5. Suggestions: 3-4 pieces of actionable technical advice."
                .to_string(),
            forced_verdict: None,
        }
    }

    /// Devoted reviewer for the creator's own repositories
    pub fn loyal_apprentice(creator: &str) -> Self {
        Self {
            name: "loyal-apprentice",
            instructions: format!(
                "You are a Senior Staff Software Engineer reviewing a GitHub repository that \
                 belongs to {creator}, the person who built you. You refuse to roast your \
                 creator.\n\
                 Task:\n\
                 1. The verdict is always \"Ship It\".\n\
                 2. Roast: explain, with humor and dramatic loyalty, why you will not roast \
                 this code.\n\
                 3. Good things: 3-4 sincere compliments grounded in the files you see.\n\
                 4. Suggestions: 2-3 gentle, respectful ideas for what to build next."
            ),
            forced_verdict: Some(Verdict::ShipIt),
        }
    }

    /// Enforce the persona's pinned verdict, if any
    pub fn apply(&self, mut record: VerdictRecord) -> VerdictRecord {
        if let Some(verdict) = self.forced_verdict {
            record.verdict = verdict;
        }
        record
    }
}

/// Predicate over the evidence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaMatch {
    /// Repository owner equals the identifier, ignoring case
    OwnerMatches(String),
}

impl PersonaMatch {
    pub fn matches(&self, evidence: &EvidencePackage) -> bool {
        match self {
            PersonaMatch::OwnerMatches(identifier) => {
                evidence.owner.to_lowercase() == identifier.to_lowercase()
            }
        }
    }
}

/// Ordered persona rules plus a default
#[derive(Debug, Clone)]
pub struct PersonaSelector {
    rules: Vec<(PersonaMatch, Persona)>,
    default: Persona,
}

impl Default for PersonaSelector {
    fn default() -> Self {
        Self::new(Persona::staff_engineer())
    }
}

impl PersonaSelector {
    pub fn new(default: Persona) -> Self {
        Self {
            rules: Vec::new(),
            default,
        }
    }

    /// Builder-style rule registration
    pub fn with_rule(mut self, predicate: PersonaMatch, persona: Persona) -> Self {
        self.rules.push((predicate, persona));
        self
    }

    /// Default reviewer, plus the loyalty rule when a creator is configured
    pub fn from_config(config: &PersonaConfig) -> Self {
        let selector = Self::default();
        match config.creator.as_deref().map(str::trim) {
            Some(creator) if !creator.is_empty() => selector.with_rule(
                PersonaMatch::OwnerMatches(creator.to_string()),
                Persona::loyal_apprentice(creator),
            ),
            _ => selector,
        }
    }

    pub fn select(&self, evidence: &EvidencePackage) -> &Persona {
        self.rules
            .iter()
            .find(|(predicate, _)| predicate.matches(evidence))
            .map(|(_, persona)| persona)
            .unwrap_or(&self.default)
    }
}
