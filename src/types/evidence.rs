//! Evidence Package
//!
//! Bounded summary of a repository handed from the collector to the synthesis
//! client. Built once per request and never mutated afterwards.

use std::fmt::Write as _;

use serde::Serialize;

use crate::constants::evidence as limits;

/// One sampled file, content already truncated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSample {
    pub path: String,
    pub content: String,
}

/// Bounded repository summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidencePackage {
    pub owner: String,
    pub repo_name: String,
    pub description: Option<String>,
    pub primary_language: Option<String>,
    pub star_count: u64,
    /// Prefix of the tree listing in the order the API returned it
    pub file_structure_sample: Vec<String>,
    pub file_samples: Vec<FileSample>,
}

impl EvidencePackage {
    /// Sampled file contents as delimited text blocks
    pub fn file_contents(&self) -> String {
        let mut out = String::new();
        for sample in &self.file_samples {
            let _ = write!(out, "\n--- FILE: {} ---\n{}\n", sample.path, sample.content);
        }
        out
    }

    /// Human-readable report embedded into the review prompt
    pub fn render(&self) -> String {
        format!(
            "REPO: {}/{}\nDESC: {}\nLANG: {}\nSTARS: {}\nFILES (first {}): {:?}\nCODE:\n{}",
            self.owner,
            self.repo_name,
            self.description.as_deref().unwrap_or("No description"),
            self.primary_language.as_deref().unwrap_or("Unknown"),
            self.star_count,
            limits::MAX_STRUCTURE_ENTRIES,
            self.file_structure_sample,
            if self.file_samples.is_empty() {
                "(no files sampled)".to_string()
            } else {
                self.file_contents()
            }
        )
    }
}
