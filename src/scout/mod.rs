//! Evidence Collector
//!
//! Turns a repository URL into a bounded `EvidencePackage`:
//!
//! 1. Parse the URL into owner/name
//! 2. Fetch metadata (fatal on failure)
//! 3. Fetch the recursive tree of the default branch (empty on failure)
//! 4. Fetch up to three qualifying files, skipping any that fail
//!
//! Failures surface as `CollectorError`; the collector never panics out to the
//! caller.

mod policy;
mod selection;

pub use policy::{CollectorStep, FailurePolicy};
pub use selection::qualifies;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, instrument};

use crate::constants::evidence::{MAX_FILE_CHARS, MAX_SAMPLED_FILES, MAX_STRUCTURE_ENTRIES};
use crate::hosting::HostingApi;
use crate::types::{
    CollectorError, EvidencePackage, FileSample, RepositoryReference, truncate_chars,
};

/// Repository evidence collector
#[derive(Clone)]
pub struct Collector {
    hosting: Arc<dyn HostingApi>,
}

impl Collector {
    pub fn new(hosting: Arc<dyn HostingApi>) -> Self {
        Self { hosting }
    }

    /// Collect evidence for `repo_url`
    #[instrument(skip(self), fields(host = self.hosting.name()))]
    pub async fn collect(&self, repo_url: &str) -> Result<EvidencePackage, CollectorError> {
        match AssertUnwindSafe(self.collect_inner(repo_url))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "internal error".to_string());
                Err(CollectorError::Unexpected(message))
            }
        }
    }

    async fn collect_inner(&self, repo_url: &str) -> Result<EvidencePackage, CollectorError> {
        let repo = RepositoryReference::parse(repo_url)?;
        debug!("Resolved repository {}", repo);

        let metadata = policy::resolve(
            CollectorStep::Metadata,
            self.hosting.repository(&repo).await,
        )?
        .ok_or_else(|| CollectorError::Unexpected("metadata unavailable".to_string()))?;

        let branch = metadata.default_branch.as_str();
        let tree = policy::resolve(CollectorStep::Tree, self.hosting.tree(&repo, branch).await)?
            .unwrap_or_default();

        let file_structure_sample = tree
            .iter()
            .take(MAX_STRUCTURE_ENTRIES)
            .map(|entry| entry.path.clone())
            .collect();

        let mut file_samples = Vec::with_capacity(MAX_SAMPLED_FILES);
        for path in selection::candidates(&tree) {
            if file_samples.len() >= MAX_SAMPLED_FILES {
                break;
            }
            let fetched = self.hosting.raw_file(&repo, branch, path).await;
            if let Some(content) = policy::resolve(CollectorStep::RawFile, fetched)? {
                file_samples.push(FileSample {
                    path: path.to_string(),
                    content: truncate_chars(&content, MAX_FILE_CHARS).to_string(),
                });
            }
        }

        info!(
            "Collected evidence for {}: {} tree entries, {} files sampled",
            repo,
            tree.len(),
            file_samples.len()
        );

        Ok(EvidencePackage {
            owner: repo.owner().to_string(),
            repo_name: metadata.name,
            description: metadata.description,
            primary_language: metadata.language,
            star_count: metadata.stargazers_count,
            file_structure_sample,
            file_samples,
        })
    }
}
