//! Repository Hosting API Abstraction
//!
//! Defines the `HostingApi` trait the collector talks to, the wire types it
//! returns, and the GitHub implementation.

mod github;

pub use github::GitHubClient;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::types::RepositoryReference;

/// Repository metadata (subset of the REST response)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub default_branch: String,
}

/// One entry of the recursive git tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// API quota as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub limit: u64,
    pub remaining: u64,
}

/// Failure of a single hosting request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostingError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HostingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HostingError::Timeout
        } else if err.is_decode() {
            HostingError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            HostingError::Status(status.as_u16())
        } else {
            HostingError::Transport(err.to_string())
        }
    }
}

/// Read-only view of a repository host
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Repository metadata
    async fn repository(
        &self,
        repo: &RepositoryReference,
    ) -> std::result::Result<RepositoryMetadata, HostingError>;

    /// Full recursive tree of `branch`, in the order the host returns it
    async fn tree(
        &self,
        repo: &RepositoryReference,
        branch: &str,
    ) -> std::result::Result<Vec<TreeEntry>, HostingError>;

    /// Raw content of one file
    async fn raw_file(
        &self,
        repo: &RepositoryReference,
        branch: &str,
        path: &str,
    ) -> std::result::Result<String, HostingError>;

    /// Host name for logging
    fn name(&self) -> &str;

    /// Reachability and remaining quota
    async fn quota(&self) -> std::result::Result<QuotaStatus, HostingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_tolerates_nulls() {
        let metadata: RepositoryMetadata = serde_json::from_str(
            r#"{"name":"widget","description":null,"language":null,"stargazers_count":7,"default_branch":"main","fork":false}"#,
        )
        .unwrap();
        assert_eq!(metadata.name, "widget");
        assert_eq!(metadata.description, None);
        assert_eq!(metadata.stargazers_count, 7);
        assert_eq!(metadata.default_branch, "main");
    }

    #[test]
    fn test_tree_response_keeps_order() {
        let response: TreeResponse = serde_json::from_str(
            r#"{"sha":"abc","tree":[{"path":"src","type":"tree"},{"path":"README.md","type":"blob"},{"path":"src/lib.rs","type":"blob"}],"truncated":false}"#,
        )
        .unwrap();
        let paths: Vec<_> = response.tree.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["src", "README.md", "src/lib.rs"]);
        assert_eq!(response.tree[0].kind.as_deref(), Some("tree"));
        assert!(!response.truncated);
    }
}
