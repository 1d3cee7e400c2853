//! GitHub REST + raw-content client.
//!
//! Metadata and tree requests go to the REST API (token attached when
//! configured); file contents come from the raw-content host without
//! credentials.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{HostingApi, HostingError, QuotaStatus, RepositoryMetadata, TreeEntry, TreeResponse};
use crate::config::HostingConfig;
use crate::constants::hosting as defaults;
use crate::types::{RepositoryReference, Result, RoastError};

/// GitHub client with secure token handling
pub struct GitHubClient {
    api_base: Url,
    raw_base: Url,
    token: Option<SecretString>,
    api_client: reqwest::Client,
    raw_client: reqwest::Client,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_base", &self.api_base.as_str())
            .field("raw_base", &self.raw_base.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl GitHubClient {
    pub fn new(config: &HostingConfig) -> Result<Self> {
        let api_base = Self::parse_base(&config.api_base, "api_base")?;
        let raw_base = Self::parse_base(&config.raw_base, "raw_base")?;

        let mut api_headers = HeaderMap::new();
        api_headers.insert(ACCEPT, HeaderValue::from_static(defaults::ACCEPT_HEADER));
        api_headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );

        let api_client = reqwest::Client::builder()
            .user_agent(defaults::USER_AGENT)
            .default_headers(api_headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let raw_client = reqwest::Client::builder()
            .user_agent(defaults::USER_AGENT)
            .timeout(Duration::from_secs(config.file_timeout_secs))
            .build()?;

        Ok(Self {
            api_base,
            raw_base,
            token: config.token.clone().map(SecretString::from),
            api_client,
            raw_client,
        })
    }

    fn parse_base(raw: &str, field: &str) -> Result<Url> {
        let url = Url::parse(raw.trim()).map_err(|e| {
            RoastError::Config(format!("Invalid hosting {} '{}': {}", field, raw, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(RoastError::Config(format!(
                "Hosting {} must be an http(s) base URL, got: {}",
                field, raw
            )));
        }
        Ok(url)
    }

    /// Append path segments to a base URL, percent-encoding each one
    fn join(base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.extend(segment.split('/').filter(|s| !s.is_empty()));
            }
        }
        url
    }

    fn repo_url(&self, repo: &RepositoryReference, rest: &[&str]) -> Url {
        let mut segments = vec!["repos", repo.owner(), repo.name()];
        segments.extend_from_slice(rest);
        Self::join(&self.api_base, &segments)
    }

    fn raw_url(&self, repo: &RepositoryReference, branch: &str, path: &str) -> Url {
        Self::join(&self.raw_base, &[repo.owner(), repo.name(), branch, path])
    }

    async fn get_api(&self, url: Url) -> std::result::Result<reqwest::Response, HostingError> {
        debug!("GET {}", url);
        let mut request = self.api_client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            if let Some(remaining) = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
            {
                debug!("GitHub API status {} (rate limit remaining: {})", status, remaining);
            }
            return Err(HostingError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn repository(
        &self,
        repo: &RepositoryReference,
    ) -> std::result::Result<RepositoryMetadata, HostingError> {
        let response = self.get_api(self.repo_url(repo, &[])).await?;
        Ok(response.json().await?)
    }

    async fn tree(
        &self,
        repo: &RepositoryReference,
        branch: &str,
    ) -> std::result::Result<Vec<TreeEntry>, HostingError> {
        let mut url = self.repo_url(repo, &["git", "trees", branch]);
        url.query_pairs_mut().append_pair("recursive", "1");

        let response: TreeResponse = self.get_api(url).await?.json().await?;
        if response.truncated {
            warn!(
                "Tree listing for {} was truncated by GitHub ({} entries)",
                repo,
                response.tree.len()
            );
        }
        Ok(response.tree)
    }

    async fn raw_file(
        &self,
        repo: &RepositoryReference,
        branch: &str,
        path: &str,
    ) -> std::result::Result<String, HostingError> {
        let url = self.raw_url(repo, branch, path);
        debug!("GET {}", url);

        let response = self.raw_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostingError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }

    fn name(&self) -> &str {
        "github"
    }

    async fn quota(&self) -> std::result::Result<QuotaStatus, HostingError> {
        let url = Self::join(&self.api_base, &["rate_limit"]);
        let body: Value = self.get_api(url).await?.json().await?;

        let core = body
            .pointer("/resources/core")
            .or_else(|| body.get("rate"))
            .ok_or_else(|| HostingError::Decode("missing rate information".to_string()))?;

        let field = |name: &str| core.get(name).and_then(Value::as_u64).unwrap_or(0);
        Ok(QuotaStatus {
            limit: field("limit"),
            remaining: field("remaining"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(&HostingConfig::default()).unwrap()
    }

    fn widget() -> RepositoryReference {
        RepositoryReference::parse("https://github.com/acme/widget").unwrap()
    }

    #[test]
    fn test_repo_urls() {
        let client = client();
        assert_eq!(
            client.repo_url(&widget(), &[]).as_str(),
            "https://api.github.com/repos/acme/widget"
        );

        let mut tree = client.repo_url(&widget(), &["git", "trees", "main"]);
        tree.query_pairs_mut().append_pair("recursive", "1");
        assert_eq!(
            tree.as_str(),
            "https://api.github.com/repos/acme/widget/git/trees/main?recursive=1"
        );
    }

    #[test]
    fn test_raw_url_encodes_segments() {
        let client = client();
        assert_eq!(
            client.raw_url(&widget(), "main", "docs/My File.md").as_str(),
            "https://raw.githubusercontent.com/acme/widget/main/docs/My%20File.md"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let config = HostingConfig {
            api_base: "https://ghe.example.com/api/v3/".to_string(),
            ..HostingConfig::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        assert_eq!(
            client.repo_url(&widget(), &[]).as_str(),
            "https://ghe.example.com/api/v3/repos/acme/widget"
        );
    }

    #[test]
    fn test_rejects_invalid_base() {
        let config = HostingConfig {
            api_base: "ftp://example.com".to_string(),
            ..HostingConfig::default()
        };
        assert!(GitHubClient::new(&config).is_err());

        let config = HostingConfig {
            raw_base: "not a url".to_string(),
            ..HostingConfig::default()
        };
        assert!(GitHubClient::new(&config).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = HostingConfig {
            token: Some("ghp_secret".to_string()),
            ..HostingConfig::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
