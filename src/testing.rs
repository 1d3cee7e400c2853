//! In-memory fakes for the hosting API and LLM providers.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::ai::provider::{LlmProvider, LlmResponse, ResponseMetadata};
use crate::hosting::{HostingApi, HostingError, QuotaStatus, RepositoryMetadata, TreeEntry};
use crate::types::{RepositoryReference, Result, RoastError};

// =============================================================================
// Hosting
// =============================================================================

pub struct FakeHosting {
    metadata: std::result::Result<RepositoryMetadata, HostingError>,
    tree: std::result::Result<Vec<TreeEntry>, HostingError>,
    files: HashMap<String, std::result::Result<String, HostingError>>,
    quota: std::result::Result<QuotaStatus, HostingError>,
    delay: Option<Duration>,
    raw_requests: Mutex<Vec<String>>,
    metadata_requests: AtomicUsize,
}

impl FakeHosting {
    pub fn new(name: &str, default_branch: &str) -> Self {
        Self {
            metadata: Ok(RepositoryMetadata {
                name: name.to_string(),
                description: None,
                language: None,
                stargazers_count: 0,
                default_branch: default_branch.to_string(),
            }),
            tree: Ok(Vec::new()),
            files: HashMap::new(),
            quota: Ok(QuotaStatus {
                limit: 60,
                remaining: 59,
            }),
            delay: None,
            raw_requests: Mutex::new(Vec::new()),
            metadata_requests: AtomicUsize::new(0),
        }
    }

    pub fn with_details(mut self, description: &str, language: &str, stars: u64) -> Self {
        if let Ok(metadata) = &mut self.metadata {
            metadata.description = Some(description.to_string());
            metadata.language = Some(language.to_string());
            metadata.stargazers_count = stars;
        }
        self
    }

    pub fn with_metadata_error(mut self, err: HostingError) -> Self {
        self.metadata = Err(err);
        self
    }

    pub fn with_tree(mut self, paths: &[&str]) -> Self {
        self.tree = Ok(paths
            .iter()
            .map(|path| TreeEntry {
                path: path.to_string(),
                kind: Some("blob".to_string()),
            })
            .collect());
        self
    }

    pub fn with_tree_error(mut self, err: HostingError) -> Self {
        self.tree = Err(err);
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), Ok(content.to_string()));
        self
    }

    pub fn with_file_error(mut self, path: &str, err: HostingError) -> Self {
        self.files.insert(path.to_string(), Err(err));
        self
    }

    pub fn with_quota(mut self, quota: std::result::Result<QuotaStatus, HostingError>) -> Self {
        self.quota = quota;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn raw_requests(&self) -> Vec<String> {
        self.raw_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn metadata_requests(&self) -> usize {
        self.metadata_requests.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl HostingApi for FakeHosting {
    async fn repository(
        &self,
        _repo: &RepositoryReference,
    ) -> std::result::Result<RepositoryMetadata, HostingError> {
        self.metadata_requests.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.metadata.clone()
    }

    async fn tree(
        &self,
        _repo: &RepositoryReference,
        _branch: &str,
    ) -> std::result::Result<Vec<TreeEntry>, HostingError> {
        self.tree.clone()
    }

    async fn raw_file(
        &self,
        _repo: &RepositoryReference,
        _branch: &str,
        path: &str,
    ) -> std::result::Result<String, HostingError> {
        if let Ok(mut requests) = self.raw_requests.lock() {
            requests.push(path.to_string());
        }
        self.files
            .get(path)
            .cloned()
            .unwrap_or(Err(HostingError::Status(404)))
    }

    fn name(&self) -> &str {
        "fake-hosting"
    }

    async fn quota(&self) -> std::result::Result<QuotaStatus, HostingError> {
        self.quota.clone()
    }
}

// =============================================================================
// LLM
// =============================================================================

/// Replays scripted responses in order; errors once the script runs out
pub struct FakeProvider {
    script: Mutex<VecDeque<Result<Value>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
    health: std::result::Result<bool, String>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
            health: Ok(true),
        }
    }

    pub fn replying(content: Value) -> Self {
        Self::new().then_reply(content)
    }

    pub fn then_reply(self, content: Value) -> Self {
        self.push(Ok(content));
        self
    }

    pub fn then_fail(self, err: RoastError) -> Self {
        self.push(Err(err));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_health(mut self, health: std::result::Result<bool, String>) -> Self {
        self.health = health;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(&self, entry: Result<Value>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn generate(&self, prompt: &str, _schema: &Value) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let content = next.unwrap_or_else(|| Err(RoastError::LlmApi("script exhausted".into())))?;

        let mut response = LlmResponse::content_only(content);
        response.metadata = ResponseMetadata {
            model: "fake-model".to_string(),
            provider: "fake".to_string(),
        };
        Ok(response)
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn health_check(&self) -> Result<bool> {
        self.health.clone().map_err(RoastError::LlmApi)
    }
}
