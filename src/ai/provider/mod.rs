//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for structured LLM output generation.
//! All providers return `LlmResponse` with token usage metrics.
//!
//! ## Providers
//!
//! - `gemini`: Google Generative Language API with native response schemas
//! - `openai`: OpenAI-compatible chat completions in JSON mode

mod gemini;
mod openai;
mod prompt_utils;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use prompt_utils::build_schema_instruction;

// Re-export error types from centralized location
pub use crate::types::{ErrorCategory, ErrorClassifier, LlmError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::types::{Result, RoastError};

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including content and usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated content (structured JSON)
    pub content: Value,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: Value) -> Self {
        Self {
            content,
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// Note: API keys are never serialized to output and are redacted in debug
/// output. Each provider converts the key to SecretString internally.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "gemini", "openai"
    pub provider: String,
    /// Model name (provider-specific); provider default when unset
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Temperature for LLM generation
    pub temperature: f32,
    /// API key
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl From<&LlmConfig> for ProviderConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            api_base: config.api_base.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::from(&LlmConfig::default())
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// LLM Provider trait for structured output generation with usage metrics
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate structured output constrained by a JSON Schema
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable and the credentials are accepted
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider from configuration
///
/// A missing API key is not an error here; the provider reports it on the
/// first request.
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.clone())?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.clone())?)),
        _ => Err(RoastError::Config(format!(
            "Unknown provider: {}. Supported: gemini, openai",
            config.provider
        ))),
    }
}

pub(crate) fn missing_key_error(provider: &str, env_hint: &str) -> RoastError {
    RoastError::Llm(LlmError::with_provider(
        ErrorCategory::Auth,
        format!("No API key configured. Set {} or llm.api_key", env_hint),
        provider,
    ))
}
