//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/reporoast/) and project (.reporoast/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{hosting, llm, workflow};
use crate::types::{Result, RoastError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Repository hosting API settings
    pub hosting: HostingConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Reviewer persona settings
    pub persona: PersonaConfig,

    /// Workflow pacing
    pub workflow: WorkflowConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            hosting: HostingConfig::default(),
            llm: LlmConfig::default(),
            persona: PersonaConfig::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(RoastError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(RoastError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.hosting.timeout_secs == 0 || self.hosting.file_timeout_secs == 0 {
            return Err(RoastError::Config(
                "Hosting timeout_secs and file_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.hosting.api_base.trim().is_empty() || self.hosting.raw_base.trim().is_empty() {
            return Err(RoastError::Config(
                "Hosting api_base and raw_base must not be empty".to_string(),
            ));
        }

        if self.llm.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(RoastError::Config("LLM model must not be empty".to_string()));
        }

        if !matches!(self.llm.provider.as_str(), "gemini" | "openai") {
            return Err(RoastError::Config(format!(
                "Unknown LLM provider: {}. Supported: gemini, openai",
                self.llm.provider
            )));
        }

        Ok(())
    }

    /// Non-fatal problems worth surfacing at startup
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.llm.api_key.is_none() {
            let hint = match self.llm.provider.as_str() {
                "openai" => "OPENAI_API_KEY",
                _ => "GOOGLE_API_KEY",
            };
            warnings.push(format!(
                "No API key configured for LLM provider '{}'. Set {} or llm.api_key; reviews will fall back to an error verdict.",
                self.llm.provider, hint
            ));
        }

        if self.hosting.token.is_none() {
            warnings.push(
                "No GitHub token configured (GITHUB_TOKEN). Anonymous requests are heavily rate limited."
                    .to_string(),
            );
        }

        warnings
    }
}

// =============================================================================
// Hosting Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostingConfig {
    /// REST API base URL
    pub api_base: String,

    /// Raw file content base URL
    pub raw_base: String,

    /// Optional access token, sent to the REST API only.
    /// Never serialized to output.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Timeout for metadata and tree requests
    pub timeout_secs: u64,

    /// Timeout for each raw file fetch
    pub file_timeout_secs: u64,
}

impl std::fmt::Debug for HostingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostingConfig")
            .field("api_base", &self.api_base)
            .field("raw_base", &self.raw_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("file_timeout_secs", &self.file_timeout_secs)
            .finish()
    }
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            api_base: hosting::DEFAULT_API_BASE.to_string(),
            raw_base: hosting::DEFAULT_RAW_BASE.to_string(),
            token: None,
            timeout_secs: hosting::DEFAULT_TIMEOUT_SECS,
            file_timeout_secs: hosting::DEFAULT_FILE_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "gemini" or "openai"
    pub provider: String,

    /// Model name; provider default when unset
    pub model: Option<String>,

    /// API key. Never serialized to output.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Custom endpoint
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Retries for rate-limit and server errors
    pub max_retries: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            api_key: None,
            api_base: None,
            timeout_secs: llm::DEFAULT_TIMEOUT_SECS,
            temperature: 0.9,
            max_tokens: llm::DEFAULT_MAX_TOKENS,
            max_retries: llm::DEFAULT_MAX_RETRIES,
        }
    }
}

// =============================================================================
// Persona Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Repository owner that gets the loyal reviewer (case-insensitive)
    pub creator: Option<String>,
}

// =============================================================================
// Workflow Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Pause after the first status event, in milliseconds
    pub init_pause_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            init_pause_ms: workflow::DEFAULT_INIT_PAUSE_MS,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.hosting.api_base, "https://api.github.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.hosting.file_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.hosting.api_base = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.provider = "ollama".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.model = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_startup_warnings() {
        let mut config = Config::default();
        let warnings = config.startup_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("GOOGLE_API_KEY"));

        config.llm.api_key = Some("k".into());
        config.hosting.token = Some("t".into());
        assert!(config.startup_warnings().is_empty());
    }

    #[test]
    fn test_secrets_are_not_serialized_or_debugged() {
        let mut config = Config::default();
        config.llm.api_key = Some("super-secret".into());
        config.hosting.token = Some("ghp_secret".into());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!json.contains("ghp_secret"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
