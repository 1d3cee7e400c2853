//! Synthesis Client
//!
//! Sends an `EvidencePackage` to the model under the selected persona and
//! returns a `VerdictRecord`. The client absorbs every failure (transport,
//! timeout, unusable output) into a fallback record, so its result type is
//! `Result<VerdictRecord, Infallible>`.
//!
//! ## Flow
//!
//! 1. Select persona and compose the prompt
//! 2. Call the provider under a timeout, retrying transient failures
//! 3. Repair and validate the response into a record
//! 4. Enforce the persona's pinned verdict

mod persona;
mod prompt;

pub use persona::{Persona, PersonaMatch, PersonaSelector};
pub use prompt::{compose, verdict_schema};

use std::convert::Infallible;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::ai::provider::{ProviderConfig, SharedProvider, create_provider};
use crate::ai::timeout::with_timeout;
use crate::ai::validation::ValidationPipeline;
use crate::config::Config;
use crate::constants::llm as defaults;
use crate::types::{ErrorClassifier, EvidencePackage, Result, RoastError, VerdictRecord};

/// Retry schedule for transient model failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(defaults::BASE_DELAY_MS),
            max_delay: Duration::from_secs(defaults::MAX_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries)
            .with_jitter()
    }
}

/// Model-backed reviewer
pub struct SynthesisClient {
    provider: SharedProvider,
    personas: PersonaSelector,
    pipeline: ValidationPipeline,
    schema: Value,
    timeout: Duration,
    retry: RetryPolicy,
}

impl SynthesisClient {
    pub fn new(provider: SharedProvider, personas: PersonaSelector) -> Self {
        Self {
            provider,
            personas,
            pipeline: ValidationPipeline::new(),
            schema: verdict_schema(),
            timeout: Duration::from_secs(defaults::DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    /// Build the provider and persona rules from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&ProviderConfig::from(&config.llm))?;
        let retry = RetryPolicy {
            max_retries: config.llm.max_retries,
            ..RetryPolicy::default()
        };

        Ok(Self::new(provider, PersonaSelector::from_config(&config.persona))
            .with_timeout(Duration::from_secs(config.llm.timeout_secs))
            .with_retry(retry))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Review the evidence; failures become a fallback record
    #[instrument(
        skip_all,
        fields(owner = %evidence.owner, repo = %evidence.repo_name, provider = self.provider.name())
    )]
    pub async fn synthesize(
        &self,
        evidence: &EvidencePackage,
    ) -> std::result::Result<VerdictRecord, Infallible> {
        let persona = self.personas.select(evidence);
        debug!("Reviewing as persona '{}'", persona.name);

        let prompt = compose(persona, evidence);
        let record = match self.generate_with_retry(&prompt).await {
            Ok(record) => {
                info!("Verdict: {}", record.verdict);
                record
            }
            Err(err) => {
                let category =
                    ErrorClassifier::classify_roast_error(&err, self.provider.name()).category;
                warn!(%category, "Synthesis failed, returning fallback verdict: {}", err);
                VerdictRecord::fallback(&err)
            }
        };

        Ok(persona.apply(record))
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<VerdictRecord> {
        (|| self.attempt(prompt))
            .retry(self.retry.backoff())
            .sleep(tokio::time::sleep)
            .when(RoastError::is_recoverable)
            .notify(|err: &RoastError, delay: Duration| {
                warn!("Model call failed ({}), retrying in {:?}", err, delay);
            })
            .await
    }

    async fn attempt(&self, prompt: &str) -> Result<VerdictRecord> {
        let response = with_timeout(
            self.timeout,
            self.provider.generate(prompt, &self.schema),
            "LLM request",
        )
        .await?;

        debug!(
            "Model responded in {}ms ({} tokens)",
            response.timing.total_ms,
            response.usage.total()
        );

        let processed = self.pipeline.process_value(response.content)?;
        if processed.was_repaired || processed.validation.warning_count() > 0 {
            debug!(
                "Response normalized (repaired: {}, warnings: {})",
                processed.was_repaired,
                processed.validation.warning_count()
            );
        }
        Ok(processed.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PersonaConfig;
    use crate::testing::FakeProvider;
    use crate::types::{ErrorCategory, LlmError, Verdict};
    use serde_json::json;
    use std::sync::Arc;

    fn evidence(owner: &str) -> EvidencePackage {
        EvidencePackage {
            owner: owner.to_string(),
            repo_name: "widget".to_string(),
            description: Some("Tiny tool".to_string()),
            primary_language: Some("Rust".to_string()),
            star_count: 9,
            file_structure_sample: vec!["main.rs".to_string()],
            file_samples: Vec::new(),
        }
    }

    fn fast_retry(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    fn reviewer(provider: Arc<FakeProvider>, personas: PersonaSelector) -> SynthesisClient {
        SynthesisClient::new(provider, personas).with_retry(fast_retry(2))
    }

    fn good_response() -> Value {
        json!({
            "verdict": "Almost There",
            "roast": ["Your README is longer than your code."],
            "good_things": ["Compiles"],
            "suggestions": ["Add tests"]
        })
    }

    fn rate_limited() -> RoastError {
        RoastError::Llm(LlmError::with_provider(
            ErrorCategory::RateLimit,
            "quota",
            "fake",
        ))
    }

    #[tokio::test]
    async fn test_valid_response_becomes_record() {
        let provider = Arc::new(FakeProvider::replying(good_response()));
        let client = reviewer(provider.clone(), PersonaSelector::default());

        let Ok(record) = client.synthesize(&evidence("acme")).await;
        assert_eq!(record.verdict, Verdict::AlmostThere);
        assert_eq!(record.suggestions, vec!["Add tests"]);
        assert_eq!(provider.calls(), 1);
        assert!(provider.prompts()[0].contains("REPO: acme/widget"));
    }

    #[tokio::test]
    async fn test_provider_error_becomes_fallback() {
        let provider =
            Arc::new(FakeProvider::new().then_fail(RoastError::LlmApi("model exploded".into())));
        let client = reviewer(provider.clone(), PersonaSelector::default());

        let Ok(record) = client.synthesize(&evidence("acme")).await;
        assert_eq!(record.verdict, Verdict::SkipIt);
        assert_eq!(record.roast.len(), 1);
        assert!(record.roast[0].starts_with("AI Error: "));
        assert!(record.roast[0].contains("model exploded"));
        assert!(record.good_things.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_output_becomes_fallback() {
        for content in [
            json!("not json at all"),
            json!(""),
            json!({"verdict": "Maybe"}),
            json!([1, 2, 3]),
        ] {
            let provider = Arc::new(FakeProvider::replying(content));
            let client = reviewer(provider, PersonaSelector::default());
            let Ok(record) = client.synthesize(&evidence("acme")).await;
            assert_eq!(record.verdict, Verdict::SkipIt);
            assert!(record.roast[0].starts_with("AI Error: "));
        }
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let provider = Arc::new(
            FakeProvider::new()
                .then_fail(rate_limited())
                .then_fail(rate_limited())
                .then_reply(good_response()),
        );
        let client = reviewer(provider.clone(), PersonaSelector::default());

        let Ok(record) = client.synthesize(&evidence("acme")).await;
        assert_eq!(record.verdict, Verdict::AlmostThere);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let provider = Arc::new(
            FakeProvider::new()
                .then_fail(rate_limited())
                .then_fail(rate_limited())
                .then_fail(rate_limited())
                .then_reply(good_response()),
        );
        let client = reviewer(provider.clone(), PersonaSelector::default());

        let Ok(record) = client.synthesize(&evidence("acme")).await;
        assert_eq!(record.verdict, Verdict::SkipIt);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_timeout_becomes_fallback_without_retry() {
        let provider = Arc::new(
            FakeProvider::replying(good_response()).with_delay(Duration::from_millis(200)),
        );
        let client = reviewer(provider.clone(), PersonaSelector::default())
            .with_timeout(Duration::from_millis(10));

        let Ok(record) = client.synthesize(&evidence("acme")).await;
        assert_eq!(record.verdict, Verdict::SkipIt);
        assert!(record.roast[0].contains("LLM request"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_loyalty_persona_forces_ship_it() {
        let personas = PersonaSelector::from_config(&PersonaConfig {
            creator: Some("Octocat".to_string()),
        });

        let provider = Arc::new(FakeProvider::replying(json!({
            "verdict": "Skip It",
            "roast": ["I will not roast my creator."],
            "good_things": [],
            "suggestions": []
        })));
        let client = reviewer(provider.clone(), personas.clone());
        let Ok(record) = client.synthesize(&evidence("OCTOCAT")).await;
        assert_eq!(record.verdict, Verdict::ShipIt);
        assert!(provider.prompts()[0].contains("refuse to roast"));

        let failing = Arc::new(FakeProvider::new().then_fail(RoastError::LlmApi("down".into())));
        let client = reviewer(failing, personas);
        let Ok(record) = client.synthesize(&evidence("octocat")).await;
        assert_eq!(record.verdict, Verdict::ShipIt);
        assert!(record.roast[0].starts_with("AI Error: "));
    }

    #[test]
    fn test_from_config_uses_llm_settings() {
        let mut config = Config::default();
        config.llm.max_retries = 5;
        config.llm.timeout_secs = 7;
        let client = SynthesisClient::from_config(&config).unwrap();
        assert_eq!(client.provider_name(), "gemini");
        assert_eq!(client.retry.max_retries, 5);
        assert_eq!(client.timeout, Duration::from_secs(7));
    }
}
