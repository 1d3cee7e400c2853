//! AI Integration Layer
//!
//! Provides the LLM provider abstraction, response validation and timeout
//! helpers used by the synthesis client, plus pre-flight checks of the
//! external services.

pub mod preflight;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use preflight::{CheckResult, PreflightCheck, PreflightResult};
pub use provider::{
    ErrorCategory, ErrorClassifier, GeminiProvider, LlmError, LlmProvider, LlmResponse,
    OpenAiProvider, ProviderConfig, ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage,
    create_provider,
};
pub use timeout::with_timeout;
pub use validation::{JsonRepairer, ProcessedResponse, ValidationPipeline};
