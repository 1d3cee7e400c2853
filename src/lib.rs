//! reporoast - Streaming AI Code Review for GitHub Repositories
//!
//! Turns a repository URL into a bounded evidence package, asks a language
//! model for a verdict and streams every stage to the caller as it happens.
//!
//! ## Pipeline
//!
//! - **Collector** ([`scout`]): metadata, a prefix of the file tree and up to
//!   three prioritized file samples, each truncated
//! - **Synthesis** ([`synthesis`]): persona-driven prompt, schema-constrained
//!   model call, repair and validation; failures become a fallback verdict
//! - **Orchestrator** ([`workflow`]): ordered progress events over a bounded
//!   channel with cooperative cancellation and SSE framing
//!
//! ## Quick Start
//!
//! ```ignore
//! use futures::StreamExt;
//! use reporoast::{ConfigLoader, Orchestrator};
//!
//! let config = ConfigLoader::load()?;
//! let orchestrator = Orchestrator::from_config(&config)?;
//! let mut frames = orchestrator.work("https://github.com/acme/widget").into_sse();
//! while let Some(frame) = frames.next().await {
//!     print!("{frame}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM provider abstraction, response validation, pre-flight checks
//! - [`hosting`]: hosting API trait and GitHub client
//! - [`config`]: layered configuration
//! - [`cli`]: command-line surface

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod hosting;
pub mod scout;
pub mod synthesis;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{CollectorError, ErrorCategory, Result, RoastError};

// Domain Types
pub use types::{
    EvidencePackage, FileSample, ProgressEvent, RepositoryReference, Verdict, VerdictRecord,
    WorkflowStage,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use hosting::{GitHubClient, HostingApi};
pub use scout::Collector;
pub use synthesis::{PersonaSelector, SynthesisClient};
pub use workflow::{EventStream, Orchestrator};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{LlmProvider, LlmResponse, PreflightCheck, SharedProvider, create_provider};
