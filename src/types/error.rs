//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Domains
//!
//! - **Collector**: `CollectorError`, fatal to a request and surfaced to the
//!   caller as the terminal error event
//! - **LLM**: `LlmError` with an `ErrorCategory` that drives the retry decision;
//!   always absorbed by the synthesis client
//! - **Application**: `RoastError`, the crate-wide error used by config,
//!   clients and the CLI

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for LLM retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Model output could not be parsed or had the wrong shape
    ParseError,
    /// Temporary server issues - retry
    Transient,
    /// Request exceeded its deadline
    Timeout,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth another attempt against the same provider.
    ///
    /// Timeouts are not retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    pub category: ErrorCategory,
    pub message: String,
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto an `ErrorCategory`
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 404 | 422 => ErrorCategory::BadRequest,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify a transport failure from reqwest
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_timeout() {
            ErrorCategory::Timeout
        } else if err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };
        LlmError::with_provider(category, err.to_string(), provider)
    }

    /// Classify a crate error with type-based routing
    pub fn classify_roast_error(err: &RoastError, provider: &str) -> LlmError {
        match err {
            RoastError::Llm(llm_err) => llm_err.clone(),
            RoastError::Timeout { .. } => {
                LlmError::with_provider(ErrorCategory::Timeout, err.to_string(), provider)
            }
            RoastError::Json(_) | RoastError::LlmApi(_) => {
                LlmError::with_provider(ErrorCategory::ParseError, err.to_string(), provider)
            }
            RoastError::Http(http) => Self::classify_transport(http, provider),
            RoastError::Config(_) => {
                LlmError::with_provider(ErrorCategory::BadRequest, err.to_string(), provider)
            }
            _ => LlmError::with_provider(ErrorCategory::Unknown, err.to_string(), provider),
        }
    }
}

// =============================================================================
// Collector Error
// =============================================================================

/// Failures of the evidence collector.
///
/// `Display` is the user-facing message carried into the terminal error event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectorError {
    #[error("Invalid URL format. Use: https://github.com/owner/repo")]
    InvalidUrl { input: String },

    #[error("Repo not found or Private.")]
    NotFound,

    #[error("GitHub Rate Limit Exceeded.")]
    RateLimited,

    #[error("GitHub API returned unexpected status {status}.")]
    UnexpectedStatus { status: u16 },

    #[error("Scout failed: {0}")]
    Unexpected(String),
}

impl CollectorError {
    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// Map a non-success metadata status onto the taxonomy
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            403 | 429 => Self::RateLimited,
            _ => Self::UnexpectedStatus { status },
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum RoastError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    Collector(#[from] CollectorError),

    /// Structured LLM error with category
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Model returned something unusable
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

impl From<LlmError> for RoastError {
    fn from(err: LlmError) -> Self {
        RoastError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, RoastError>;

impl RoastError {
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Check if this error is worth retrying against the same provider
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Llm(e) => e.is_retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
