//! Pre-flight Validation Checks
//!
//! Probes the two external services a review depends on before any review
//! is started.
//!
//! ## Checks
//!
//! - Hosting API reachability and remaining request quota
//! - LLM provider reachability and credentials

use std::time::Instant;
use tracing::{info, warn};

use crate::ai::provider::LlmProvider;
use crate::hosting::{HostingApi, HostingError};

/// Quota below which a warning is attached to the hosting check
const LOW_QUOTA_THRESHOLD: u64 = 10;

/// Pre-flight check results
#[derive(Debug, Clone)]
pub struct PreflightResult {
    /// All checks passed
    pub passed: bool,
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Warnings (non-blocking)
    pub warnings: Vec<String>,
    /// Errors (blocking)
    pub errors: Vec<String>,
    /// Recommendations
    pub recommendations: Vec<String>,
}

impl PreflightResult {
    pub fn new() -> Self {
        Self {
            passed: true,
            checks: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    fn add_check(&mut self, check: CheckResult) {
        if !check.passed {
            self.passed = false;
            self.errors.push(check.message.clone());
        }
        if let Some(ref warn) = check.warning {
            self.warnings.push(warn.clone());
        }
        self.checks.push(check);
    }

    fn add_recommendation(&mut self, rec: String) {
        self.recommendations.push(rec);
    }
}

impl Default for PreflightResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Individual check result
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub warning: Option<String>,
    pub duration_ms: u64,
}

/// Pre-flight validation checker
#[derive(Debug, Default)]
pub struct PreflightCheck;

impl PreflightCheck {
    pub fn new() -> Self {
        Self
    }

    /// Run every check against the configured services
    pub async fn run(&self, hosting: &dyn HostingApi, provider: &dyn LlmProvider) -> PreflightResult {
        let mut result = PreflightResult::new();

        info!("Running pre-flight checks...");

        self.check_hosting(hosting, &mut result).await;
        self.check_provider_health(provider, &mut result).await;

        if result.passed {
            info!("Pre-flight checks passed ({} checks)", result.checks.len());
        } else {
            warn!("Pre-flight checks failed: {} errors", result.errors.len());
        }

        result
    }

    /// Check the hosting API answers and has quota left
    async fn check_hosting(&self, hosting: &dyn HostingApi, result: &mut PreflightResult) {
        let start = Instant::now();
        let name = format!("hosting_{}", hosting.name());

        match hosting.quota().await {
            Ok(quota) => {
                let passed = quota.remaining > 0;
                let message = format!(
                    "Hosting API '{}' reachable ({}/{} requests remaining)",
                    hosting.name(),
                    quota.remaining,
                    quota.limit
                );
                let warning = (passed && quota.remaining < LOW_QUOTA_THRESHOLD).then(|| {
                    format!("Only {} hosting API requests left", quota.remaining)
                });
                if quota.remaining < LOW_QUOTA_THRESHOLD {
                    result.add_recommendation(
                        "Set GITHUB_TOKEN to raise the hosting API rate limit".to_string(),
                    );
                }
                result.add_check(CheckResult {
                    name,
                    passed,
                    message,
                    warning,
                    duration_ms: start.elapsed().as_millis() as u64,
                });
            }
            Err(e) => {
                result.add_check(CheckResult {
                    name,
                    passed: false,
                    message: format!("Hosting API '{}' unreachable: {}", hosting.name(), e),
                    warning: None,
                    duration_ms: start.elapsed().as_millis() as u64,
                });
                if matches!(e, HostingError::Status(401)) {
                    result.add_recommendation(
                        "Check the GITHUB_TOKEN environment variable".to_string(),
                    );
                }
            }
        }
    }

    /// Check LLM provider availability
    async fn check_provider_health(&self, provider: &dyn LlmProvider, result: &mut PreflightResult) {
        let start = Instant::now();
        let name = format!("provider_health_{}", provider.name());

        match provider.health_check().await {
            Ok(true) => {
                result.add_check(CheckResult {
                    name,
                    passed: true,
                    message: format!(
                        "Provider '{}' is healthy (model {})",
                        provider.name(),
                        provider.model()
                    ),
                    warning: None,
                    duration_ms: start.elapsed().as_millis() as u64,
                });
            }
            Ok(false) => {
                result.add_check(CheckResult {
                    name,
                    passed: false,
                    message: format!("Provider '{}' health check returned false", provider.name()),
                    warning: Some(
                        "Consider checking API credentials or network connectivity".to_string(),
                    ),
                    duration_ms: start.elapsed().as_millis() as u64,
                });
                self.recommend_credentials(provider.name(), result);
            }
            Err(e) => {
                result.add_check(CheckResult {
                    name,
                    passed: false,
                    message: format!("Provider '{}' health check failed: {}", provider.name(), e),
                    warning: None,
                    duration_ms: start.elapsed().as_millis() as u64,
                });
                self.recommend_credentials(provider.name(), result);
            }
        }
    }

    fn recommend_credentials(&self, provider: &str, result: &mut PreflightResult) {
        match provider {
            "openai" => {
                result.add_recommendation("Check OPENAI_API_KEY environment variable".to_string())
            }
            "gemini" => {
                result.add_recommendation("Check GOOGLE_API_KEY environment variable".to_string())
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::QuotaStatus;
    use crate::testing::{FakeHosting, FakeProvider};

    #[test]
    fn test_preflight_result_creation() {
        let mut result = PreflightResult::new();
        assert!(result.passed);

        result.add_check(CheckResult {
            name: "test".to_string(),
            passed: true,
            message: "Test passed".to_string(),
            warning: Some("heads up".to_string()),
            duration_ms: 10,
        });
        assert!(result.passed);
        assert_eq!(result.warnings, vec!["heads up"]);

        result.add_check(CheckResult {
            name: "broken".to_string(),
            passed: false,
            message: "Test failed".to_string(),
            warning: None,
            duration_ms: 5,
        });
        assert!(!result.passed);
        assert_eq!(result.errors, vec!["Test failed"]);
    }

    #[tokio::test]
    async fn test_all_checks_pass() {
        let hosting = FakeHosting::new("x", "main");
        let provider = FakeProvider::new();

        let result = PreflightCheck::new().run(&hosting, &provider).await;
        assert!(result.passed);
        assert_eq!(result.checks.len(), 2);
        assert!(result.checks[0].message.contains("59/60"));
        assert!(result.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_quota_fails() {
        let hosting = FakeHosting::new("x", "main").with_quota(Ok(QuotaStatus {
            limit: 60,
            remaining: 0,
        }));
        let result = PreflightCheck::new()
            .run(&hosting, &FakeProvider::new())
            .await;

        assert!(!result.passed);
        assert_eq!(result.errors.len(), 1);
        assert!(result.recommendations[0].contains("GITHUB_TOKEN"));
    }

    #[tokio::test]
    async fn test_low_quota_warns() {
        let hosting = FakeHosting::new("x", "main").with_quota(Ok(QuotaStatus {
            limit: 60,
            remaining: 3,
        }));
        let result = PreflightCheck::new()
            .run(&hosting, &FakeProvider::new())
            .await;

        assert!(result.passed);
        assert_eq!(result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_services_fail() {
        let hosting =
            FakeHosting::new("x", "main").with_quota(Err(HostingError::Transport("dns".into())));
        let provider = FakeProvider::new().with_health(Err("connection refused".to_string()));

        let result = PreflightCheck::new().run(&hosting, &provider).await;
        assert!(!result.passed);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[1].contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unhealthy_provider_warns() {
        let provider = FakeProvider::new().with_health(Ok(false));
        let result = PreflightCheck::new()
            .run(&FakeHosting::new("x", "main"), &provider)
            .await;

        assert!(!result.passed);
        assert_eq!(result.warnings.len(), 1);
    }
}
