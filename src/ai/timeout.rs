//! Timeout Helpers
//!
//! Wraps async operations so that an elapsed deadline surfaces as
//! `RoastError::Timeout` instead of a bare `Elapsed`.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::with_timeout;
//!
//! let response = with_timeout(
//!     Duration::from_secs(60),
//!     provider.generate(&prompt, &schema),
//!     "LLM request",
//! ).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::types::{Result, RoastError};

/// Execute an async operation with a timeout
///
/// Returns a timeout error if the operation doesn't complete within the specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(RoastError::timeout(operation_name, timeout)),
    }
}
