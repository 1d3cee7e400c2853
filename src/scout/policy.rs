//! Failure Policy Table
//!
//! | Step     | Policy  | Effect                                   |
//! |----------|---------|------------------------------------------|
//! | Metadata | Fatal   | request ends with a collector error      |
//! | Tree     | Degrade | continue with an empty tree              |
//! | RawFile  | Skip    | try the next candidate, quota unaffected |

use std::fmt;

use crate::hosting::HostingError;
use crate::types::CollectorError;

/// Outbound calls made by the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorStep {
    Metadata,
    Tree,
    RawFile,
}

impl fmt::Display for CollectorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metadata => write!(f, "metadata"),
            Self::Tree => write!(f, "tree"),
            Self::RawFile => write!(f, "raw file"),
        }
    }
}

/// What a failed step means for the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Fatal,
    Degrade,
    Skip,
}

impl CollectorStep {
    pub const fn policy(&self) -> FailurePolicy {
        match self {
            Self::Metadata => FailurePolicy::Fatal,
            Self::Tree => FailurePolicy::Degrade,
            Self::RawFile => FailurePolicy::Skip,
        }
    }
}

/// Map a hosting failure onto the collector taxonomy
pub fn to_collector_error(step: CollectorStep, err: HostingError) -> CollectorError {
    match err {
        HostingError::Status(status) => CollectorError::from_status(status),
        HostingError::Timeout => {
            CollectorError::Unexpected(format!("GitHub {} request timed out", step))
        }
        HostingError::Transport(message) | HostingError::Decode(message) => {
            CollectorError::Unexpected(message)
        }
    }
}

/// Apply the policy table: `Ok(Some)` on success, `Ok(None)` when the failure
/// is tolerated, `Err` when it is fatal.
pub fn resolve<T>(
    step: CollectorStep,
    result: Result<T, HostingError>,
) -> Result<Option<T>, CollectorError> {
    let err = match result {
        Ok(value) => return Ok(Some(value)),
        Err(err) => err,
    };

    match step.policy() {
        FailurePolicy::Fatal => Err(to_collector_error(step, err)),
        FailurePolicy::Degrade => {
            tracing::warn!("GitHub {} request failed, continuing without it: {}", step, err);
            Ok(None)
        }
        FailurePolicy::Skip => {
            tracing::debug!("GitHub {} request failed, skipping: {}", step, err);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert_eq!(CollectorStep::Metadata.policy(), FailurePolicy::Fatal);
        assert_eq!(CollectorStep::Tree.policy(), FailurePolicy::Degrade);
        assert_eq!(CollectorStep::RawFile.policy(), FailurePolicy::Skip);
    }

    #[test]
    fn test_resolve_success_passes_through() {
        let resolved = resolve(CollectorStep::Metadata, Ok::<_, HostingError>(5)).unwrap();
        assert_eq!(resolved, Some(5));
    }

    #[test]
    fn test_resolve_fatal_maps_status() {
        let err = resolve::<()>(CollectorStep::Metadata, Err(HostingError::Status(404)))
            .unwrap_err();
        assert_eq!(err, CollectorError::NotFound);

        let err = resolve::<()>(CollectorStep::Metadata, Err(HostingError::Status(403)))
            .unwrap_err();
        assert_eq!(err, CollectorError::RateLimited);

        let err = resolve::<()>(CollectorStep::Metadata, Err(HostingError::Timeout)).unwrap_err();
        assert_eq!(err.kind(), "unexpected");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_resolve_tolerated_steps() {
        assert_eq!(
            resolve::<()>(CollectorStep::Tree, Err(HostingError::Status(500))),
            Ok(None)
        );
        assert_eq!(
            resolve::<()>(CollectorStep::RawFile, Err(HostingError::Timeout)),
            Ok(None)
        );
    }
}
