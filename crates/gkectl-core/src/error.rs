//! Unified error handling for gkectl-core
//!
//! Every failure is returned to the caller; nothing in the core recovers
//! internally. The CLI is the only place that turns these into process exit
//! codes.
//!
//! # Example
//!
//! ```rust
//! use gkectl_core::{ApiError, CoreError};
//!
//! let err: CoreError = ApiError::NotFound { message: "no such cluster".to_string() }.into();
//! assert!(err.is_not_found());
//! assert!(!err.is_cancelled());
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::api::{ApiError, ClusterStatus, OperationStatus};

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// The remote API call itself failed
    #[error("API error: {0}")]
    Client(#[from] ApiError),

    /// Cluster exists but is ERROR or DEGRADED
    #[error("Cluster is in {status} state: {message}")]
    ClusterState {
        status: ClusterStatus,
        message: String,
    },

    /// Awaited operation terminated in ERROR or ABORTING
    #[error("Operation {operation_id} ended with status {status}: {detail}")]
    OperationFailed {
        operation_id: String,
        status: OperationStatus,
        detail: String,
    },

    /// No valid version satisfies the request
    #[error("Unable to find a version in that series: requested version {requested} ({reason})")]
    VersionNotFound { requested: String, reason: String },

    /// Version string with an unexpected number of segments
    #[error("Unexpected version: {version}")]
    MalformedVersion { version: String },

    /// A local precondition needs a cluster snapshot that is not there
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller cancelled an in-flight wait
    #[error("Wait for operation {operation_id} was cancelled")]
    Cancelled { operation_id: String },

    /// The caller-supplied deadline elapsed before the operation finished
    #[error("Operation {operation_id} did not finish within {timeout:?}")]
    DeadlineExceeded {
        operation_id: String,
        timeout: Duration,
    },

    /// The API answered with something the core cannot act on
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub(crate) fn version_not_found(requested: &str, reason: impl Into<String>) -> Self {
        CoreError::VersionNotFound {
            requested: requested.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(version: &str) -> Self {
        CoreError::MalformedVersion {
            version: version.to_string(),
        }
    }

    /// Returns true for a remote 404, a missing snapshot, or an unresolvable version
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Client(e) => e.is_not_found(),
            CoreError::NotFound(_) | CoreError::VersionNotFound { .. } => true,
            _ => false,
        }
    }

    /// Returns true when the wait stopped because of the caller, not the remote side
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            CoreError::Cancelled { .. } | CoreError::DeadlineExceeded { .. }
        )
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Client(e) if e.is_unauthorized())
    }

    /// Cluster status carried by a [`CoreError::ClusterState`]
    pub fn cluster_status(&self) -> Option<ClusterStatus> {
        match self {
            CoreError::ClusterState { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_from_api() {
        let err: CoreError = ApiError::NotFound {
            message: "Cluster not found".to_string(),
        }
        .into();

        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert!(err.to_string().contains("API error"));
    }

    #[test]
    fn test_core_error_api_helpers_delegate() {
        let err: CoreError = ApiError::AuthenticationFailed {
            message: "bad token".to_string(),
        }
        .into();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_cancellation_kinds_are_distinct_from_remote_failures() {
        let cancelled = CoreError::Cancelled {
            operation_id: "op-1".to_string(),
        };
        let deadline = CoreError::DeadlineExceeded {
            operation_id: "op-1".to_string(),
            timeout: Duration::from_secs(60),
        };
        let failed = CoreError::OperationFailed {
            operation_id: "op-1".to_string(),
            status: OperationStatus::Error,
            detail: "boom".to_string(),
        };

        assert!(cancelled.is_cancelled());
        assert!(deadline.is_cancelled());
        assert!(!failed.is_cancelled());
    }

    #[test]
    fn test_cluster_status_accessor() {
        let err = CoreError::ClusterState {
            status: ClusterStatus::Error,
            message: "node pool broken".to_string(),
        };
        assert_eq!(err.cluster_status(), Some(ClusterStatus::Error));
        assert_eq!(
            err.to_string(),
            "Cluster is in ERROR state: node pool broken"
        );
        assert_eq!(CoreError::NotFound("x".into()).cluster_status(), None);
    }

    #[test]
    fn test_version_errors_display() {
        let err = CoreError::version_not_found("1.7", "no valid node version in series");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("requested version 1.7"));

        let err = CoreError::malformed("1.2.3.4.5");
        assert_eq!(err.to_string(), "Unexpected version: 1.2.3.4.5");
    }
}
