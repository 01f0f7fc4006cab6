// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for history re-replication.
//!
//! # Error Categories
//!
//! | Error Type | Retryable | Description |
//! |------------|-----------|-------------|
//! | `Fetch` | Yes | Source-cluster history RPC failed |
//! | `Apply` | Yes | Destination-cluster apply RPC failed |
//! | `DomainNotFound` | No | Domain cache has no entry for the domain ID |
//! | `Encoding` | No | Unknown encoding tag or malformed event blob |
//! | `CorruptHistory` | No | History structure violates traversal assumptions |
//! | `Config` | No | Configuration invalid |
//!
//! # Retry Behavior
//!
//! Use [`RereplicationError::is_retryable()`] to decide whether to retry the
//! whole span. Retryable errors indicate transient network or availability
//! issues on one of the two clusters. Non-retryable errors indicate bad
//! input, data corruption at the source, or an upstream bug; retrying the
//! same span will fail the same way.
//!
//! Nothing is rolled back on failure: batches applied before the error stay
//! applied (the destination applier is idempotent per run and event range).

use thiserror::Error;

/// Result type alias for re-replication operations.
pub type Result<T> = std::result::Result<T, RereplicationError>;

/// Errors that can occur while re-replicating a span of history.
#[derive(Error, Debug)]
pub enum RereplicationError {
    /// The domain cache has no entry for the requested domain ID.
    ///
    /// The source-cluster RPC is keyed on domain name, so a cache miss makes
    /// the whole call impossible. Not retryable.
    #[error("domain not found: {domain_id}")]
    DomainNotFound { domain_id: String },

    /// Source-cluster raw-history RPC failure.
    ///
    /// Network errors, remote unavailability, or unknown workflow/run on the
    /// source side. Retryable; the caller may re-issue the whole span.
    #[error("history fetch failed ({workflow_id}/{run_id}): {message}")]
    Fetch {
        workflow_id: String,
        run_id: String,
        message: String,
    },

    /// Destination-cluster apply RPC failure.
    ///
    /// Retryable; already-applied batches are left in place and the applier
    /// is idempotent, so re-sending the span is safe.
    #[error("history apply failed ({workflow_id}/{run_id}): {message}")]
    Apply {
        workflow_id: String,
        run_id: String,
        message: String,
    },

    /// Unknown encoding tag or malformed event blob.
    ///
    /// The data is corrupt at the source; not retryable.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The fetched history violates a structural assumption of the
    /// traversal (e.g. a run's first batch is missing its started event, or
    /// the run chain contains a cycle). Indicates an upstream bug; not
    /// retryable.
    #[error("corrupt history: {0}")]
    CorruptHistory(String),

    /// Invalid configuration.
    ///
    /// Rejected at construction time; fix the config and rebuild the
    /// re-replicator.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RereplicationError {
    /// Create a fetch error for a specific workflow run.
    pub fn fetch(
        workflow_id: impl Into<String>,
        run_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Fetch {
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
            message: message.into(),
        }
    }

    /// Create an apply error for a specific workflow run.
    pub fn apply(
        workflow_id: impl Into<String>,
        run_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Apply {
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch { .. } => true,
            Self::Apply { .. } => true,
            Self::DomainNotFound { .. } => false,
            Self::Encoding(_) => false, // data corruption
            Self::CorruptHistory(_) => false,
            Self::Config(_) => false,
        }
    }

    /// Short stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DomainNotFound { .. } => "domain_not_found",
            Self::Fetch { .. } => "fetch",
            Self::Apply { .. } => "apply",
            Self::Encoding(_) => "encoding",
            Self::CorruptHistory(_) => "corrupt_history",
            Self::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_fetch() {
        let err = RereplicationError::fetch("wf", "run-1", "connection reset");
        assert!(err.is_retryable());
        assert!(err.to_string().contains("run-1"));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_is_retryable_apply() {
        let err = RereplicationError::apply("wf", "run-1", "remote unavailable");
        assert!(err.is_retryable());
        assert!(err.to_string().contains("remote unavailable"));
    }

    #[test]
    fn test_not_retryable_domain_not_found() {
        let err = RereplicationError::DomainNotFound {
            domain_id: "some-domain-id".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("some-domain-id"));
    }

    #[test]
    fn test_not_retryable_encoding() {
        let err = RereplicationError::Encoding("unrecognized encoding tag".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_retryable_corrupt_history() {
        let err = RereplicationError::CorruptHistory("new run has no first batch".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_retryable_config() {
        let err = RereplicationError::Config("page_size must be positive".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(RereplicationError::fetch("wf", "r", "boom").kind(), "fetch");
        assert_eq!(RereplicationError::apply("wf", "r", "boom").kind(), "apply");
        assert_eq!(RereplicationError::Encoding("x".into()).kind(), "encoding");
        assert_eq!(
            RereplicationError::CorruptHistory("x".into()).kind(),
            "corrupt_history"
        );
        assert_eq!(
            RereplicationError::DomainNotFound {
                domain_id: "d".into()
            }
            .kind(),
            "domain_not_found"
        );
    }
}
