//! Reasoning provider trait and error types

use async_trait::async_trait;
use thiserror::Error;

/// Error from a reasoning-service call.
///
/// The orchestrator absorbs every variant into "zero findings"; the variants
/// exist so the degradation is logged with its actual cause.
#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ReasoningError {
    /// Whether a retry could plausibly succeed. The pipeline never retries,
    /// but the distinction matters for log triage.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReasoningError::RateLimited(_)
                | ReasoningError::Network(_)
                | ReasoningError::Timeout { .. }
                | ReasoningError::ServiceUnavailable(_)
        )
    }
}

impl From<reqwest::Error> for ReasoningError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ReasoningError::Timeout { seconds: 0 }
        } else if err.is_connect() {
            ReasoningError::Network(format!("connection failed: {err}"))
        } else {
            ReasoningError::Network(err.to_string())
        }
    }
}

/// External code-reasoning service boundary.
///
/// Object-safe so the orchestrator can hold `Arc<dyn ReasoningProvider>` and
/// tests can substitute a scripted implementation.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    /// Request a vulnerability assessment for the given source content.
    /// Returns the model's raw text output; extraction happens downstream.
    async fn assess(&self, source: &str, project_label: &str) -> Result<String, ReasoningError>;

    /// Identifier of the model behind this provider, recorded on sessions
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(ReasoningError::Network("reset".into()).is_retryable());
        assert!(ReasoningError::Timeout { seconds: 30 }.is_retryable());
        assert!(ReasoningError::RateLimited("quota".into()).is_retryable());

        assert!(!ReasoningError::Authentication("bad key".into()).is_retryable());
        assert!(!ReasoningError::InvalidResponse("empty".into()).is_retryable());
    }
}
