//! Analysis domain errors

use thiserror::Error;

/// Error taxonomy for the analysis pipeline.
///
/// `NotFound` deliberately covers both "does not exist" and "exists but is
/// owned by someone else" so callers cannot enumerate other principals'
/// resources. Reasoning-service degradation never appears here: it is
/// absorbed inside the pipeline as an empty finding set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("resource not found")]
    NotFound,

    #[error("missing or invalid credentials")]
    Unauthorized,

    #[error("invalid request: {message}")]
    Validation { message: String },

    #[error("storage error: {message}")]
    Database { message: String },
}

impl AnalysisError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
