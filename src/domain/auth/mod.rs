//! Credential boundary: opaque bearer tokens resolved to principals
//!
//! Token issuance and lifecycle live outside this service; the pipeline only
//! needs a token-to-principal lookup.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::analysis::AnalysisError;

/// Identity of the calling principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for PrincipalId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Maps an opaque bearer token to the principal it authenticates.
/// `Ok(None)` means the token is unknown or revoked.
#[async_trait]
pub trait IPrincipalResolver: Send + Sync {
    async fn resolve(&self, bearer_token: &str) -> Result<Option<PrincipalId>, AnalysisError>;
}
