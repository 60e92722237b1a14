//! Axum extractor resolving bearer tokens to principals

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::analysis::AnalysisError;
use crate::domain::auth::{IPrincipalResolver, PrincipalId};
use crate::presentation::models::ApiError;

/// State for the authentication extractor, injected into request extensions
/// by the router middleware
#[derive(Clone)]
pub struct AuthState {
    pub resolver: Arc<dyn IPrincipalResolver>,
}

/// Authenticated caller.
///
/// Reads `Authorization: Bearer <token>` and resolves it through the
/// principal resolver. Any missing, malformed, or unknown token is a 401;
/// the response does not distinguish the three cases.
#[derive(Debug, Clone)]
pub struct Auth {
    pub principal: PrincipalId,
}

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = parts.extensions.get::<AuthState>().ok_or_else(|| {
            ApiError(AnalysisError::database(
                "auth state not found in request extensions".to_string(),
            ))
        })?;

        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(ApiError(AnalysisError::Unauthorized))?;

        let principal = auth_state
            .resolver
            .resolve(token)
            .await?
            .ok_or(ApiError(AnalysisError::Unauthorized))?;

        Ok(Auth { principal })
    }
}
