//! SQLx bearer-token lookup for the credential boundary

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::analysis::AnalysisError;
use crate::domain::auth::{IPrincipalResolver, PrincipalId};

pub struct SqlxPrincipalResolver {
    pool: Arc<PgPool>,
}

impl SqlxPrincipalResolver {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IPrincipalResolver for SqlxPrincipalResolver {
    async fn resolve(&self, bearer_token: &str) -> Result<Option<PrincipalId>, AnalysisError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT principal_id
            FROM api_tokens
            WHERE token = $1 AND NOT revoked
            "#,
        )
        .bind(bearer_token)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error resolving bearer token");
            AnalysisError::database(e.to_string())
        })?;

        Ok(row.map(|(id,)| PrincipalId::new(id)))
    }
}
