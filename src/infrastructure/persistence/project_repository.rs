//! SQLx implementation of the project repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::analysis::{AnalysisError, IProjectRepository};
use crate::domain::auth::PrincipalId;
use crate::domain::project::Project;

use super::rows::ProjectRow;

pub struct SqlxProjectRepository {
    pool: Arc<PgPool>,
}

impl SqlxProjectRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IProjectRepository for SqlxProjectRepository {
    #[tracing::instrument(skip(self), fields(project_id = %project_id, principal = %principal))]
    async fn find_owned(
        &self,
        project_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<Project>, AnalysisError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, principal_id, name, source_content, last_analyzed_at, created_at, updated_at
            FROM projects
            WHERE id = $1 AND principal_id = $2
            "#,
        )
        .bind(project_id)
        .bind(principal.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error finding project");
            AnalysisError::database(e.to_string())
        })?;

        Ok(row.map(Project::from))
    }

    #[tracing::instrument(skip(self), fields(project_id = %project_id))]
    async fn find_by_id(&self, project_id: Uuid) -> Result<Option<Project>, AnalysisError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, principal_id, name, source_content, last_analyzed_at, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error finding project by id");
            AnalysisError::database(e.to_string())
        })?;

        Ok(row.map(Project::from))
    }

    #[tracing::instrument(skip(self), fields(project_id = %project_id))]
    async fn touch_analyzed(
        &self,
        project_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AnalysisError> {
        sqlx::query(
            r#"
            UPDATE projects
            SET last_analyzed_at = $2, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(project_id)
        .bind(at)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error bumping project analysis timestamps");
            AnalysisError::database(e.to_string())
        })?;

        Ok(())
    }
}
