//! SQLx implementation of the issue repository

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::analysis::{AnalysisError, IIssueRepository, SecurityIssue};
use crate::domain::auth::PrincipalId;

use super::rows::IssueRow;

pub struct SqlxIssueRepository {
    pool: Arc<PgPool>,
}

impl SqlxIssueRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn set_flag(
        &self,
        issue_id: Uuid,
        column: &'static str,
        value: bool,
    ) -> Result<(), AnalysisError> {
        // `column` is one of two compile-time literals, never caller input.
        let statement = format!("UPDATE security_issues SET {column} = $2 WHERE id = $1");

        let result = sqlx::query(&statement)
            .bind(issue_id)
            .bind(value)
            .execute(&*self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, column, "database error updating issue flag");
                AnalysisError::database(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(AnalysisError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl IIssueRepository for SqlxIssueRepository {
    #[tracing::instrument(skip(self), fields(session_id = %session_id))]
    async fn list_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<SecurityIssue>, AnalysisError> {
        let rows = sqlx::query_as::<_, IssueRow>(
            r#"
            SELECT id, session_id, severity, issue_type, category,
                   file_path, line_number, code_snippet, description, recommendation,
                   confidence_score, false_positive, resolved, created_at
            FROM security_issues
            WHERE session_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(session_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error listing issues");
            AnalysisError::database(e.to_string())
        })?;

        rows.into_iter().map(SecurityIssue::try_from).collect()
    }

    #[tracing::instrument(skip(self), fields(issue_id = %issue_id, principal = %principal))]
    async fn find_owned(
        &self,
        issue_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<SecurityIssue>, AnalysisError> {
        let row = sqlx::query_as::<_, IssueRow>(
            r#"
            SELECT i.id, i.session_id, i.severity, i.issue_type, i.category,
                   i.file_path, i.line_number, i.code_snippet, i.description, i.recommendation,
                   i.confidence_score, i.false_positive, i.resolved, i.created_at
            FROM security_issues i
            JOIN analysis_sessions s ON s.id = i.session_id
            JOIN projects p ON p.id = s.project_id
            WHERE i.id = $1 AND p.principal_id = $2
            "#,
        )
        .bind(issue_id)
        .bind(principal.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error finding issue");
            AnalysisError::database(e.to_string())
        })?;

        row.map(SecurityIssue::try_from).transpose()
    }

    async fn set_resolved(&self, issue_id: Uuid, resolved: bool) -> Result<(), AnalysisError> {
        self.set_flag(issue_id, "resolved", resolved).await
    }

    async fn set_false_positive(
        &self,
        issue_id: Uuid,
        false_positive: bool,
    ) -> Result<(), AnalysisError> {
        self.set_flag(issue_id, "false_positive", false_positive).await
    }
}
