//! SQLx implementation of the session repository

use async_trait::async_trait;
use sqlx::{Acquire, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::analysis::{
    AnalysisError, AnalysisSession, ISessionRepository, SecurityIssue,
};
use crate::domain::auth::PrincipalId;

use super::rows::SessionRow;

pub struct SqlxSessionRepository {
    pool: Arc<PgPool>,
}

impl SqlxSessionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ISessionRepository for SqlxSessionRepository {
    #[tracing::instrument(skip(self, session, issues), fields(session_id = %session.id, issue_count = issues.len()))]
    async fn create_with_issues(
        &self,
        session: &AnalysisSession,
        issues: &[SecurityIssue],
    ) -> Result<Vec<SecurityIssue>, AnalysisError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "failed to open transaction for session insert");
            AnalysisError::database(e.to_string())
        })?;

        sqlx::query(
            r#"
            INSERT INTO analysis_sessions (
                id, project_id, status, overall_score,
                total_issues, critical_issues, high_issues, medium_issues, low_issues,
                processing_time_ms, model, created_at, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(session.id)
        .bind(session.project_id)
        .bind(session.status.as_str())
        .bind(session.overall_score)
        .bind(session.total_issues as i32)
        .bind(session.critical_issues as i32)
        .bind(session.high_issues as i32)
        .bind(session.medium_issues as i32)
        .bind(session.low_issues as i32)
        .bind(session.processing_time_ms.map(|ms| ms as i64))
        .bind(session.model.as_deref())
        .bind(session.created_at)
        .bind(session.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error inserting analysis session");
            AnalysisError::database(e.to_string())
        })?;

        // A finding that fails to insert is skipped, not fatal: the session
        // and its remaining findings still commit. Each insert runs under a
        // savepoint so one failure does not abort the enclosing transaction.
        let mut persisted = Vec::with_capacity(issues.len());
        for issue in issues {
            let mut savepoint = tx.begin().await.map_err(|e| {
                tracing::error!(error = %e, "failed to open savepoint for finding insert");
                AnalysisError::database(e.to_string())
            })?;

            let inserted = sqlx::query(
                r#"
                INSERT INTO security_issues (
                    id, session_id, severity, issue_type, category,
                    file_path, line_number, code_snippet, description, recommendation,
                    confidence_score, false_positive, resolved, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(issue.id)
            .bind(issue.session_id)
            .bind(issue.severity.as_str())
            .bind(&issue.issue_type)
            .bind(&issue.category)
            .bind(&issue.file_path)
            .bind(issue.line_number.map(|n| n as i32))
            .bind(issue.code_snippet.as_deref())
            .bind(&issue.description)
            .bind(&issue.recommendation)
            .bind(issue.confidence_score)
            .bind(issue.false_positive)
            .bind(issue.resolved)
            .bind(issue.created_at)
            .execute(&mut *savepoint)
            .await;

            match inserted {
                Ok(_) => {
                    savepoint.commit().await.map_err(|e| {
                        tracing::error!(error = %e, "failed to release finding savepoint");
                        AnalysisError::database(e.to_string())
                    })?;
                    persisted.push(issue.clone());
                }
                Err(e) => {
                    tracing::warn!(issue_id = %issue.id, error = %e, "skipping finding that failed to insert");
                    if let Err(rollback_err) = savepoint.rollback().await {
                        tracing::error!(error = %rollback_err, "failed to roll back finding savepoint");
                        return Err(AnalysisError::database(rollback_err.to_string()));
                    }
                }
            }
        }

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "failed to commit session insert");
            AnalysisError::database(e.to_string())
        })?;

        Ok(persisted)
    }

    #[tracing::instrument(skip(self), fields(session_id = %session_id, principal = %principal))]
    async fn find_owned(
        &self,
        session_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<AnalysisSession>, AnalysisError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT s.id, s.project_id, s.status, s.overall_score,
                   s.total_issues, s.critical_issues, s.high_issues, s.medium_issues, s.low_issues,
                   s.processing_time_ms, s.model, s.created_at, s.completed_at
            FROM analysis_sessions s
            JOIN projects p ON p.id = s.project_id
            WHERE s.id = $1 AND p.principal_id = $2
            "#,
        )
        .bind(session_id)
        .bind(principal.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "database error finding session");
            AnalysisError::database(e.to_string())
        })?;

        row.map(AnalysisSession::try_from).transpose()
    }
}
