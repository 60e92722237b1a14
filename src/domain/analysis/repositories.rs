//! Repository contracts for the analysis domain
//!
//! Ownership checks are pushed into the repositories so every read path goes
//! through the Session → Project → principal chain in one query.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::auth::PrincipalId;
use crate::domain::project::Project;

use super::entities::{AnalysisSession, SecurityIssue};
use super::errors::AnalysisError;

/// Access to projects (owned elsewhere, referenced by the pipeline)
#[async_trait]
pub trait IProjectRepository: Send + Sync {
    /// Find a project only if it belongs to the given principal.
    /// Returns `None` for both absent and not-owned projects.
    async fn find_owned(
        &self,
        project_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<Project>, AnalysisError>;

    /// Find a project without an ownership filter.
    /// Callers must have already verified ownership transitively.
    async fn find_by_id(&self, project_id: Uuid) -> Result<Option<Project>, AnalysisError>;

    /// Bump `last_analyzed_at` and `updated_at` after a successful analysis
    async fn touch_analyzed(
        &self,
        project_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AnalysisError>;
}

/// Persistence for analysis sessions
#[async_trait]
pub trait ISessionRepository: Send + Sync {
    /// Insert a session together with its findings.
    ///
    /// The session insert and the finding inserts share one atomic write
    /// where the store offers it, but an individual finding that fails to
    /// insert is logged and skipped without rolling back the session or its
    /// siblings. Returns the findings that were actually persisted.
    async fn create_with_issues(
        &self,
        session: &AnalysisSession,
        issues: &[SecurityIssue],
    ) -> Result<Vec<SecurityIssue>, AnalysisError>;

    /// Find a session only if its project belongs to the given principal
    async fn find_owned(
        &self,
        session_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<AnalysisSession>, AnalysisError>;
}

/// Persistence for security issues
#[async_trait]
pub trait IIssueRepository: Send + Sync {
    async fn list_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<SecurityIssue>, AnalysisError>;

    /// Find an issue only if it is reachable from the principal through
    /// its session's project
    async fn find_owned(
        &self,
        issue_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<SecurityIssue>, AnalysisError>;

    async fn set_resolved(&self, issue_id: Uuid, resolved: bool) -> Result<(), AnalysisError>;

    async fn set_false_positive(
        &self,
        issue_id: Uuid,
        false_positive: bool,
    ) -> Result<(), AnalysisError>;
}
