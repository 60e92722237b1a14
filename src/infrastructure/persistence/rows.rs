//! Row types mapping database records to domain entities
//!
//! Severity and status are stored as plain text; validation happened at the
//! pipeline boundary on the way in, so a row that fails to parse on the way
//! out indicates storage corruption and surfaces as a database error.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::analysis::{AnalysisError, AnalysisSession, SecurityIssue};
use crate::domain::auth::PrincipalId;
use crate::domain::project::Project;

pub fn count_from_db(value: i32, column: &str) -> Result<u32, AnalysisError> {
    u32::try_from(value)
        .map_err(|_| AnalysisError::database(format!("negative count in column {column}: {value}")))
}

#[derive(Debug, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub principal_id: Uuid,
    pub name: String,
    pub source_content: String,
    pub last_analyzed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            principal_id: PrincipalId::new(row.principal_id),
            name: row.name,
            source_content: row.source_content,
            last_analyzed_at: row.last_analyzed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub status: String,
    pub overall_score: Option<f64>,
    pub total_issues: i32,
    pub critical_issues: i32,
    pub high_issues: i32,
    pub medium_issues: i32,
    pub low_issues: i32,
    pub processing_time_ms: Option<i64>,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<SessionRow> for AnalysisSession {
    type Error = AnalysisError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| AnalysisError::database(format!("invalid session status: {}", row.status)))?;

        Ok(AnalysisSession {
            id: row.id,
            project_id: row.project_id,
            status,
            overall_score: row.overall_score,
            total_issues: count_from_db(row.total_issues, "total_issues")?,
            critical_issues: count_from_db(row.critical_issues, "critical_issues")?,
            high_issues: count_from_db(row.high_issues, "high_issues")?,
            medium_issues: count_from_db(row.medium_issues, "medium_issues")?,
            low_issues: count_from_db(row.low_issues, "low_issues")?,
            processing_time_ms: row.processing_time_ms.map(|ms| ms.max(0) as u64),
            model: row.model,
            created_at: row.created_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct IssueRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub severity: String,
    pub issue_type: String,
    pub category: String,
    pub file_path: String,
    pub line_number: Option<i32>,
    pub code_snippet: Option<String>,
    pub description: String,
    pub recommendation: String,
    pub confidence_score: Option<f64>,
    pub false_positive: bool,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<IssueRow> for SecurityIssue {
    type Error = AnalysisError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        let severity = row
            .severity
            .parse()
            .map_err(|_| AnalysisError::database(format!("invalid severity: {}", row.severity)))?;

        Ok(SecurityIssue {
            id: row.id,
            session_id: row.session_id,
            severity,
            issue_type: row.issue_type,
            category: row.category,
            file_path: row.file_path,
            line_number: row.line_number.and_then(|n| u32::try_from(n).ok()),
            code_snippet: row.code_snippet,
            description: row.description,
            recommendation: row.recommendation,
            confidence_score: row.confidence_score,
            false_positive: row.false_positive,
            resolved: row.resolved,
            created_at: row.created_at,
        })
    }
}
