//! Presentation DTOs and error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::analysis::{AnalysisOutcome, ExportPayload};
use crate::domain::analysis::{AnalysisError, AnalysisSession, SecurityIssue};

/// One analysis session as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisSessionDto {
    pub id: Uuid,
    pub project_id: Uuid,
    #[schema(example = "completed")]
    pub status: String,
    #[schema(example = 7.0)]
    pub overall_score: Option<f64>,
    pub total_issues: u32,
    pub critical_issues: u32,
    pub high_issues: u32,
    pub medium_issues: u32,
    pub low_issues: u32,
    pub processing_time_ms: Option<u64>,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<AnalysisSession> for AnalysisSessionDto {
    fn from(session: AnalysisSession) -> Self {
        Self {
            id: session.id,
            project_id: session.project_id,
            status: session.status.to_string(),
            overall_score: session.overall_score,
            total_issues: session.total_issues,
            critical_issues: session.critical_issues,
            high_issues: session.high_issues,
            medium_issues: session.medium_issues,
            low_issues: session.low_issues,
            processing_time_ms: session.processing_time_ms,
            model: session.model,
            created_at: session.created_at,
            completed_at: session.completed_at,
        }
    }
}

/// One security issue as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SecurityIssueDto {
    pub id: Uuid,
    pub session_id: Uuid,
    #[schema(example = "high")]
    pub severity: String,
    #[schema(example = "SQL Injection")]
    pub issue_type: String,
    #[schema(example = "Input Validation")]
    pub category: String,
    pub file_path: String,
    pub line_number: Option<u32>,
    pub code_snippet: Option<String>,
    pub description: String,
    pub recommendation: String,
    pub confidence_score: Option<f64>,
    pub false_positive: bool,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SecurityIssue> for SecurityIssueDto {
    fn from(issue: SecurityIssue) -> Self {
        Self {
            id: issue.id,
            session_id: issue.session_id,
            severity: issue.severity.to_string(),
            issue_type: issue.issue_type,
            category: issue.category,
            file_path: issue.file_path,
            line_number: issue.line_number,
            code_snippet: issue.code_snippet,
            description: issue.description,
            recommendation: issue.recommendation,
            confidence_score: issue.confidence_score,
            false_positive: issue.false_positive,
            resolved: issue.resolved,
            created_at: issue.created_at,
        }
    }
}

/// Session together with its findings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    pub session: AnalysisSessionDto,
    pub issues: Vec<SecurityIssueDto>,
}

impl From<AnalysisOutcome> for AnalysisResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            session: outcome.session.into(),
            issues: outcome.issues.into_iter().map(Into::into).collect(),
        }
    }
}

/// Export payload for one session
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportResponse {
    pub project_name: String,
    pub session: AnalysisSessionDto,
    pub issues: Vec<SecurityIssueDto>,
    pub exported_at: DateTime<Utc>,
}

impl From<ExportPayload> for ExportResponse {
    fn from(payload: ExportPayload) -> Self {
        Self {
            project_name: payload.project_name,
            session: payload.session.into(),
            issues: payload.issues.into_iter().map(Into::into).collect(),
            exported_at: payload.exported_at,
        }
    }
}

/// Query parameters for the export endpoint
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "0.4.2")]
    pub version: String,
    pub uptime_seconds: u64,
}

/// Error envelope returned for every failure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error context
    pub details: Option<serde_json::Value>,
    /// Unique request identifier for tracking and support
    pub request_id: Uuid,
    /// Error occurrence timestamp
    pub timestamp: DateTime<Utc>,
}

/// Wraps `AnalysisError` for the HTTP boundary.
///
/// Storage errors are logged with their cause but serialize as an opaque
/// internal error; nothing from the database surface reaches callers.
#[derive(Debug)]
pub struct ApiError(pub AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(error: AnalysisError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self.0 {
            AnalysisError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.0.to_string(),
            ),
            AnalysisError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.0.to_string(),
            ),
            AnalysisError::Validation { .. } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.0.to_string(),
            ),
            AnalysisError::Database { message } => {
                tracing::error!(%message, "request failed on a storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message,
            details: None,
            request_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

/// Parse a path segment as a UUID, mapping failure to a validation error
pub fn parse_uuid(value: &str, what: &str) -> Result<Uuid, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError(AnalysisError::validation(format!("{what} must be a UUID"))))
}
