//! Issue toggle endpoints

use axum::Json;
use axum::extract::{Path, State};

use crate::application::analysis::IssueToggle;
use crate::presentation::auth::Auth;
use crate::presentation::models::{ApiError, SecurityIssueDto, parse_uuid};

use super::AppState;

/// PATCH /api/v1/issues/{id}/resolve - Mark an issue resolved
#[utoipa::path(
    patch,
    path = "/api/v1/issues/{id}/resolve",
    params(
        ("id" = String, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Issue updated", body = SecurityIssueDto),
        (status = 400, description = "Malformed issue id"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Issue not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "issues",
    security(("bearer_auth" = []))
)]
pub async fn resolve_issue(
    State(state): State<AppState>,
    auth: Auth,
    Path(issue_id): Path<String>,
) -> Result<Json<SecurityIssueDto>, ApiError> {
    let issue_id = parse_uuid(&issue_id, "issue id")?;
    let issue = state
        .toggle_issue
        .execute(&auth.principal, issue_id, IssueToggle::Resolved)
        .await?;
    Ok(Json(issue.into()))
}

/// PATCH /api/v1/issues/{id}/false-positive - Mark an issue a false positive
#[utoipa::path(
    patch,
    path = "/api/v1/issues/{id}/false-positive",
    params(
        ("id" = String, Path, description = "Issue ID")
    ),
    responses(
        (status = 200, description = "Issue updated", body = SecurityIssueDto),
        (status = 400, description = "Malformed issue id"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Issue not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "issues",
    security(("bearer_auth" = []))
)]
pub async fn mark_false_positive(
    State(state): State<AppState>,
    auth: Auth,
    Path(issue_id): Path<String>,
) -> Result<Json<SecurityIssueDto>, ApiError> {
    let issue_id = parse_uuid(&issue_id, "issue id")?;
    let issue = state
        .toggle_issue
        .execute(&auth.principal, issue_id, IssueToggle::FalsePositive)
        .await?;
    Ok(Json(issue.into()))
}
