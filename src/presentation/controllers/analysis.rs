//! Analysis endpoints

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::domain::analysis::{AnalysisError, ExportFormat};
use crate::presentation::auth::Auth;
use crate::presentation::models::{
    AnalysisResponse, ApiError, ExportQuery, ExportResponse, parse_uuid,
};

use super::AppState;

/// POST /api/v1/projects/{id}/analyze - Run an analysis against a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/analyze",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Analysis completed", body = AnalysisResponse),
        (status = 400, description = "Malformed project id"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Project not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "analysis",
    security(("bearer_auth" = []))
)]
pub async fn start_analysis(
    State(state): State<AppState>,
    auth: Auth,
    Path(project_id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let project_id = parse_uuid(&project_id, "project id")?;
    let outcome = state
        .run_analysis
        .execute(&auth.principal, project_id)
        .await?;
    Ok(Json(outcome.into()))
}

/// GET /api/v1/analyses/{id} - Retrieve a session with its findings
#[utoipa::path(
    get,
    path = "/api/v1/analyses/{id}",
    params(
        ("id" = String, Path, description = "Analysis session ID")
    ),
    responses(
        (status = 200, description = "Session found", body = AnalysisResponse),
        (status = 400, description = "Malformed session id"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "analysis",
    security(("bearer_auth" = []))
)]
pub async fn get_analysis(
    State(state): State<AppState>,
    auth: Auth,
    Path(session_id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let session_id = parse_uuid(&session_id, "session id")?;
    let outcome = state
        .get_analysis
        .execute(&auth.principal, session_id)
        .await?;
    Ok(Json(outcome.into()))
}

/// GET /api/v1/analyses/{id}/export - Export a session
#[utoipa::path(
    get,
    path = "/api/v1/analyses/{id}/export",
    params(
        ("id" = String, Path, description = "Analysis session ID"),
        ("format" = Option<String>, Query, description = "Export format, only `json` is supported")
    ),
    responses(
        (status = 200, description = "Export payload", body = ExportResponse),
        (status = 400, description = "Malformed session id or unsupported format"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "analysis",
    security(("bearer_auth" = []))
)]
pub async fn export_analysis(
    State(state): State<AppState>,
    auth: Auth,
    Path(session_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportResponse>, ApiError> {
    let session_id = parse_uuid(&session_id, "session id")?;
    let format: ExportFormat = query
        .format
        .as_deref()
        .unwrap_or("json")
        .parse()
        .map_err(|e: crate::domain::analysis::value_objects::ParseExportFormatError| {
            ApiError(AnalysisError::validation(e.to_string()))
        })?;

    let payload = state
        .export_analysis
        .execute(&auth.principal, session_id, format)
        .await?;
    Ok(Json(payload.into()))
}
