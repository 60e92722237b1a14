//! Route definitions and middleware stack

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::Config;
use crate::presentation::controllers::{
    AppState,
    analysis::{export_analysis, get_analysis, start_analysis},
    health::health_check,
    issues::{mark_false_positive, resolve_issue},
};
use crate::presentation::models::*;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::analysis::start_analysis,
        crate::presentation::controllers::analysis::get_analysis,
        crate::presentation::controllers::analysis::export_analysis,
        crate::presentation::controllers::issues::resolve_issue,
        crate::presentation::controllers::issues::mark_false_positive,
        crate::presentation::controllers::health::health_check
    ),
    components(
        schemas(
            AnalysisResponse,
            AnalysisSessionDto,
            SecurityIssueDto,
            ExportResponse,
            ErrorResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "analysis", description = "AI-assisted source code analysis endpoints"),
        (name = "issues", description = "Finding triage endpoints"),
        (name = "health", description = "System health monitoring")
    ),
    info(
        title = "CodeGuard API",
        description = "AI-assisted source code security analysis service",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    )
)]
pub struct ApiDoc;

/// Middleware to inject AuthState into request extensions
async fn inject_auth_state_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(app_state.auth_state.clone());
    next.run(request).await
}

async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the application router
pub fn create_router(app_state: AppState, config: Arc<Config>) -> Router {
    let api_routes = Router::new()
        .route("/projects/{id}/analyze", post(start_analysis))
        .route("/analyses/{id}", get(get_analysis))
        .route("/analyses/{id}/export", get(export_analysis))
        .route("/issues/{id}/resolve", patch(resolve_issue))
        .route("/issues/{id}/false-positive", patch(mark_false_positive));

    let cors_layer = if config.server.allowed_origins.len() == 1
        && config.server.allowed_origins[0] == "*"
    {
        CorsLayer::new()
            .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .max_age(Duration::from_secs(3600))
    } else {
        let mut layer = CorsLayer::new();
        for origin in &config.server.allowed_origins {
            match axum::http::HeaderValue::from_str(origin) {
                Ok(origin_header) => {
                    layer = layer.allow_origin(origin_header);
                }
                Err(_) => {
                    tracing::warn!(origin, "invalid CORS origin in config; skipping");
                }
            }
        }
        layer
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .max_age(Duration::from_secs(3600))
    };

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check));

    if config.server.enable_docs {
        router = router.route("/api-docs/openapi.json", get(openapi_document));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            inject_auth_state_middleware,
        ));

    router.layer(service_builder).with_state(app_state)
}
