//! HTTP-level tests against the assembled router

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use codeguard::Config;
use codeguard::application::analysis::{
    ExportAnalysisUseCase, GetAnalysisUseCase, RunAnalysisUseCase, ToggleIssueUseCase,
};
use codeguard::domain::auth::{IPrincipalResolver, PrincipalId};
use codeguard::infrastructure::llm::ReasoningProvider;
use codeguard::infrastructure::persistence::{
    MemoryIssueRepository, MemoryPrincipalResolver, MemoryProjectRepository,
    MemorySessionRepository, MemoryStore,
};
use codeguard::presentation::auth::AuthState;
use codeguard::presentation::controllers::AppState;
use codeguard::presentation::models::{AnalysisResponse, ErrorResponse, ExportResponse};
use codeguard::presentation::routes::create_router;

use common::{ScriptedProvider, fenced_assessment, finding_entry, seed_project};

const TOKEN: &str = "cg_test_token_1";

async fn test_app(provider: ScriptedProvider) -> (Router, Arc<MemoryStore>, PrincipalId) {
    let store = MemoryStore::new();
    let principal = PrincipalId::generate();
    store
        .tokens
        .write()
        .await
        .insert(TOKEN.to_string(), principal);

    let projects = Arc::new(MemoryProjectRepository::new(store.clone()));
    let sessions = Arc::new(MemorySessionRepository::new(store.clone()));
    let issues = Arc::new(MemoryIssueRepository::new(store.clone()));
    let resolver: Arc<dyn IPrincipalResolver> = Arc::new(MemoryPrincipalResolver::new(store.clone()));
    let provider: Arc<dyn ReasoningProvider> = Arc::new(provider);

    let state = AppState {
        run_analysis: Arc::new(RunAnalysisUseCase::new(
            projects.clone(),
            sessions.clone(),
            provider,
            Duration::from_secs(5),
            200 * 1024,
        )),
        get_analysis: Arc::new(GetAnalysisUseCase::new(sessions.clone(), issues.clone())),
        export_analysis: Arc::new(ExportAnalysisUseCase::new(
            sessions.clone(),
            issues.clone(),
            projects.clone(),
        )),
        toggle_issue: Arc::new(ToggleIssueUseCase::new(issues)),
        auth_state: AuthState { resolver },
        startup_time: Instant::now(),
    };

    let router = create_router(state, Arc::new(Config::default()));
    (router, store, principal)
}

fn authed(request: axum::http::request::Builder) -> axum::http::request::Builder {
    request.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
}

async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_needs_no_credentials() {
    let (app, _, _) = test_app(ScriptedProvider::responding(String::new())).await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (app, store, principal) =
        test_app(ScriptedProvider::responding(fenced_assessment(&[]))).await;
    let project_id = seed_project(&store, principal, "svc", "code").await;

    let response = app
        .oneshot(
            Request::post(format!("/api/v1/projects/{project_id}/analyze"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = json_body(response).await;
    assert_eq!(error.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let (app, store, principal) =
        test_app(ScriptedProvider::responding(fenced_assessment(&[]))).await;
    let project_id = seed_project(&store, principal, "svc", "code").await;

    let response = app
        .oneshot(
            Request::post(format!("/api/v1/projects/{project_id}/analyze"))
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_project_id_is_validation_error() {
    let (app, _, _) = test_app(ScriptedProvider::responding(fenced_assessment(&[]))).await;

    let response = app
        .oneshot(
            authed(Request::post("/api/v1/projects/not-a-uuid/analyze"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response).await;
    assert_eq!(error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_analyze_then_get_then_export() {
    let (app, store, principal) = test_app(ScriptedProvider::responding(fenced_assessment(&[
        finding_entry("critical"),
        finding_entry("medium"),
    ])))
    .await;
    let project_id = seed_project(&store, principal, "webshop", "const x = 1;").await;

    let response = app
        .clone()
        .oneshot(
            authed(Request::post(format!("/api/v1/projects/{project_id}/analyze")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created: AnalysisResponse = json_body(response).await;
    assert_eq!(created.session.total_issues, 2);
    assert_eq!(created.session.overall_score, Some(6.0));
    assert_eq!(created.issues.len(), 2);

    let response = app
        .clone()
        .oneshot(
            authed(Request::get(format!("/api/v1/analyses/{}", created.session.id)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: AnalysisResponse = json_body(response).await;
    assert_eq!(fetched.session.id, created.session.id);
    assert_eq!(fetched.session.total_issues, 2);

    let response = app
        .oneshot(
            authed(Request::get(format!(
                "/api/v1/analyses/{}/export?format=json",
                created.session.id
            )))
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let exported: ExportResponse = json_body(response).await;
    assert_eq!(exported.project_name, "webshop");
    assert_eq!(exported.issues.len(), 2);
}

#[tokio::test]
async fn test_export_pdf_is_validation_error() {
    let (app, store, principal) = test_app(ScriptedProvider::responding(fenced_assessment(&[])))
        .await;
    let project_id = seed_project(&store, principal, "svc", "code").await;

    let response = app
        .clone()
        .oneshot(
            authed(Request::post(format!("/api/v1/projects/{project_id}/analyze")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let created: AnalysisResponse = json_body(response).await;

    let response = app
        .oneshot(
            authed(Request::get(format!(
                "/api/v1/analyses/{}/export?format=pdf",
                created.session.id
            )))
            .body(Body::empty())
            .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response).await;
    assert_eq!(error.code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_absent_session_is_not_found() {
    let (app, _, _) = test_app(ScriptedProvider::responding(fenced_assessment(&[]))).await;

    let response = app
        .oneshot(
            authed(Request::get(format!("/api/v1/analyses/{}", Uuid::new_v4())))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response).await;
    assert_eq!(error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_resolve_endpoint_round_trip() {
    let (app, store, principal) = test_app(ScriptedProvider::responding(fenced_assessment(&[
        finding_entry("high"),
    ])))
    .await;
    let project_id = seed_project(&store, principal, "svc", "code").await;

    let response = app
        .clone()
        .oneshot(
            authed(Request::post(format!("/api/v1/projects/{project_id}/analyze")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let created: AnalysisResponse = json_body(response).await;
    let issue_id = created.issues[0].id;

    let response = app
        .oneshot(
            authed(Request::patch(format!("/api/v1/issues/{issue_id}/resolve")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: codeguard::presentation::models::SecurityIssueDto = json_body(response).await;
    assert!(updated.resolved);
    assert!(!updated.false_positive);
}
