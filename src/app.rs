//! Application setup and wiring

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;

use crate::application::analysis::{
    ExportAnalysisUseCase, GetAnalysisUseCase, RunAnalysisUseCase, ToggleIssueUseCase,
};
use crate::config::Config;
use crate::domain::analysis::{IIssueRepository, IProjectRepository, ISessionRepository};
use crate::domain::auth::IPrincipalResolver;
use crate::infrastructure::llm::{OpenAiReasoningProvider, ReasoningProvider};
use crate::infrastructure::persistence::{
    SqlxIssueRepository, SqlxPrincipalResolver, SqlxProjectRepository, SqlxSessionRepository,
};
use crate::presentation::auth::AuthState;
use crate::presentation::controllers::AppState;
use crate::presentation::routes::create_router;

/// Handle returned from create_app for graceful shutdown coordination
pub struct AppHandle {
    pub router: Router,
    pub shutdown_token: CancellationToken,
}

/// Create the application router and return an AppHandle for shutdown coordination
pub async fn create_app(
    config: Config,
) -> Result<AppHandle, Box<dyn std::error::Error + Send + Sync>> {
    let startup_time = Instant::now();
    let config_arc = Arc::new(config.clone());
    let shutdown_token = CancellationToken::new();

    let db_pool = Arc::new(
        PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connect_timeout_seconds))
            .connect(&config.database.url)
            .await?,
    );

    if config.database.run_migrations {
        tracing::info!("Running pending database migrations");
        sqlx::migrate!("./migrations").run(&*db_pool).await?;
    }

    // Repositories
    let project_repository: Arc<dyn IProjectRepository> =
        Arc::new(SqlxProjectRepository::new(db_pool.clone()));
    let session_repository: Arc<dyn ISessionRepository> =
        Arc::new(SqlxSessionRepository::new(db_pool.clone()));
    let issue_repository: Arc<dyn IIssueRepository> =
        Arc::new(SqlxIssueRepository::new(db_pool.clone()));
    let principal_resolver: Arc<dyn IPrincipalResolver> =
        Arc::new(SqlxPrincipalResolver::new(db_pool.clone()));

    // Reasoning provider
    let reasoning_provider: Arc<dyn ReasoningProvider> =
        Arc::new(OpenAiReasoningProvider::new(&config.reasoning));
    tracing::info!(
        model = %reasoning_provider.model_id(),
        base_url = %config.reasoning.base_url,
        "Reasoning provider initialized"
    );

    // Use cases
    let run_analysis = Arc::new(RunAnalysisUseCase::new(
        project_repository.clone(),
        session_repository.clone(),
        reasoning_provider,
        Duration::from_secs(config.analysis.reasoning_timeout_seconds),
        config.analysis.max_source_kb * 1024,
    ));
    let get_analysis = Arc::new(GetAnalysisUseCase::new(
        session_repository.clone(),
        issue_repository.clone(),
    ));
    let export_analysis = Arc::new(ExportAnalysisUseCase::new(
        session_repository,
        issue_repository.clone(),
        project_repository,
    ));
    let toggle_issue = Arc::new(ToggleIssueUseCase::new(issue_repository));

    let app_state = AppState {
        run_analysis,
        get_analysis,
        export_analysis,
        toggle_issue,
        auth_state: AuthState {
            resolver: principal_resolver,
        },
        startup_time,
    };

    let router = create_router(app_state, config_arc);

    Ok(AppHandle {
        router,
        shutdown_token,
    })
}
