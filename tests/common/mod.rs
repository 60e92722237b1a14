//! Shared fixtures for the integration test suite
//!
//! The pipeline runs against the in-memory repositories and a scripted
//! reasoning provider, so the tests exercise the real use cases end to end
//! without a database or network.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use codeguard::application::analysis::{
    ExportAnalysisUseCase, GetAnalysisUseCase, RunAnalysisUseCase, ToggleIssueUseCase,
};
use codeguard::domain::analysis::{
    IIssueRepository, IProjectRepository, ISessionRepository,
};
use codeguard::domain::auth::PrincipalId;
use codeguard::domain::project::Project;
use codeguard::infrastructure::llm::{ReasoningError, ReasoningProvider};
use codeguard::infrastructure::persistence::{
    MemoryIssueRepository, MemoryProjectRepository, MemorySessionRepository, MemoryStore,
};

pub const TEST_MODEL: &str = "test-reasoner-1";

/// What the scripted provider should do when called
pub enum ProviderScript {
    Respond(String),
    Fail(ReasoningError),
    Hang,
}

pub struct ScriptedProvider {
    script: ProviderScript,
}

impl ScriptedProvider {
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            script: ProviderScript::Respond(text.into()),
        }
    }

    pub fn failing() -> Self {
        Self {
            script: ProviderScript::Fail(ReasoningError::ServiceUnavailable(
                "503: upstream down".to_string(),
            )),
        }
    }

    pub fn hanging() -> Self {
        Self {
            script: ProviderScript::Hang,
        }
    }
}

#[async_trait]
impl ReasoningProvider for ScriptedProvider {
    async fn assess(&self, _source: &str, _project_label: &str) -> Result<String, ReasoningError> {
        match &self.script {
            ProviderScript::Respond(text) => Ok(text.clone()),
            ProviderScript::Fail(err) => Err(ReasoningError::ServiceUnavailable(err.to_string())),
            ProviderScript::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }

    fn model_id(&self) -> &str {
        TEST_MODEL
    }
}

/// Fully wired pipeline over an in-memory store
pub struct Pipeline {
    pub store: Arc<MemoryStore>,
    pub projects: Arc<dyn IProjectRepository>,
    pub sessions: Arc<dyn ISessionRepository>,
    pub issues: Arc<dyn IIssueRepository>,
    pub run: RunAnalysisUseCase,
    pub get: GetAnalysisUseCase,
    pub export: ExportAnalysisUseCase,
    pub toggle: ToggleIssueUseCase,
}

pub fn pipeline(provider: ScriptedProvider) -> Pipeline {
    pipeline_with_timeout(provider, Duration::from_secs(5))
}

pub fn pipeline_with_timeout(provider: ScriptedProvider, timeout: Duration) -> Pipeline {
    let store = MemoryStore::new();
    let projects: Arc<dyn IProjectRepository> = Arc::new(MemoryProjectRepository::new(store.clone()));
    let sessions: Arc<dyn ISessionRepository> = Arc::new(MemorySessionRepository::new(store.clone()));
    let issues: Arc<dyn IIssueRepository> = Arc::new(MemoryIssueRepository::new(store.clone()));
    let provider: Arc<dyn ReasoningProvider> = Arc::new(provider);

    Pipeline {
        run: RunAnalysisUseCase::new(
            projects.clone(),
            sessions.clone(),
            provider,
            timeout,
            200 * 1024,
        ),
        get: GetAnalysisUseCase::new(sessions.clone(), issues.clone()),
        export: ExportAnalysisUseCase::new(sessions.clone(), issues.clone(), projects.clone()),
        toggle: ToggleIssueUseCase::new(issues.clone()),
        store,
        projects,
        sessions,
        issues,
    }
}

pub async fn seed_project(
    store: &Arc<MemoryStore>,
    principal: PrincipalId,
    name: &str,
    source_content: &str,
) -> Uuid {
    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4(),
        principal_id: principal,
        name: name.to_string(),
        source_content: source_content.to_string(),
        last_analyzed_at: None,
        created_at: now,
        updated_at: now,
    };
    let id = project.id;
    store.projects.write().await.insert(id, project);
    id
}

/// One valid finding entry in the reasoning service's wire format
pub fn finding_entry(severity: &str) -> serde_json::Value {
    serde_json::json!({
        "severity": severity,
        "type": "SQL Injection",
        "category": "Input Validation",
        "filePath": "src/db.js",
        "lineNumber": 12,
        "codeSnippet": "db.query(`SELECT * FROM users WHERE id = ${id}`)",
        "description": "User input is interpolated directly into a SQL query string.",
        "recommendation": "Use parameterized queries instead of string interpolation.",
        "confidenceScore": 0.9
    })
}

/// Wrap entries in the assessment payload, fenced the way models answer
pub fn fenced_assessment(entries: &[serde_json::Value]) -> String {
    format!(
        "Here is the security assessment you asked for:\n```json\n{}\n```\nStay safe!",
        serde_json::json!({ "vulnerabilities": entries })
    )
}
