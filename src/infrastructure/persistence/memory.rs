//! In-memory repository implementations
//!
//! Back the integration test suite (and local experimentation) with the same
//! trait objects the SQLx repositories implement, so the pipeline can run
//! without a database. Ownership semantics match the SQL joins exactly,
//! including the anti-enumeration behavior of `find_owned`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::analysis::{
    AnalysisError, AnalysisSession, IIssueRepository, IProjectRepository, ISessionRepository,
    SecurityIssue,
};
use crate::domain::auth::{IPrincipalResolver, PrincipalId};
use crate::domain::project::Project;

/// Shared backing store for the in-memory repositories
#[derive(Default)]
pub struct MemoryStore {
    pub projects: RwLock<HashMap<Uuid, Project>>,
    pub sessions: RwLock<HashMap<Uuid, AnalysisSession>>,
    pub issues: RwLock<HashMap<Uuid, SecurityIssue>>,
    pub tokens: RwLock<HashMap<String, PrincipalId>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn session_owner(&self, session_id: Uuid) -> Option<(AnalysisSession, PrincipalId)> {
        let session = self.sessions.read().await.get(&session_id).cloned()?;
        let owner = self
            .projects
            .read()
            .await
            .get(&session.project_id)
            .map(|p| p.principal_id)?;
        Some((session, owner))
    }
}

pub struct MemoryProjectRepository {
    store: Arc<MemoryStore>,
}

impl MemoryProjectRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IProjectRepository for MemoryProjectRepository {
    async fn find_owned(
        &self,
        project_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<Project>, AnalysisError> {
        let projects = self.store.projects.read().await;
        Ok(projects
            .get(&project_id)
            .filter(|p| p.principal_id == *principal)
            .cloned())
    }

    async fn find_by_id(&self, project_id: Uuid) -> Result<Option<Project>, AnalysisError> {
        Ok(self.store.projects.read().await.get(&project_id).cloned())
    }

    async fn touch_analyzed(
        &self,
        project_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AnalysisError> {
        let mut projects = self.store.projects.write().await;
        if let Some(project) = projects.get_mut(&project_id) {
            project.last_analyzed_at = Some(at);
            project.updated_at = at;
        }
        Ok(())
    }
}

pub struct MemorySessionRepository {
    store: Arc<MemoryStore>,
}

impl MemorySessionRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ISessionRepository for MemorySessionRepository {
    async fn create_with_issues(
        &self,
        session: &AnalysisSession,
        issues: &[SecurityIssue],
    ) -> Result<Vec<SecurityIssue>, AnalysisError> {
        self.store
            .sessions
            .write()
            .await
            .insert(session.id, session.clone());

        let mut stored = self.store.issues.write().await;
        for issue in issues {
            stored.insert(issue.id, issue.clone());
        }

        Ok(issues.to_vec())
    }

    async fn find_owned(
        &self,
        session_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<AnalysisSession>, AnalysisError> {
        Ok(self
            .store
            .session_owner(session_id)
            .await
            .filter(|(_, owner)| owner == principal)
            .map(|(session, _)| session))
    }
}

pub struct MemoryIssueRepository {
    store: Arc<MemoryStore>,
}

impl MemoryIssueRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    async fn update_flag(
        &self,
        issue_id: Uuid,
        set: impl FnOnce(&mut SecurityIssue),
    ) -> Result<(), AnalysisError> {
        let mut issues = self.store.issues.write().await;
        match issues.get_mut(&issue_id) {
            Some(issue) => {
                set(issue);
                Ok(())
            }
            None => Err(AnalysisError::NotFound),
        }
    }
}

#[async_trait]
impl IIssueRepository for MemoryIssueRepository {
    async fn list_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<SecurityIssue>, AnalysisError> {
        let issues = self.store.issues.read().await;
        let mut matching: Vec<SecurityIssue> = issues
            .values()
            .filter(|i| i.session_id == session_id)
            .cloned()
            .collect();
        matching.sort_by_key(|i| (i.created_at, i.id));
        Ok(matching)
    }

    async fn find_owned(
        &self,
        issue_id: Uuid,
        principal: &PrincipalId,
    ) -> Result<Option<SecurityIssue>, AnalysisError> {
        let issue = match self.store.issues.read().await.get(&issue_id).cloned() {
            Some(issue) => issue,
            None => return Ok(None),
        };
        Ok(self
            .store
            .session_owner(issue.session_id)
            .await
            .filter(|(_, owner)| owner == principal)
            .map(|_| issue))
    }

    async fn set_resolved(&self, issue_id: Uuid, resolved: bool) -> Result<(), AnalysisError> {
        self.update_flag(issue_id, |issue| issue.resolved = resolved)
            .await
    }

    async fn set_false_positive(
        &self,
        issue_id: Uuid,
        false_positive: bool,
    ) -> Result<(), AnalysisError> {
        self.update_flag(issue_id, |issue| issue.false_positive = false_positive)
            .await
    }
}

pub struct MemoryPrincipalResolver {
    store: Arc<MemoryStore>,
}

impl MemoryPrincipalResolver {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IPrincipalResolver for MemoryPrincipalResolver {
    async fn resolve(&self, bearer_token: &str) -> Result<Option<PrincipalId>, AnalysisError> {
        Ok(self.store.tokens.read().await.get(bearer_token).copied())
    }
}
