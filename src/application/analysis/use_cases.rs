//! Analysis pipeline use cases

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::analysis::{
    AnalysisError, AnalysisSession, ExportFormat, IIssueRepository, IProjectRepository,
    ISessionRepository, SecurityIssue,
};
use crate::domain::auth::PrincipalId;
use crate::infrastructure::llm::ReasoningProvider;

use super::aggregator::SeverityAggregator;
use super::extractor::{FALLBACK_CONFIDENCE, FindingCandidate, FindingExtractor};

/// A session together with its persisted findings
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub session: AnalysisSession,
    pub issues: Vec<SecurityIssue>,
}

/// Export payload for a persisted session
#[derive(Debug, Clone, Serialize)]
pub struct ExportPayload {
    pub project_name: String,
    pub session: AnalysisSession,
    pub issues: Vec<SecurityIssue>,
    pub exported_at: DateTime<Utc>,
}

/// Which toggle field of an issue to flip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueToggle {
    Resolved,
    FalsePositive,
}

/// Top-level coordinator for one analysis run.
///
/// The run is one synchronous unit of work: it either completes with a
/// persisted session (possibly with zero findings) or fails before anything
/// is written. Reasoning-service failure is not a failure of the run — it
/// degrades to an empty finding set so analysis always completes.
pub struct RunAnalysisUseCase {
    projects: Arc<dyn IProjectRepository>,
    sessions: Arc<dyn ISessionRepository>,
    provider: Arc<dyn ReasoningProvider>,
    reasoning_timeout: Duration,
    max_source_bytes: usize,
}

impl RunAnalysisUseCase {
    pub fn new(
        projects: Arc<dyn IProjectRepository>,
        sessions: Arc<dyn ISessionRepository>,
        provider: Arc<dyn ReasoningProvider>,
        reasoning_timeout: Duration,
        max_source_bytes: usize,
    ) -> Self {
        Self {
            projects,
            sessions,
            provider,
            reasoning_timeout,
            max_source_bytes,
        }
    }

    #[tracing::instrument(skip(self), fields(principal = %principal, project_id = %project_id))]
    pub async fn execute(
        &self,
        principal: &PrincipalId,
        project_id: Uuid,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let project = self
            .projects
            .find_owned(project_id, principal)
            .await?
            .ok_or(AnalysisError::NotFound)?;

        let started = Instant::now();
        let source = Self::bounded_source(&project.source_content, self.max_source_bytes);

        let mut candidates = match self.assess_with_timeout(source, &project.name).await {
            Some(raw_text) => FindingExtractor::extract(&raw_text),
            None => Vec::new(),
        };
        Self::apply_defaults(&mut candidates, &project.name);

        let outcome = SeverityAggregator::aggregate(&candidates);
        let processing_time_ms = started.elapsed().as_millis() as u64;

        let session = AnalysisSession::completed(
            project.id,
            outcome.breakdown,
            outcome.overall_score,
            processing_time_ms,
            self.provider.model_id(),
        );
        let issues = Self::to_issues(&session, candidates);

        let persisted = self.sessions.create_with_issues(&session, &issues).await?;

        // The session is durable at this point; a failed timestamp bump is
        // logged rather than turning a completed analysis into an error.
        if let Err(e) = self.projects.touch_analyzed(project.id, Utc::now()).await {
            warn!(project_id = %project.id, error = %e, "failed to bump project analysis timestamps");
        }

        info!(
            session_id = %session.id,
            total_issues = session.total_issues,
            overall_score = outcome.overall_score,
            processing_time_ms,
            "analysis completed"
        );

        Ok(AnalysisOutcome {
            session,
            issues: persisted,
        })
    }

    /// Call the reasoning service with a bounded timeout.
    ///
    /// Returns `None` on timeout, provider error, or empty output — the
    /// explicit "treat failure as zero findings" branch, not an accident of
    /// error propagation.
    async fn assess_with_timeout(&self, source: &str, project_label: &str) -> Option<String> {
        let assessment = self.provider.assess(source, project_label);
        match tokio::time::timeout(self.reasoning_timeout, assessment).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
            Ok(Ok(_)) => {
                warn!("reasoning service returned empty output, treating as zero findings");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "reasoning service call failed, treating as zero findings");
                None
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.reasoning_timeout.as_secs(),
                    "reasoning service call timed out, treating as zero findings"
                );
                None
            }
        }
    }

    /// Truncate source content to the boundary cap on a char boundary
    fn bounded_source(content: &str, max_bytes: usize) -> &str {
        if content.len() <= max_bytes {
            return content;
        }
        let mut end = max_bytes;
        while !content.is_char_boundary(end) {
            end -= 1;
        }
        debug!(
            original_bytes = content.len(),
            truncated_bytes = end,
            "source content exceeds the reasoning boundary cap, truncating"
        );
        &content[..end]
    }

    /// Fill in the file-path and confidence fallbacks on accepted candidates
    fn apply_defaults(candidates: &mut [FindingCandidate], project_name: &str) {
        for candidate in candidates {
            if candidate.file_path.is_empty() {
                candidate.file_path = format!("{project_name}/main.js");
            }
            if candidate.confidence_score.is_none() {
                candidate.confidence_score = Some(FALLBACK_CONFIDENCE);
            }
        }
    }

    fn to_issues(session: &AnalysisSession, candidates: Vec<FindingCandidate>) -> Vec<SecurityIssue> {
        candidates
            .into_iter()
            .map(|c| SecurityIssue {
                id: Uuid::new_v4(),
                session_id: session.id,
                severity: c.severity,
                issue_type: c.issue_type,
                category: c.category,
                file_path: c.file_path,
                line_number: c.line_number,
                code_snippet: c.code_snippet,
                description: c.description,
                recommendation: c.recommendation,
                confidence_score: c.confidence_score,
                false_positive: false,
                resolved: false,
                created_at: session.created_at,
            })
            .collect()
    }
}

/// Ownership-scoped retrieval of a session and its findings
pub struct GetAnalysisUseCase {
    sessions: Arc<dyn ISessionRepository>,
    issues: Arc<dyn IIssueRepository>,
}

impl GetAnalysisUseCase {
    pub fn new(sessions: Arc<dyn ISessionRepository>, issues: Arc<dyn IIssueRepository>) -> Self {
        Self { sessions, issues }
    }

    pub async fn execute(
        &self,
        principal: &PrincipalId,
        session_id: Uuid,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let session = self
            .sessions
            .find_owned(session_id, principal)
            .await?
            .ok_or(AnalysisError::NotFound)?;
        let issues = self.issues.list_for_session(session.id).await?;
        Ok(AnalysisOutcome { session, issues })
    }
}

/// Ownership-scoped export of a session in a supported format
pub struct ExportAnalysisUseCase {
    sessions: Arc<dyn ISessionRepository>,
    issues: Arc<dyn IIssueRepository>,
    projects: Arc<dyn IProjectRepository>,
}

impl ExportAnalysisUseCase {
    pub fn new(
        sessions: Arc<dyn ISessionRepository>,
        issues: Arc<dyn IIssueRepository>,
        projects: Arc<dyn IProjectRepository>,
    ) -> Self {
        Self {
            sessions,
            issues,
            projects,
        }
    }

    pub async fn execute(
        &self,
        principal: &PrincipalId,
        session_id: Uuid,
        format: ExportFormat,
    ) -> Result<ExportPayload, AnalysisError> {
        let ExportFormat::Json = format;

        let session = self
            .sessions
            .find_owned(session_id, principal)
            .await?
            .ok_or(AnalysisError::NotFound)?;
        let issues = self.issues.list_for_session(session.id).await?;

        // Ownership was already verified through the session's project.
        let project = self
            .projects
            .find_by_id(session.project_id)
            .await?
            .ok_or(AnalysisError::NotFound)?;

        Ok(ExportPayload {
            project_name: project.name,
            session,
            issues,
            exported_at: Utc::now(),
        })
    }
}

/// Flips one of the two post-creation toggle fields on an issue.
///
/// Idempotent: setting a flag that is already set succeeds and changes
/// nothing. Ownership is verified transitively Issue → Session → Project.
pub struct ToggleIssueUseCase {
    issues: Arc<dyn IIssueRepository>,
}

impl ToggleIssueUseCase {
    pub fn new(issues: Arc<dyn IIssueRepository>) -> Self {
        Self { issues }
    }

    #[tracing::instrument(skip(self), fields(principal = %principal, issue_id = %issue_id))]
    pub async fn execute(
        &self,
        principal: &PrincipalId,
        issue_id: Uuid,
        toggle: IssueToggle,
    ) -> Result<SecurityIssue, AnalysisError> {
        let mut issue = self
            .issues
            .find_owned(issue_id, principal)
            .await?
            .ok_or(AnalysisError::NotFound)?;

        match toggle {
            IssueToggle::Resolved => {
                self.issues.set_resolved(issue_id, true).await?;
                issue.resolved = true;
            }
            IssueToggle::FalsePositive => {
                self.issues.set_false_positive(issue_id, true).await?;
                issue.false_positive = true;
            }
        }

        Ok(issue)
    }
}
