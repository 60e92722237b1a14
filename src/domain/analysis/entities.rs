//! Analysis domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::value_objects::{SessionStatus, Severity};

/// Per-severity finding counts for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeverityBreakdown {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeverityBreakdown {
    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }

    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// One completed invocation of the analysis pipeline against one project.
///
/// Sessions are immutable after creation: the pipeline writes them once, in
/// their final state, and the stored counts/score are never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub id: Uuid,
    pub project_id: Uuid,
    pub status: SessionStatus,
    /// Aggregate score in 0.0–10.0; `None` only for rows predating scoring
    pub overall_score: Option<f64>,
    pub total_issues: u32,
    pub critical_issues: u32,
    pub high_issues: u32,
    pub medium_issues: u32,
    pub low_issues: u32,
    pub processing_time_ms: Option<u64>,
    /// Identifier of the reasoning model that produced the assessment
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AnalysisSession {
    /// Build a session in its final `Completed` state
    pub fn completed(
        project_id: Uuid,
        breakdown: SeverityBreakdown,
        overall_score: f64,
        processing_time_ms: u64,
        model: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            status: SessionStatus::Completed,
            overall_score: Some(overall_score),
            total_issues: breakdown.total(),
            critical_issues: breakdown.critical,
            high_issues: breakdown.high,
            medium_issues: breakdown.medium,
            low_issues: breakdown.low,
            processing_time_ms: Some(processing_time_ms),
            model: Some(model.into()),
            created_at: now,
            completed_at: Some(now),
        }
    }

    /// Invariant: the four severity counts always sum to `total_issues`
    pub fn counts_consistent(&self) -> bool {
        self.critical_issues + self.high_issues + self.medium_issues + self.low_issues
            == self.total_issues
    }
}

/// One validated vulnerability finding tied to an analysis session.
///
/// Immutable after creation except for the two toggle fields, which the
/// owning principal may flip independently of everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIssue {
    pub id: Uuid,
    pub session_id: Uuid,
    pub severity: Severity,
    /// Category name such as "SQL Injection"
    pub issue_type: String,
    /// Broader grouping such as "Input Validation"
    pub category: String,
    pub file_path: String,
    pub line_number: Option<u32>,
    pub code_snippet: Option<String>,
    pub description: String,
    pub recommendation: String,
    /// 0.0–1.0; defaulted to 0.8 when the reasoning service omits it
    pub confidence_score: Option<f64>,
    pub false_positive: bool,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total() {
        let mut breakdown = SeverityBreakdown::default();
        breakdown.record(Severity::Critical);
        breakdown.record(Severity::High);
        breakdown.record(Severity::High);
        breakdown.record(Severity::Low);
        assert_eq!(breakdown.total(), 4);
        assert_eq!(breakdown.critical, 1);
        assert_eq!(breakdown.high, 2);
        assert_eq!(breakdown.medium, 0);
        assert_eq!(breakdown.low, 1);
    }

    #[test]
    fn test_completed_session_is_consistent() {
        let breakdown = SeverityBreakdown {
            critical: 2,
            high: 1,
            medium: 3,
            low: 0,
        };
        let session = AnalysisSession::completed(Uuid::new_v4(), breakdown, 1.0, 1500, "gpt-4o");
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.total_issues, 6);
        assert!(session.counts_consistent());
        assert!(session.completed_at.is_some());
        assert_eq!(session.processing_time_ms, Some(1500));
    }
}
