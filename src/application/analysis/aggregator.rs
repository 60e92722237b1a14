//! Severity aggregation and overall scoring

use crate::domain::analysis::SeverityBreakdown;

use super::extractor::FindingCandidate;

/// Counts and score computed from one finding list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOutcome {
    pub breakdown: SeverityBreakdown,
    pub overall_score: f64,
}

/// Computes per-severity counts and the 0–10 overall score
pub struct SeverityAggregator;

impl SeverityAggregator {
    /// `overall_score = clamp(10 − (3·critical + 2·high + 1·medium + 0.5·low), 0, 10)`.
    ///
    /// Zero findings score exactly 10.0. The score is a pure function of the
    /// finding list and is persisted alongside the counts that produced it.
    pub fn aggregate(findings: &[FindingCandidate]) -> AggregateOutcome {
        let mut breakdown = SeverityBreakdown::default();
        for finding in findings {
            breakdown.record(finding.severity);
        }

        let deduction: f64 = findings.iter().map(|f| f.severity.weight()).sum();
        let overall_score = (10.0 - deduction).clamp(0.0, 10.0);

        AggregateOutcome {
            breakdown,
            overall_score,
        }
    }
}
