//! The analysis pipeline: extraction, aggregation, orchestration

pub mod aggregator;
pub mod extractor;
pub mod use_cases;

pub use aggregator::{AggregateOutcome, SeverityAggregator};
pub use extractor::{FindingCandidate, FindingExtractor};
pub use use_cases::{
    AnalysisOutcome, ExportAnalysisUseCase, ExportPayload, GetAnalysisUseCase, IssueToggle,
    RunAnalysisUseCase, ToggleIssueUseCase,
};
