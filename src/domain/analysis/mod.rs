//! Analysis domain: sessions, findings, and the severity taxonomy

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::{AnalysisSession, SecurityIssue, SeverityBreakdown};
pub use errors::AnalysisError;
pub use repositories::{IIssueRepository, IProjectRepository, ISessionRepository};
pub use value_objects::{ExportFormat, SessionStatus, Severity, SUPPORTED_FINDING_TYPES};
