//! Value objects for the analysis domain

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Finding types the reasoning service is allowed to report.
///
/// The assessment prompt constrains the model to exactly this list; anything
/// else is free text as far as storage is concerned (`issue_type` is persisted
/// as plain text), but the prompt contract keeps responses on-vocabulary.
pub const SUPPORTED_FINDING_TYPES: [&str; 10] = [
    "SQL Injection",
    "XSS",
    "Path Traversal",
    "Command Injection",
    "Insecure Deserialization",
    "Broken Authentication",
    "Broken Access Control",
    "Security Misconfiguration",
    "Insecure Direct Object Reference",
    "CSRF",
];

/// Finding severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Scoring weight subtracted from the 10.0 baseline per finding.
    ///
    /// The weights are a product decision, not a derived constant; they must
    /// stay exactly 3 / 2 / 1 / 0.5 for score compatibility.
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Critical => 3.0,
            Severity::High => 2.0,
            Severity::Medium => 1.0,
            Severity::Low => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            _ => Err(ParseSeverityError {
                value: s.to_string(),
            }),
        }
    }
}

/// Error for severity values outside the four-level taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity: {value}")]
pub struct ParseSeverityError {
    pub value: String,
}

/// Lifecycle status of an analysis session.
///
/// The pipeline is synchronous and writes sessions once, already `Completed`;
/// the remaining variants exist for the stored `status` column's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Processing => "processing",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SessionStatus::Pending),
            "processing" => Ok(SessionStatus::Processing),
            "completed" => Ok(SessionStatus::Completed),
            "failed" => Ok(SessionStatus::Failed),
            _ => Err(ParseStatusError {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown session status: {value}")]
pub struct ParseStatusError {
    pub value: String,
}

/// Export formats for a persisted analysis session.
///
/// The upstream design sketched a `pdf` path that never rendered anything;
/// it is not carried here, so only `json` parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
}

impl FromStr for ExportFormat {
    type Err = ParseExportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            _ => Err(ParseExportFormatError {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported export format: {value}")]
pub struct ParseExportFormatError {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Critical.weight(), 3.0);
        assert_eq!(Severity::High.weight(), 2.0);
        assert_eq!(Severity::Medium.weight(), 1.0);
        assert_eq!(Severity::Low.weight(), 0.5);
    }

    #[test]
    fn test_severity_parse_case_insensitive() {
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!(" high ".parse::<Severity>().unwrap(), Severity::High);
        assert!("informational".parse::<Severity>().is_err());
        assert!("".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
    }

    #[test]
    fn test_supported_finding_types_count() {
        assert_eq!(SUPPORTED_FINDING_TYPES.len(), 10);
        assert!(SUPPORTED_FINDING_TYPES.contains(&"SQL Injection"));
        assert!(SUPPORTED_FINDING_TYPES.contains(&"CSRF"));
    }

    #[test]
    fn test_export_format_rejects_pdf() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            SessionStatus::Pending,
            SessionStatus::Processing,
            SessionStatus::Completed,
            SessionStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
    }
}
