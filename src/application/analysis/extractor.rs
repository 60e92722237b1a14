//! Tolerant extraction of findings from reasoning-service output
//!
//! The reasoning service returns free-form text that is expected to contain a
//! JSON object with a `vulnerabilities` array. Extraction never fails the
//! pipeline: an unlocatable or unparseable payload yields an empty list, and
//! an individual entry that violates the finding schema is dropped while its
//! valid siblings survive.

use serde::Deserialize;

use crate::domain::analysis::Severity;

/// Minimum length for `description` and `recommendation`
pub const MIN_TEXT_LEN: usize = 10;

/// Stored code snippets are bounded; longer ones are truncated, not dropped
pub const MAX_SNIPPET_LEN: usize = 4000;

/// Confidence assigned when the reasoning service omits the field
pub const FALLBACK_CONFIDENCE: f64 = 0.8;

/// A finding that passed schema validation but has not been persisted yet.
///
/// `file_path` may still be empty here; the orchestrator substitutes its
/// project-derived fallback before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingCandidate {
    pub severity: Severity,
    pub issue_type: String,
    pub category: String,
    pub file_path: String,
    pub line_number: Option<u32>,
    pub code_snippet: Option<String>,
    pub description: String,
    pub recommendation: String,
    pub confidence_score: Option<f64>,
}

/// Wire shape of one entry in the `vulnerabilities` array
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFinding {
    #[serde(default)]
    severity: String,
    #[serde(default, rename = "type")]
    issue_type: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    file_path: String,
    line_number: Option<i64>,
    code_snippet: Option<String>,
    description: Option<String>,
    recommendation: Option<String>,
    confidence_score: Option<f64>,
}

/// Top-level wire shape of the assessment payload
#[derive(Debug, Deserialize)]
struct AssessmentPayload {
    vulnerabilities: Vec<serde_json::Value>,
}

/// Locates and validates the JSON vulnerability payload in raw model output
pub struct FindingExtractor;

impl FindingExtractor {
    /// Extract validated finding candidates from raw reasoning output.
    ///
    /// Strategy order:
    /// 1) a fenced ```json code block, if present;
    /// 2) otherwise the first balanced top-level JSON object in the text.
    ///
    /// Never returns an error; total failure to locate or parse a payload
    /// yields an empty list with the reason logged for observability.
    pub fn extract(raw_text: &str) -> Vec<FindingCandidate> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            tracing::warn!("reasoning output was empty, no findings extracted");
            return Vec::new();
        }

        let Some(candidate) = Self::locate_payload(trimmed) else {
            tracing::warn!("no JSON payload found in reasoning output");
            return Vec::new();
        };

        let payload: AssessmentPayload = match serde_json::from_str(&candidate) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse assessment payload");
                return Vec::new();
            }
        };

        payload
            .vulnerabilities
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match Self::validate_entry(entry) {
                Ok(candidate) => Some(candidate),
                Err(reason) => {
                    tracing::warn!(index, %reason, "dropping finding that failed validation");
                    None
                }
            })
            .collect()
    }

    /// Pull the candidate JSON text out of the surrounding prose
    fn locate_payload(content: &str) -> Option<String> {
        Self::extract_fenced_json(content).or_else(|| Self::extract_first_json_object(content))
    }

    /// Extract a ```json fenced code block
    fn extract_fenced_json(content: &str) -> Option<String> {
        let fence = "```";
        let mut search = content;

        loop {
            let start = search.find(fence)?;
            let after_start = &search[start + fence.len()..];

            let (lang_tag, rest) = match after_start.find('\n') {
                Some(line_end) => (after_start[..line_end].trim(), &after_start[line_end + 1..]),
                None => return None,
            };

            if !lang_tag.eq_ignore_ascii_case("json") {
                search = after_start;
                continue;
            }

            let end = rest.find(fence)?;
            return Some(rest[..end].trim().to_string());
        }
    }

    /// Extract the first balanced top-level JSON object found in the text.
    ///
    /// Uses `serde_json::Deserializer` to detect a valid JSON prefix rather
    /// than counting braces, so strings containing `{`/`}` are handled.
    fn extract_first_json_object(content: &str) -> Option<String> {
        for (idx, ch) in content.char_indices() {
            if ch == '{' {
                let candidate = &content[idx..];
                let mut de =
                    serde_json::Deserializer::from_str(candidate).into_iter::<serde_json::Value>();
                if let Some(Ok(_value)) = de.next() {
                    let end = de.byte_offset();
                    if end > 0 && end <= candidate.len() {
                        return Some(candidate[..end].to_string());
                    }
                }
            }
        }
        None
    }

    /// Validate one raw entry against the finding schema.
    ///
    /// Oversized snippets are truncated rather than rejected; every other
    /// violation drops the entry.
    fn validate_entry(entry: serde_json::Value) -> Result<FindingCandidate, String> {
        let raw: RawFinding = serde_json::from_value(entry)
            .map_err(|e| format!("entry is not an object with the expected fields: {e}"))?;

        let severity: Severity = raw
            .severity
            .parse()
            .map_err(|_| format!("severity {:?} is outside the taxonomy", raw.severity))?;

        if raw.issue_type.trim().is_empty() {
            return Err("type is empty".to_string());
        }
        if raw.category.trim().is_empty() {
            return Err("category is empty".to_string());
        }

        let description = raw.description.unwrap_or_default();
        if description.trim().len() < MIN_TEXT_LEN {
            return Err(format!("description shorter than {MIN_TEXT_LEN} chars"));
        }
        let recommendation = raw.recommendation.unwrap_or_default();
        if recommendation.trim().len() < MIN_TEXT_LEN {
            return Err(format!("recommendation shorter than {MIN_TEXT_LEN} chars"));
        }

        let line_number = match raw.line_number {
            None => None,
            Some(n) if n >= 1 && n <= i64::from(u32::MAX) => Some(n as u32),
            Some(n) => return Err(format!("line number {n} is not a positive integer")),
        };

        if let Some(confidence) = raw.confidence_score
            && !(0.0..=1.0).contains(&confidence)
        {
            return Err(format!("confidence {confidence} is outside 0.0..=1.0"));
        }

        let code_snippet = raw.code_snippet.map(|snippet| {
            if snippet.len() > MAX_SNIPPET_LEN {
                let mut end = MAX_SNIPPET_LEN;
                while !snippet.is_char_boundary(end) {
                    end -= 1;
                }
                snippet[..end].to_string()
            } else {
                snippet
            }
        });

        Ok(FindingCandidate {
            severity,
            issue_type: raw.issue_type.trim().to_string(),
            category: raw.category.trim().to_string(),
            file_path: raw.file_path.trim().to_string(),
            line_number,
            code_snippet,
            description: description.trim().to_string(),
            recommendation: recommendation.trim().to_string(),
            confidence_score: raw.confidence_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_entry() -> serde_json::Value {
        serde_json::json!({
            "severity": "high",
            "type": "SQL Injection",
            "category": "Input Validation",
            "filePath": "src/db.js",
            "lineNumber": 42,
            "codeSnippet": "db.query(`SELECT * FROM users WHERE id = ${id}`)",
            "description": "User input is interpolated directly into a SQL query.",
            "recommendation": "Use parameterized queries instead of string interpolation.",
            "confidenceScore": 0.95
        })
    }

    #[test]
    fn test_extract_from_fenced_block_with_prose() {
        let raw = format!(
            "Here is my assessment of the code:\n```json\n{}\n```\nLet me know if you need more detail.",
            serde_json::json!({ "vulnerabilities": [valid_entry()] })
        );
        let findings = FindingExtractor::extract(&raw);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].issue_type, "SQL Injection");
        assert_eq!(findings[0].line_number, Some(42));
    }

    #[test]
    fn test_extract_bare_object_amid_prose() {
        let raw = format!(
            "Assessment follows. {} End of assessment.",
            serde_json::json!({ "vulnerabilities": [valid_entry()] })
        );
        let findings = FindingExtractor::extract(&raw);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_no_json_yields_empty_not_error() {
        assert!(FindingExtractor::extract("No vulnerabilities were found in this code.").is_empty());
        assert!(FindingExtractor::extract("").is_empty());
    }

    #[test]
    fn test_malformed_json_yields_empty() {
        let raw = "```json\n{ \"vulnerabilities\": [ { broken\n```";
        assert!(FindingExtractor::extract(raw).is_empty());
    }

    #[test]
    fn test_missing_vulnerabilities_field_yields_empty() {
        let raw = r#"{ "findings": [] }"#;
        assert!(FindingExtractor::extract(raw).is_empty());
    }

    #[test]
    fn test_invalid_entry_dropped_valid_siblings_survive() {
        let mut bad = valid_entry();
        bad["severity"] = serde_json::json!("catastrophic");
        let raw = serde_json::json!({ "vulnerabilities": [valid_entry(), bad, valid_entry()] })
            .to_string();
        let findings = FindingExtractor::extract(&raw);
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_short_description_dropped() {
        let mut entry = valid_entry();
        entry["description"] = serde_json::json!("too short");
        let raw = serde_json::json!({ "vulnerabilities": [entry] }).to_string();
        assert!(FindingExtractor::extract(&raw).is_empty());
    }

    #[test]
    fn test_zero_line_number_dropped() {
        let mut entry = valid_entry();
        entry["lineNumber"] = serde_json::json!(0);
        let raw = serde_json::json!({ "vulnerabilities": [entry] }).to_string();
        assert!(FindingExtractor::extract(&raw).is_empty());
    }

    #[test]
    fn test_out_of_range_confidence_dropped() {
        let mut entry = valid_entry();
        entry["confidenceScore"] = serde_json::json!(1.5);
        let raw = serde_json::json!({ "vulnerabilities": [entry] }).to_string();
        assert!(FindingExtractor::extract(&raw).is_empty());
    }

    #[test]
    fn test_optional_fields_absent_is_valid() {
        let entry = serde_json::json!({
            "severity": "low",
            "type": "Security Misconfiguration",
            "category": "Configuration",
            "description": "Debug mode is enabled in the production configuration.",
            "recommendation": "Disable debug mode before deploying to production."
        });
        let raw = serde_json::json!({ "vulnerabilities": [entry] }).to_string();
        let findings = FindingExtractor::extract(&raw);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].file_path.is_empty());
        assert_eq!(findings[0].line_number, None);
        assert_eq!(findings[0].confidence_score, None);
    }

    #[test]
    fn test_oversized_snippet_truncated_not_dropped() {
        let mut entry = valid_entry();
        entry["codeSnippet"] = serde_json::json!("x".repeat(MAX_SNIPPET_LEN + 100));
        let raw = serde_json::json!({ "vulnerabilities": [entry] }).to_string();
        let findings = FindingExtractor::extract(&raw);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].code_snippet.as_ref().map(String::len),
            Some(MAX_SNIPPET_LEN)
        );
    }

    #[test]
    fn test_non_json_fence_falls_back_to_first_object() {
        let raw = format!(
            "```text\nnot json\n```\n{}",
            serde_json::json!({ "vulnerabilities": [valid_entry()] })
        );
        assert_eq!(FindingExtractor::extract(&raw).len(), 1);
    }
}
