//! Metric record types shared by analyzers, the runner and the aggregator.
//!
//! Each built-in analyzer gets its own typed result struct instead of an open
//! string-keyed mapping. [`AnalyzerReport`] is the tagged union over those
//! structs plus a failure variant: a report is either metrics or an error,
//! never both. The union serializes untagged so the JSON shape stays flat —
//! a failed analyzer slot is exactly `{"error": "..."}`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one analyzer invocation against one repository.
///
/// The variants carry disjoint field sets, so untagged deserialization is
/// unambiguous and a serialized report round-trips to the same variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalyzerReport {
    CodeComplexity(CodeComplexityMetrics),
    Dependencies(DependencyMetrics),
    Documentation(DocumentationMetrics),
    Failed(AnalyzerFailure),
}

impl AnalyzerReport {
    /// Build a failure report from any displayable error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(AnalyzerFailure {
            error: message.into(),
        })
    }

    /// Whether this report is the failure variant.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn as_code_complexity(&self) -> Option<&CodeComplexityMetrics> {
        match self {
            Self::CodeComplexity(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_dependencies(&self) -> Option<&DependencyMetrics> {
        match self {
            Self::Dependencies(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_documentation(&self) -> Option<&DocumentationMetrics> {
        match self {
            Self::Documentation(m) => Some(m),
            _ => None,
        }
    }
}

/// The error-as-data payload for a failed analyzer slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerFailure {
    pub error: String,
}

/// Metrics produced by the code complexity analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeComplexityMetrics {
    /// Files with at least one detected function.
    pub total_files: u64,
    pub total_functions: u64,
    pub total_lines_of_code: u64,
    pub total_complexity: u64,
    /// `total_complexity / total_functions`, computed once at the end.
    pub average_complexity: f64,
    pub max_complexity: u64,
    /// Functions above the fixed threshold, sorted descending by complexity.
    pub high_complexity_functions: Vec<HighComplexityFunction>,
    /// Breakdown keyed by file extension.
    pub complexity_by_language: BTreeMap<String, LanguageBreakdown>,
    pub files_analyzed: Vec<AnalyzedFile>,
}

/// A function whose cyclomatic complexity exceeds the reporting threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighComplexityFunction {
    pub file: String,
    pub function: String,
    pub complexity: u64,
    pub lines: u64,
}

/// Per-extension complexity rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageBreakdown {
    pub files: u64,
    pub functions: u64,
    pub total_complexity: u64,
}

/// Per-file summary retained in the repository record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedFile {
    pub path: String,
    pub functions: u64,
    pub complexity: u64,
    pub lines: u64,
}

/// Metrics produced by the dependency analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyMetrics {
    pub total_dependencies: u64,
    pub total_dependency_files: u64,
    /// Breakdown keyed by package-manager label.
    pub dependencies_by_manager: BTreeMap<String, ManagerBreakdown>,
    pub dependency_files: Vec<DependencyFileRecord>,
}

/// Per-package-manager rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerBreakdown {
    pub files: u64,
    pub dependencies: u64,
}

/// One recognized manifest file and its heuristic dependency count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyFileRecord {
    pub path: String,
    pub package_manager: String,
    pub dependencies: u64,
}

/// Metrics produced by the documentation analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentationMetrics {
    pub total_doc_files: u64,
    pub total_tokens: u64,
    pub total_characters: u64,
    pub total_lines: u64,
    pub average_tokens_per_file: f64,
    /// Breakdown keyed by file extension.
    pub doc_files_by_type: BTreeMap<String, DocTypeBreakdown>,
    /// Top files by token count; ties keep encounter order.
    pub largest_doc_files: Vec<DocFileRecord>,
    pub documentation_files: Vec<DocFileRecord>,
}

/// Per-extension documentation rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocTypeBreakdown {
    pub files: u64,
    pub tokens: u64,
}

/// One documentation file and its token statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocFileRecord {
    pub path: String,
    pub tokens: u64,
    pub characters: u64,
    pub lines: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One record per analyzed repository.
///
/// `analyses` holds exactly one entry per configured analyzer, failures
/// included. The record is fully built before it is published; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryResult {
    pub repository: String,
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub analyses: BTreeMap<String, AnalyzerReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_report_serializes_as_error_object() {
        let report = AnalyzerReport::failed("repository root does not exist");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "repository root does not exist"})
        );
    }

    #[test]
    fn test_report_round_trip_preserves_variant() {
        let mut metrics = CodeComplexityMetrics::default();
        metrics.total_functions = 4;
        metrics.total_complexity = 37;
        metrics.average_complexity = 9.25;
        metrics.max_complexity = 15;

        let report = AnalyzerReport::CodeComplexity(metrics);
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalyzerReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert!(back.as_code_complexity().is_some());
    }

    #[test]
    fn test_failure_round_trip() {
        let report = AnalyzerReport::failed("boom");
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalyzerReport = serde_json::from_str(&json).unwrap();
        assert!(back.is_failed());
        assert_eq!(back, report);
    }

    #[test]
    fn test_repository_result_round_trip() {
        let mut analyses = BTreeMap::new();
        analyses.insert(
            "dependency_complexity".to_string(),
            AnalyzerReport::Dependencies(DependencyMetrics {
                total_dependencies: 3,
                total_dependency_files: 1,
                ..Default::default()
            }),
        );
        analyses.insert(
            "code_complexity".to_string(),
            AnalyzerReport::failed("unreadable"),
        );

        let result = RepositoryResult {
            repository: "demo".to_string(),
            path: PathBuf::from("/tmp/demo"),
            timestamp: Utc::now(),
            analyses,
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: RepositoryResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert!(back.analyses["code_complexity"].is_failed());
    }
}
