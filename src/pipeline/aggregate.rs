//! Cross-repository summary aggregation.
//!
//! Folds per-repository results into one summary record. Failed analyses
//! contribute nothing to the sums, but a repository that ran an analyzer at
//! all still materializes that analyzer's bucket, so a run where every
//! repository failed an analyzer reports zeroed totals rather than omitting
//! the section.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AnalyzerReport, RepositoryResult};

/// Whole-run summary across all repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_repositories: usize,
    pub timestamp: DateTime<Utc>,
    pub aggregated_metrics: AggregatedMetrics,
}

/// Per-analyzer aggregate buckets. A bucket is present when at least one
/// repository carries a result (success or failure) for that analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_complexity: Option<CodeComplexityTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_complexity: Option<DependencyTotals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_tokens: Option<DocumentationTotals>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeComplexityTotals {
    pub total_files: u64,
    pub total_functions: u64,
    pub total_complexity: u64,
    pub total_lines_of_code: u64,
    pub max_complexity: u64,
    pub average_complexity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyTotals {
    pub total_dependencies: u64,
    pub total_dependency_files: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentationTotals {
    pub total_doc_files: u64,
    pub total_tokens: u64,
    pub total_characters: u64,
    pub total_lines: u64,
}

/// Build the summary for a completed run.
pub fn summarize(results: &[RepositoryResult]) -> RunSummary {
    let mut metrics = AggregatedMetrics::default();

    for result in results {
        for (name, report) in &result.analyses {
            match name.as_str() {
                "code_complexity" => {
                    let totals = metrics.code_complexity.get_or_insert_with(Default::default);
                    if let AnalyzerReport::CodeComplexity(m) = report {
                        totals.total_files += m.total_files;
                        totals.total_functions += m.total_functions;
                        totals.total_complexity += m.total_complexity;
                        totals.total_lines_of_code += m.total_lines_of_code;
                        totals.max_complexity = totals.max_complexity.max(m.max_complexity);
                    }
                }
                "dependency_complexity" => {
                    let totals = metrics
                        .dependency_complexity
                        .get_or_insert_with(Default::default);
                    if let AnalyzerReport::Dependencies(m) = report {
                        totals.total_dependencies += m.total_dependencies;
                        totals.total_dependency_files += m.total_dependency_files;
                    }
                }
                "documentation_tokens" => {
                    let totals = metrics
                        .documentation_tokens
                        .get_or_insert_with(Default::default);
                    if let AnalyzerReport::Documentation(m) = report {
                        totals.total_doc_files += m.total_doc_files;
                        totals.total_tokens += m.total_tokens;
                        totals.total_characters += m.total_characters;
                        totals.total_lines += m.total_lines;
                    }
                }
                _ => {}
            }
        }
    }

    // Derived once from the folded sums, never summed across repos.
    if let Some(totals) = metrics.code_complexity.as_mut() {
        if totals.total_functions > 0 {
            totals.average_complexity =
                totals.total_complexity as f64 / totals.total_functions as f64;
        }
    }

    RunSummary {
        total_repositories: results.len(),
        timestamp: Utc::now(),
        aggregated_metrics: metrics,
    }
}
