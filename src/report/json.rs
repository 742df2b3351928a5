//! JSON report output.

use std::path::{Path, PathBuf};

use crate::core::{RepositoryResult, Result};
use crate::pipeline::aggregate::RunSummary;

/// Write `results.json` and `summary.json` into the output directory.
pub fn write_reports(
    results: &[RepositoryResult],
    summary: &RunSummary,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let results_path = out_dir.join("results.json");
    std::fs::write(&results_path, serde_json::to_string_pretty(results)?)?;

    let summary_path = out_dir.join("summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(summary)?)?;

    Ok(vec![results_path, summary_path])
}
