//! Report generation: JSON files, charts and the HTML document.

pub mod charts;
pub mod html;
pub mod json;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::ReportFormat;
use crate::core::{RepositoryResult, Result};
use crate::pipeline::aggregate::RunSummary;

/// Write every configured artifact into the output directory.
///
/// Charts are drawn first so the HTML renderer can embed whichever files
/// exist. Returns the paths of everything written.
pub fn write_all(
    results: &[RepositoryResult],
    summary: &RunSummary,
    out_dir: &Path,
    format: ReportFormat,
    with_charts: bool,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if with_charts {
        written.extend(charts::generate_all(results, out_dir)?);
    }

    if matches!(format, ReportFormat::Json | ReportFormat::Both) {
        written.extend(json::write_reports(results, summary, out_dir)?);
    }

    if matches!(format, ReportFormat::Html | ReportFormat::Both) {
        let renderer = html::Renderer::new()?;
        let path = renderer.render_to_file(results, summary, out_dir)?;
        written.push(path);
    }

    for path in &written {
        info!(path = %path.display(), "wrote report artifact");
    }
    Ok(written)
}
