//! SVG chart generation with plotters.
//!
//! Each chart is written as a standalone `.svg` next to the reports; the
//! HTML renderer embeds whichever files exist. Charts with no data points
//! are skipped rather than drawn empty.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::core::{Error, RepositoryResult, Result};

const CHART_SIZE: (u32, u32) = (900, 500);
const TOP_FUNCTIONS_PER_REPO: usize = 5;
const TOP_FUNCTIONS_GLOBAL: usize = 10;

/// Chart filenames, in render order. The HTML template probes these.
pub const CHART_FILES: &[&str] = &[
    "complexity_by_repo.svg",
    "dependencies_by_repo.svg",
    "documentation_by_repo.svg",
    "complexity_distribution.svg",
    "top_complex_functions.svg",
];

fn chart_err(e: impl std::fmt::Display) -> Error {
    Error::Report(format!("chart rendering failed: {e}"))
}

/// Generate every chart that has data. Returns the written paths.
pub fn generate_all(results: &[RepositoryResult], out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let draws: [fn(&[RepositoryResult], &Path) -> Result<bool>; 5] = [
        complexity_by_repo,
        dependencies_by_repo,
        documentation_by_repo,
        complexity_distribution,
        top_complex_functions,
    ];

    for (name, draw) in CHART_FILES.iter().zip(draws) {
        let path = out_dir.join(name);
        if draw(results, &path)? {
            written.push(path);
        } else {
            debug!(chart = %name, "no data, skipped");
        }
    }

    Ok(written)
}

/// Vertical bar chart over one value per repository.
fn repo_bar_chart(
    path: &Path,
    caption: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
) -> Result<bool> {
    if values.is_empty() {
        return Ok(false);
    }
    let max_y = values.iter().cloned().fold(0.0f64, f64::max).max(1.0) * 1.1;
    let n = values.len();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(90)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..n as f64, 0f64..max_y)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_desc)
        .x_labels(n)
        .x_label_formatter(&|x| {
            let idx = *x as usize;
            if *x >= 0.0 && idx < n && (x - idx as f64).abs() < 1e-9 {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, v)| {
            Rectangle::new(
                [(i as f64 + 0.15, 0.0), (i as f64 + 0.85, *v)],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(true)
}

fn complexity_by_repo(results: &[RepositoryResult], path: &Path) -> Result<bool> {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for result in results {
        if let Some(m) = result
            .analyses
            .get("code_complexity")
            .and_then(|r| r.as_code_complexity())
        {
            labels.push(result.repository.clone());
            values.push(m.average_complexity);
        }
    }
    repo_bar_chart(
        path,
        "Average Cyclomatic Complexity by Repository",
        "average complexity",
        &labels,
        &values,
    )
}

fn dependencies_by_repo(results: &[RepositoryResult], path: &Path) -> Result<bool> {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for result in results {
        if let Some(m) = result
            .analyses
            .get("dependency_complexity")
            .and_then(|r| r.as_dependencies())
        {
            labels.push(result.repository.clone());
            values.push(m.total_dependencies as f64);
        }
    }
    repo_bar_chart(
        path,
        "Dependencies by Repository",
        "dependencies",
        &labels,
        &values,
    )
}

fn documentation_by_repo(results: &[RepositoryResult], path: &Path) -> Result<bool> {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    for result in results {
        if let Some(m) = result
            .analyses
            .get("documentation_tokens")
            .and_then(|r| r.as_documentation())
        {
            labels.push(result.repository.clone());
            values.push(m.total_tokens as f64);
        }
    }
    repo_bar_chart(
        path,
        "Documentation Tokens by Repository",
        "tokens",
        &labels,
        &values,
    )
}

/// Histogram of per-file average complexity across every repository.
fn complexity_distribution(results: &[RepositoryResult], path: &Path) -> Result<bool> {
    let mut averages = Vec::new();
    for result in results {
        if let Some(m) = result
            .analyses
            .get("code_complexity")
            .and_then(|r| r.as_code_complexity())
        {
            for file in &m.files_analyzed {
                if file.functions > 0 {
                    averages.push(file.complexity as f64 / file.functions as f64);
                }
            }
        }
    }
    if averages.is_empty() {
        return Ok(false);
    }

    // Unit-wide buckets, capped so one pathological file cannot stretch the
    // axis indefinitely.
    const MAX_BUCKET: usize = 20;
    let mut buckets = vec![0u64; MAX_BUCKET + 1];
    for avg in &averages {
        let bucket = (*avg as usize).min(MAX_BUCKET);
        buckets[bucket] += 1;
    }
    let max_count = buckets.iter().copied().max().unwrap_or(0).max(1);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Per-File Average Complexity Distribution", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..(MAX_BUCKET + 1) as f64, 0u64..max_count + 1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("average complexity per file")
        .y_desc("files")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(buckets.iter().enumerate().map(|(i, count)| {
            Rectangle::new(
                [(i as f64 + 0.05, 0), (i as f64 + 0.95, *count)],
                GREEN.mix(0.6).filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(true)
}

/// Horizontal bar chart of the globally hottest functions.
///
/// Takes the top functions per repository first so one repository cannot
/// crowd out the rest, then the global top slice.
fn top_complex_functions(results: &[RepositoryResult], path: &Path) -> Result<bool> {
    let mut hottest: Vec<(String, u64)> = Vec::new();
    for result in results {
        if let Some(m) = result
            .analyses
            .get("code_complexity")
            .and_then(|r| r.as_code_complexity())
        {
            for func in m.high_complexity_functions.iter().take(TOP_FUNCTIONS_PER_REPO) {
                hottest.push((
                    format!("{}: {}", result.repository, func.function),
                    func.complexity,
                ));
            }
        }
    }
    if hottest.is_empty() {
        return Ok(false);
    }
    hottest.sort_by(|a, b| b.1.cmp(&a.1));
    hottest.truncate(TOP_FUNCTIONS_GLOBAL);

    let max_x = hottest.iter().map(|(_, c)| *c).max().unwrap_or(1) as f64 * 1.1;
    let n = hottest.len();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Most Complex Functions", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(260)
        .build_cartesian_2d(0f64..max_x, 0f64..n as f64)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("cyclomatic complexity")
        .y_labels(n)
        .y_label_formatter(&|y| {
            let idx = *y as usize;
            if *y >= 0.0 && idx < n && (y - idx as f64).abs() < 1e-9 {
                // Draw worst at the top.
                hottest[n - 1 - idx].0.clone()
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(hottest.iter().enumerate().map(|(i, (_, complexity))| {
            let row = (n - 1 - i) as f64;
            Rectangle::new(
                [(0.0, row + 0.15), (*complexity as f64, row + 0.85)],
                RED.mix(0.6).filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(true)
}
