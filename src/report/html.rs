//! HTML report rendering using minijinja templating.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use minijinja::{context, Environment, Value};

use super::charts::CHART_FILES;
use crate::core::{RepositoryResult, Result};
use crate::pipeline::aggregate::RunSummary;

/// The embedded HTML template.
const TEMPLATE_HTML: &str = include_str!("template.html");

/// Renderer handles HTML report generation.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Create a new renderer with the embedded template.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_filter("num", num_format);
        env.add_filter("round1", |v: f64| format!("{v:.1}"));
        env.add_template("report", TEMPLATE_HTML)?;
        Ok(Self { env })
    }

    fn render_to_bytes(
        &self,
        results: &[RepositoryResult],
        summary: &RunSummary,
        charts: &[String],
    ) -> Result<Vec<u8>> {
        let tmpl = self.env.get_template("report")?;
        let rendered = tmpl.render(context! {
            generated_at => summary.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            summary => summary,
            results => results,
            charts => charts,
        })?;
        Ok(rendered.into_bytes())
    }

    /// Render to `report.html` in the output directory, also producing a
    /// `.html.gz` companion. Chart files already present in the directory
    /// are embedded by reference.
    pub fn render_to_file(
        &self,
        results: &[RepositoryResult],
        summary: &RunSummary,
        out_dir: &Path,
    ) -> Result<PathBuf> {
        fs::create_dir_all(out_dir)?;

        let charts: Vec<String> = CHART_FILES
            .iter()
            .filter(|name| out_dir.join(name).exists())
            .map(|name| name.to_string())
            .collect();

        let output = self.render_to_bytes(results, summary, &charts)?;
        let html_path = out_dir.join("report.html");
        fs::write(&html_path, &output)?;

        let gz_file = fs::File::create(html_path.with_extension("html.gz"))?;
        let mut encoder = GzEncoder::new(gz_file, Compression::best());
        encoder.write_all(&output)?;
        encoder.finish()?;

        Ok(html_path)
    }
}

/// Format number with thousands separator.
fn num_format(n: Value) -> String {
    let num = n.as_i64().unwrap_or(0);
    let s = num.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result
}
