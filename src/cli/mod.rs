//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ReportFormat, RepositorySource};
use crate::core::Result;

/// Collect complexity, dependency and documentation metrics across
/// repositories and produce aggregate reports.
#[derive(Debug, Parser)]
#[command(name = "repolens", version, about)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository URL or owner/repo shorthand (repeatable)
    #[arg(short, long = "repos", value_name = "REPO")]
    pub repos: Vec<String>,

    /// Analyze every repository of a GitHub organization
    #[arg(long, value_name = "ORG", conflicts_with = "repos")]
    pub organization: Option<String>,

    /// Cap on how many organization repositories to analyze
    #[arg(long, value_name = "N")]
    pub max_repos: Option<usize>,

    /// Output directory for reports
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Skip chart generation
    #[arg(long)]
    pub no_charts: bool,

    /// Report format: html, json, or both
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// GitHub token for API listing and private clones
    #[arg(long, env = "GITHUB_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
}

impl Cli {
    /// Load configuration, from the explicit file if given, and apply the
    /// command-line overrides on top.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::load_default(".")?,
        };

        if !self.repos.is_empty() {
            config.repositories.source = RepositorySource::List;
            config.repositories.repos = self.repos.clone();
        }
        if let Some(organization) = &self.organization {
            config.repositories.source = RepositorySource::Organization;
            config.repositories.organization = Some(organization.clone());
        }
        if let Some(max_repos) = self.max_repos {
            config.repositories.max_repos = Some(max_repos);
        }
        if let Some(output) = &self.output {
            config.output.directory = output.to_string_lossy().into_owned();
        }
        if self.no_charts {
            config.output.charts = false;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(token) = &self.github_token {
            config.github.token = Some(token.clone());
        }

        Ok(config)
    }
}
