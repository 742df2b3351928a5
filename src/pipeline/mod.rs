//! Run orchestration: acquire repositories, apply analyzers, aggregate.

pub mod aggregate;

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::analyzers::{build_registry, Analyzer};
use crate::config::{Config, RepositorySource};
use crate::core::{AnalyzerReport, Error, RepositoryResult, Result};
use crate::repo::{github, RepoManager};

use aggregate::RunSummary;

/// Everything a completed run produces.
#[derive(Debug)]
pub struct PipelineOutput {
    pub results: Vec<RepositoryResult>,
    pub summary: RunSummary,
}

/// Orchestrates one analysis run.
pub struct Pipeline {
    config: Config,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field(
                "analyzers",
                &self.analyzers.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Pipeline {
    /// Validate the configuration and build the analyzer registry.
    pub fn from_config(config: Config) -> Result<Self> {
        match config.repositories.source {
            RepositorySource::List => {
                if config.repositories.repos.is_empty() {
                    return Err(Error::Config(
                        "repository source is 'list' but no repositories are configured"
                            .to_string(),
                    ));
                }
            }
            RepositorySource::Organization => {
                if config.repositories.organization.is_none() {
                    return Err(Error::Config(
                        "repository source is 'organization' but no organization is configured"
                            .to_string(),
                    ));
                }
            }
        }

        let analyzers = build_registry(&config);
        Ok(Self { config, analyzers })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Acquire every configured repository, then analyze the ones that made
    /// it to disk.
    pub fn run(&self) -> Result<PipelineOutput> {
        let manager = self.acquire()?;
        let repos = manager.repository_paths();
        info!(count = repos.len(), "analyzing repositories");

        let bar = ProgressBar::new(repos.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut results = Vec::with_capacity(repos.len());
        for spec in &repos {
            bar.set_message(spec.name.clone());
            results.push(self.analyze_repository(&spec.name, &spec.local_path));
            bar.inc(1);
        }
        bar.finish_and_clear();

        let summary = aggregate::summarize(&results);
        Ok(PipelineOutput { results, summary })
    }

    /// Apply every active analyzer to one repository.
    ///
    /// An analyzer error becomes a failure record under that analyzer's
    /// name; it never aborts the other analyzers or repositories.
    pub fn analyze_repository(&self, name: &str, path: &Path) -> RepositoryResult {
        let mut analyses = BTreeMap::new();
        for analyzer in &self.analyzers {
            let report = match analyzer.analyze(path) {
                Ok(report) => report,
                Err(e) => {
                    error!(repo = name, analyzer = analyzer.name(), error = %e, "analyzer failed");
                    AnalyzerReport::failed(e.to_string())
                }
            };
            analyses.insert(analyzer.name().to_string(), report);
        }

        RepositoryResult {
            repository: name.to_string(),
            path: path.to_path_buf(),
            timestamp: Utc::now(),
            analyses,
        }
    }

    fn acquire(&self) -> Result<RepoManager> {
        let token = self.config.github.token.clone();
        let mut manager = RepoManager::new(&self.config.clone_directory, token);

        match self.config.repositories.source {
            RepositorySource::List => {
                manager.add_from_list(&self.config.repositories.repos);
            }
            RepositorySource::Organization => {
                // Presence validated in from_config.
                let organization = self
                    .config
                    .repositories
                    .organization
                    .as_deref()
                    .ok_or_else(|| Error::Config("organization not configured".to_string()))?;
                let urls = github::list_organization_repos(
                    organization,
                    self.config.github.token.as_deref(),
                    self.config.repositories.max_repos,
                )?;
                info!(organization, count = urls.len(), "listed organization repositories");
                manager.add_from_list(urls);
            }
        }

        manager.sync_all()?;
        Ok(manager)
    }
}
