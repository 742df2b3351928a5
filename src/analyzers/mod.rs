//! Analyzer contract and the configured registry.

pub mod code_complexity;
pub mod dependencies;
pub mod documentation;

use std::path::Path;

use crate::config::Config;
use crate::core::{AnalyzerReport, Result};

/// Trait implemented by all analyzers.
///
/// `analyze` is a pure read of the repository's file tree: it never mutates
/// the repository, and per-file failures are skipped inside the analyzer.
/// Structural failures (the root does not exist) come back as the failure
/// variant of [`AnalyzerReport`], not as `Err` — an `Err` escaping here is
/// unexpected and is absorbed by the runner.
pub trait Analyzer: Send + Sync {
    /// Stable identifier, used as the key in repository and summary records.
    fn name(&self) -> &'static str;

    /// Run analysis over one repository root.
    fn analyze(&self, repo_root: &Path) -> Result<AnalyzerReport>;
}

/// Build the ordered list of active analyzers for a run.
///
/// Built once from configuration; the runner applies them in this order.
pub fn build_registry(config: &Config) -> Vec<Box<dyn Analyzer>> {
    let mut registry: Vec<Box<dyn Analyzer>> = Vec::new();

    if config.analysis.code_complexity {
        registry.push(Box::new(code_complexity::CodeComplexityAnalyzer::new(
            config.analysis.exclude_patterns.clone(),
        )));
    }
    if config.analysis.dependency_complexity {
        registry.push(Box::new(dependencies::DependencyAnalyzer::new()));
    }
    if config.analysis.documentation_tokens {
        registry.push(Box::new(documentation::DocumentationAnalyzer::new()));
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_analyzers() {
        let registry = build_registry(&Config::default());
        let names: Vec<_> = registry.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "code_complexity",
                "dependency_complexity",
                "documentation_tokens"
            ]
        );
    }

    #[test]
    fn test_registry_respects_toggles() {
        let mut config = Config::default();
        config.analysis.code_complexity = false;
        config.analysis.documentation_tokens = false;

        let registry = build_registry(&config);
        let names: Vec<_> = registry.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["dependency_complexity"]);
    }

    #[test]
    fn test_empty_registry() {
        let mut config = Config::default();
        config.analysis.code_complexity = false;
        config.analysis.dependency_complexity = false;
        config.analysis.documentation_tokens = false;
        assert!(build_registry(&config).is_empty());
    }
}
