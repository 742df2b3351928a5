//! Configuration loading and management.

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory repositories are cloned into.
    pub clone_directory: String,
    /// Where the repositories come from.
    pub repositories: RepositoriesConfig,
    /// GitHub API access.
    pub github: GithubConfig,
    /// Analyzer toggles and exclusions.
    pub analysis: AnalysisConfig,
    /// Report output configuration.
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clone_directory: "cloned_repos".to_string(),
            repositories: RepositoriesConfig::default(),
            github: GithubConfig::default(),
            analysis: AnalysisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. The format is picked by extension
    /// (TOML, YAML or JSON). Env vars with `REPOLENS_` prefix override file
    /// values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::core::Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => figment.merge(Yaml::file_exact(path)),
            Some("json") => figment.merge(Json::file_exact(path)),
            _ => figment.merge(Toml::file_exact(path)),
        };

        let config: Self = figment
            .merge(Env::prefixed("REPOLENS_").split("__"))
            .extract()
            .map_err(|e| crate::core::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from a directory, looking for repolens.toml.
    ///
    /// Missing files are silently skipped (defaults are used).
    /// Env vars with `REPOLENS_` prefix override file/default values.
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join("repolens.toml")))
            .merge(Env::prefixed("REPOLENS_").split("__"))
            .extract()
            .map_err(|e| crate::core::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Create default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }
}

/// Repository source selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoriesConfig {
    /// `list` for explicit URLs, `organization` for a GitHub org listing.
    pub source: RepositorySource,
    /// Repository URLs or `owner/repo` shorthands (source = list).
    pub repos: Vec<String>,
    /// Organization name (source = organization).
    pub organization: Option<String>,
    /// Cap on how many organization repositories to analyze.
    pub max_repos: Option<usize>,
}

impl Default for RepositoriesConfig {
    fn default() -> Self {
        Self {
            source: RepositorySource::List,
            repos: Vec::new(),
            organization: None,
            max_repos: None,
        }
    }
}

/// Repository source type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepositorySource {
    /// Explicit list of repositories.
    #[default]
    List,
    /// All repositories of a GitHub organization.
    Organization,
}

/// GitHub API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Personal access token for the API and private clones.
    pub token: Option<String>,
}

/// Analyzer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Run the code complexity analyzer.
    pub code_complexity: bool,
    /// Run the dependency analyzer.
    pub dependency_complexity: bool,
    /// Run the documentation token analyzer.
    pub documentation_tokens: bool,
    /// Path patterns excluded from code complexity analysis.
    pub exclude_patterns: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            code_complexity: true,
            dependency_complexity: true,
            documentation_tokens: true,
            exclude_patterns: vec![
                "*/test/*".to_string(),
                "*/tests/*".to_string(),
                "*/node_modules/*".to_string(),
                "*/vendor/*".to_string(),
                "*/.git/*".to_string(),
            ],
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory reports are written to.
    pub directory: String,
    /// Which report formats to produce.
    pub format: ReportFormat,
    /// Generate chart images alongside the reports.
    pub charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "reports".to_string(),
            format: ReportFormat::Both,
            charts: true,
        }
    }
}

/// Report format selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// HTML report only.
    Html,
    /// JSON files only.
    Json,
    /// Both HTML and JSON.
    #[default]
    Both,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown format: {s}. Use 'html', 'json', or 'both'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.clone_directory, "cloned_repos");
        assert_eq!(config.output.directory, "reports");
        assert_eq!(config.repositories.source, RepositorySource::List);
        assert!(config.analysis.code_complexity);
        assert!(config.output.charts);
    }

    #[test]
    fn test_default_exclude_patterns() {
        let config = AnalysisConfig::default();
        assert!(config.exclude_patterns.contains(&"*/tests/*".to_string()));
        assert!(config
            .exclude_patterns
            .contains(&"*/node_modules/*".to_string()));
    }

    #[test]
    fn test_config_from_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "repolens.toml",
                "clone_directory = \"work\"\n[repositories]\nsource = \"list\"\nrepos = [\"rust-lang/cargo\"]",
            )?;
            let config = Config::from_file("repolens.toml").unwrap();
            assert_eq!(config.clone_directory, "work");
            assert_eq!(config.repositories.repos, vec!["rust-lang/cargo"]);
            Ok(())
        });
    }

    #[test]
    fn test_config_from_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "repolens.yaml",
                "repositories:\n  source: organization\n  organization: rust-lang\n  max_repos: 5\n",
            )?;
            let config = Config::from_file("repolens.yaml").unwrap();
            assert_eq!(config.repositories.source, RepositorySource::Organization);
            assert_eq!(config.repositories.organization.as_deref(), Some("rust-lang"));
            assert_eq!(config.repositories.max_repos, Some(5));
            Ok(())
        });
    }

    #[test]
    fn test_config_from_json_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "repolens.json",
                r#"{"output": {"format": "json", "charts": false}}"#,
            )?;
            let config = Config::from_file("repolens.json").unwrap();
            assert_eq!(config.output.format, ReportFormat::Json);
            assert!(!config.output.charts);
            Ok(())
        });
    }

    #[test]
    fn test_config_load_default_no_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load_default(".").unwrap();
            assert_eq!(config.output.directory, "reports");
            Ok(())
        });
    }

    #[test]
    fn test_from_file_errors_on_missing_file() {
        let result = Config::from_file("/nonexistent/path/repolens.toml");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("not found"), "expected 'not found' in: {err}");
    }

    #[test]
    fn test_env_var_overrides_file_value() {
        Jail::expect_with(|jail| {
            jail.create_file("repolens.toml", "clone_directory = \"from_file\"")?;
            jail.set_env("REPOLENS_CLONE_DIRECTORY", "from_env");
            let config = Config::from_file("repolens.toml").unwrap();
            assert_eq!(config.clone_directory, "from_env");
            Ok(())
        });
    }

    #[test]
    fn test_env_var_nested_override() {
        Jail::expect_with(|jail| {
            jail.set_env("REPOLENS_OUTPUT__DIRECTORY", "elsewhere");
            let config = Config::load_default(".").unwrap();
            assert_eq!(config.output.directory, "elsewhere");
            Ok(())
        });
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("html".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("both".parse::<ReportFormat>().unwrap(), ReportFormat::Both);
        assert!("csv".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_analyzer_toggles_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "repolens.toml",
                "[analysis]\ndependency_complexity = false",
            )?;
            let config = Config::from_file("repolens.toml").unwrap();
            assert!(config.analysis.code_complexity);
            assert!(!config.analysis.dependency_complexity);
            Ok(())
        });
    }

    #[test]
    fn test_config_default_toml_parses() {
        let config: Config = toml::from_str(Config::default_toml()).unwrap();
        assert_eq!(config.output.directory, "reports");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("clone_directory"));
        assert!(json.contains("exclude_patterns"));
    }
}
