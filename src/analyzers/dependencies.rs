//! Dependency complexity analyzer.
//!
//! Recognizes a fixed table of manifest filenames and applies a
//! format-specific heuristic count to each. The heuristics are intentionally
//! approximate (line matching, not real parsing, for most formats) and can
//! over- or under-count; that is by design. A recognized file counting zero
//! dependencies is left out of every tally.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use walkdir::WalkDir;

use super::Analyzer;
use crate::core::{AnalyzerReport, DependencyFileRecord, DependencyMetrics, Result};

/// Directories never descended into while looking for manifests.
const SKIP_DIRS: &[&str] = &[".git", "node_modules", "vendor", "__pycache__", ".venv", "venv"];

/// Manifest filename -> package-manager label.
static MANIFEST_MANAGERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("package.json", "npm"),
        ("package-lock.json", "npm"),
        ("requirements.txt", "pip"),
        ("Pipfile", "pip"),
        ("Pipfile.lock", "pip"),
        ("poetry.lock", "poetry"),
        ("pyproject.toml", "poetry"),
        ("Gemfile", "bundler"),
        ("Gemfile.lock", "bundler"),
        ("pom.xml", "maven"),
        ("build.gradle", "gradle"),
        ("build.gradle.kts", "gradle"),
        ("Cargo.toml", "cargo"),
        ("Cargo.lock", "cargo"),
        ("go.mod", "go"),
        ("go.sum", "go"),
        ("composer.json", "composer"),
        ("composer.lock", "composer"),
        ("yarn.lock", "yarn"),
        ("pubspec.yaml", "dart"),
        ("packages.config", "nuget"),
        ("project.json", "nuget"),
    ])
});

#[derive(Default)]
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for DependencyAnalyzer {
    fn name(&self) -> &'static str {
        "dependency_complexity"
    }

    fn analyze(&self, repo_root: &Path) -> Result<AnalyzerReport> {
        if !repo_root.is_dir() {
            return Ok(AnalyzerReport::failed(format!(
                "repository root does not exist: {}",
                repo_root.display()
            )));
        }

        let mut metrics = DependencyMetrics::default();

        let walker = WalkDir::new(repo_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !SKIP_DIRS.contains(&name.as_ref())
            });

        for entry in walker.flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some(manager) = MANIFEST_MANAGERS.get(file_name.as_str()) else {
                continue;
            };

            let count = count_dependencies(entry.path(), &file_name, manager);

            // Zero-count files are present on disk but excluded from tallies.
            if count > 0 {
                metrics.total_dependency_files += 1;
                metrics.total_dependencies += count;

                let breakdown = metrics
                    .dependencies_by_manager
                    .entry(manager.to_string())
                    .or_default();
                breakdown.files += 1;
                breakdown.dependencies += count;

                metrics.dependency_files.push(DependencyFileRecord {
                    path: entry
                        .path()
                        .strip_prefix(repo_root)
                        .unwrap_or(entry.path())
                        .to_string_lossy()
                        .into_owned(),
                    package_manager: manager.to_string(),
                    dependencies: count,
                });
            }
        }

        Ok(AnalyzerReport::Dependencies(metrics))
    }
}

/// Heuristic dependency count for one manifest file.
///
/// Dispatch order matters: lock files are checked before the generic TOML
/// branch so `Gemfile.lock`/`Pipfile.lock` use the lock heuristic, and the
/// `Gemfile` prefix rule only sees the non-lock file.
fn count_dependencies(path: &Path, file_name: &str, manager: &str) -> u64 {
    let Ok(bytes) = std::fs::read(path) else {
        return 0;
    };
    let content = String::from_utf8_lossy(&bytes);
    count_in_content(&content, file_name, manager)
}

fn count_in_content(content: &str, file_name: &str, manager: &str) -> u64 {
    let extension = file_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");

    // JSON manifests: entries across the dependency sections.
    if matches!(file_name, "package.json" | "composer.json" | "project.json") {
        let Ok(data) = serde_json::from_str::<serde_json::Value>(content) else {
            return 0;
        };
        let mut count = 0;
        for key in [
            "dependencies",
            "devDependencies",
            "peerDependencies",
            "require",
            "require-dev",
        ] {
            if let Some(map) = data.get(key).and_then(|v| v.as_object()) {
                count += map.len() as u64;
            }
        }
        return count;
    }

    // Line-oriented manifests: version-operator lines.
    if matches!(file_name, "requirements.txt" | "Pipfile") {
        return content
            .split('\n')
            .map(str::trim)
            .filter(|line| {
                !line.is_empty()
                    && !line.starts_with('#')
                    && !line.starts_with('[')
                    && (line.contains("==") || line.contains(">=") || line.contains("~="))
            })
            .count() as u64;
    }

    // Lock files: structured for npm, indicator lines otherwise.
    if file_name.to_lowercase().contains("lock") {
        if manager == "npm" {
            if let Ok(data) = serde_json::from_str::<serde_json::Value>(content) {
                if let Some(packages) = data.get("packages").and_then(|v| v.as_object()) {
                    return packages.len() as u64;
                }
                if let Some(deps) = data.get("dependencies").and_then(|v| v.as_object()) {
                    return deps.len() as u64;
                }
            }
        }
        return content
            .split('\n')
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty()
                    && (trimmed.starts_with("name =")
                        || trimmed.starts_with("name:")
                        || line.contains("[[package]]"))
            })
            .count() as u64;
    }

    // TOML manifests: assignment lines inside dependency sections.
    if extension == "toml" {
        let mut count = 0;
        let mut in_deps_section = false;
        for line in content.split('\n').map(str::trim) {
            if line.contains("[dependencies]") || line.contains("[dev-dependencies]") {
                in_deps_section = true;
            } else if line.starts_with('[') && in_deps_section {
                in_deps_section = false;
            } else if in_deps_section && line.contains('=') && !line.starts_with('#') {
                count += 1;
            }
        }
        return count;
    }

    // go.mod: require-block lines terminated with a closing paren.
    if file_name == "go.mod" {
        return content
            .split('\n')
            .map(str::trim)
            .filter(|line| {
                !line.is_empty()
                    && !line.starts_with("//")
                    && !line.contains("require")
                    && !line.contains("module")
                    && !line.contains("go ")
                    && line.ends_with(')')
            })
            .count() as u64;
    }

    // pom.xml: plain tag count.
    if extension == "xml" {
        return content.matches("<dependency>").count() as u64;
    }

    // Gradle build scripts: configuration keyword lines.
    if file_name.contains("gradle") {
        return content
            .split('\n')
            .filter(|line| {
                line.contains("implementation") || line.contains("api") || line.contains("compile")
            })
            .count() as u64;
    }

    // Gemfile: gem declaration lines.
    if file_name.starts_with("Gemfile") {
        return content
            .split('\n')
            .map(str::trim)
            .filter(|line| line.starts_with("gem ") && line.contains('\''))
            .count() as u64;
    }

    // Generic YAML: colon-bearing entries not labeled "dependencies".
    if matches!(extension, "yaml" | "yml") {
        return content
            .split('\n')
            .map(str::trim)
            .filter(|line| {
                line.contains(':') && !line.starts_with('#') && !line.contains("dependencies")
            })
            .count() as u64;
    }

    0
}
