//! Code complexity analyzer.
//!
//! Walks the repository tree, feeds every source file through the
//! tree-sitter complexity facility, and rolls per-function cyclomatic
//! complexity up into file, extension and repository totals. Functions above
//! the fixed threshold are kept in a flat list sorted descending by
//! complexity (stable, so ties keep discovery order).

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::Analyzer;
use crate::complexity::Inspector;
use crate::core::{
    AnalyzedFile, AnalyzerReport, CodeComplexityMetrics, HighComplexityFunction, Result,
};

/// Directories never descended into, in addition to dot-directories.
const SKIP_DIRS: &[&str] = &["node_modules", "vendor", "__pycache__"];

/// Extensions that are never source code.
const NON_SOURCE_EXTENSIONS: &[&str] = &["md", "txt", "json", "xml", "yaml", "yml", "lock"];

/// Functions above this cyclomatic complexity are reported individually.
const HIGH_COMPLEXITY_THRESHOLD: u64 = 10;

pub struct CodeComplexityAnalyzer {
    exclude_patterns: Vec<String>,
    inspector: Inspector,
}

impl CodeComplexityAnalyzer {
    pub fn new(exclude_patterns: Vec<String>) -> Self {
        Self {
            exclude_patterns,
            inspector: Inspector::new(),
        }
    }

    /// Exclusion is a substring match against the repo-relative path, after
    /// stripping wildcard-slash tokens from the configured pattern.
    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude_patterns.iter().any(|pattern| {
            let stripped = pattern.replace("*/", "");
            relative.contains(&stripped)
        })
    }

    fn candidate_files(&self, repo_root: &Path) -> Vec<PathBuf> {
        let walker = WalkDir::new(repo_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !name.starts_with('.') && !SKIP_DIRS.contains(&name.as_ref())
            });

        let mut files = Vec::new();
        for entry in walker.flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if NON_SOURCE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    continue;
                }
            }
            let relative = relative_path(path, repo_root);
            if self.is_excluded(&relative) {
                continue;
            }
            files.push(path.to_path_buf());
        }
        files
    }
}

impl Analyzer for CodeComplexityAnalyzer {
    fn name(&self) -> &'static str {
        "code_complexity"
    }

    fn analyze(&self, repo_root: &Path) -> Result<AnalyzerReport> {
        if !repo_root.is_dir() {
            return Ok(AnalyzerReport::failed(format!(
                "repository root does not exist: {}",
                repo_root.display()
            )));
        }

        let files = self.candidate_files(repo_root);

        // Per-file parsing is a pure read, so fan it out; collect preserves
        // walk order, which the stable hot-function sort depends on.
        let analyses: Vec<_> = files
            .par_iter()
            .map(|path| (path, self.inspector.analyze_file(path).ok()))
            .collect();

        let mut metrics = CodeComplexityMetrics::default();

        for (path, analysis) in analyses {
            let Some(analysis) = analysis else {
                // Unreadable, unparsable or unsupported file: skipped silently.
                continue;
            };
            if analysis.functions.is_empty() {
                continue;
            }

            let relative = relative_path(path, repo_root);
            metrics.total_files += 1;

            let mut file_complexity = 0u64;
            for func in &analysis.functions {
                metrics.total_functions += 1;
                file_complexity += func.cyclomatic;
                metrics.total_complexity += func.cyclomatic;
                metrics.max_complexity = metrics.max_complexity.max(func.cyclomatic);

                if func.cyclomatic > HIGH_COMPLEXITY_THRESHOLD {
                    metrics.high_complexity_functions.push(HighComplexityFunction {
                        file: relative.clone(),
                        function: func.name.clone(),
                        complexity: func.cyclomatic,
                        lines: func.lines,
                    });
                }
            }

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default();
            let breakdown = metrics.complexity_by_language.entry(ext).or_default();
            breakdown.files += 1;
            breakdown.functions += analysis.functions.len() as u64;
            breakdown.total_complexity += file_complexity;

            metrics.total_lines_of_code += analysis.lines_of_code;
            metrics.files_analyzed.push(AnalyzedFile {
                path: relative,
                functions: analysis.functions.len() as u64,
                complexity: file_complexity,
                lines: analysis.lines_of_code,
            });
        }

        if metrics.total_functions > 0 {
            metrics.average_complexity =
                metrics.total_complexity as f64 / metrics.total_functions as f64;
        }

        // Stable sort: ties keep discovery order.
        metrics
            .high_complexity_functions
            .sort_by(|a, b| b.complexity.cmp(&a.complexity));

        Ok(AnalyzerReport::CodeComplexity(metrics))
    }
}

fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(dir: &TempDir, patterns: Vec<String>) -> CodeComplexityMetrics {
        let analyzer = CodeComplexityAnalyzer::new(patterns);
        match analyzer.analyze(dir.path()).unwrap() {
            AnalyzerReport::CodeComplexity(m) => m,
            other => panic!("unexpected report: {other:?}"),
        }
    }

    /// Builds a Python function with `decisions` sequential if-statements,
    /// i.e. cyclomatic complexity `decisions + 1`.
    fn python_function(name: &str, decisions: usize) -> String {
        let mut src = format!("def {name}(x):\n");
        for i in 0..decisions {
            src.push_str(&format!("    if x > {i}:\n        x -= 1\n"));
        }
        src.push_str("    return x\n");
        src
    }

    #[test]
    fn test_missing_root_reports_error_as_data() {
        let analyzer = CodeComplexityAnalyzer::new(Vec::new());
        let report = analyzer.analyze(Path::new("/nonexistent/repo")).unwrap();
        assert!(report.is_failed());
    }

    #[test]
    fn test_empty_repository_has_zero_average() {
        let dir = TempDir::new().unwrap();
        let metrics = run(&dir, Vec::new());
        assert_eq!(metrics.total_functions, 0);
        assert_eq!(metrics.average_complexity, 0.0);
        assert_eq!(metrics.max_complexity, 0);
    }

    #[test]
    fn test_counts_functions_and_complexity() {
        let dir = TempDir::new().unwrap();
        let mut src = python_function("simple", 0);
        src.push_str(&python_function("branchy", 2));
        std::fs::write(dir.path().join("app.py"), src).unwrap();

        let metrics = run(&dir, Vec::new());
        assert_eq!(metrics.total_files, 1);
        assert_eq!(metrics.total_functions, 2);
        // 1 + 3
        assert_eq!(metrics.total_complexity, 4);
        assert_eq!(metrics.max_complexity, 3);
        assert!((metrics.average_complexity - 2.0).abs() < f64::EPSILON);

        let breakdown = &metrics.complexity_by_language[".py"];
        assert_eq!(breakdown.files, 1);
        assert_eq!(breakdown.functions, 2);
        assert_eq!(breakdown.total_complexity, 4);
    }

    #[test]
    fn test_high_complexity_functions_sorted_descending() {
        let dir = TempDir::new().unwrap();
        // Complexities 12 and 15; both above the threshold of 10.
        std::fs::write(dir.path().join("a.py"), python_function("medium", 11)).unwrap();
        std::fs::write(dir.path().join("b.py"), python_function("worst", 14)).unwrap();

        let metrics = run(&dir, Vec::new());
        let complexities: Vec<u64> = metrics
            .high_complexity_functions
            .iter()
            .map(|f| f.complexity)
            .collect();
        assert_eq!(complexities, vec![15, 12]);
        assert_eq!(metrics.high_complexity_functions[0].function, "worst");
    }

    #[test]
    fn test_high_complexity_ties_keep_discovery_order() {
        let dir = TempDir::new().unwrap();
        // Both functions land at complexity 12; the walk visits a.py first.
        std::fs::write(dir.path().join("a.py"), python_function("first", 11)).unwrap();
        std::fs::write(dir.path().join("b.py"), python_function("second", 11)).unwrap();
        std::fs::write(dir.path().join("c.py"), python_function("worst", 14)).unwrap();

        let metrics = run(&dir, Vec::new());
        let names: Vec<_> = metrics
            .high_complexity_functions
            .iter()
            .map(|f| f.function.as_str())
            .collect();
        assert_eq!(names, vec!["worst", "first", "second"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let dir = TempDir::new().unwrap();
        // Exactly 10 is not reported; 11 is.
        std::fs::write(dir.path().join("a.py"), python_function("at_ten", 9)).unwrap();
        std::fs::write(dir.path().join("b.py"), python_function("over", 10)).unwrap();

        let metrics = run(&dir, Vec::new());
        assert_eq!(metrics.high_complexity_functions.len(), 1);
        assert_eq!(metrics.high_complexity_functions[0].function, "over");
    }

    #[test]
    fn test_skips_hidden_and_vendor_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        std::fs::write(
            dir.path().join(".hidden/a.py"),
            python_function("hidden", 0),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("node_modules/b.py"),
            python_function("vendored", 0),
        )
        .unwrap();
        std::fs::write(dir.path().join("c.py"), python_function("kept", 0)).unwrap();

        let metrics = run(&dir, Vec::new());
        assert_eq!(metrics.total_files, 1);
        assert_eq!(metrics.files_analyzed[0].path, "c.py");
    }

    #[test]
    fn test_exclude_pattern_substring_match() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("legacy")).unwrap();
        std::fs::write(
            dir.path().join("legacy/old.py"),
            python_function("old", 0),
        )
        .unwrap();
        std::fs::write(dir.path().join("new.py"), python_function("new", 0)).unwrap();

        let metrics = run(&dir, vec!["*/legacy".to_string()]);
        assert_eq!(metrics.total_files, 1);
        assert_eq!(metrics.files_analyzed[0].path, "new.py");
    }

    #[test]
    fn test_non_source_extensions_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "def f():\n    pass\n").unwrap();
        std::fs::write(dir.path().join("data.json"), "{}").unwrap();

        let metrics = run(&dir, Vec::new());
        assert_eq!(metrics.total_files, 0);
    }

    #[test]
    fn test_files_without_functions_not_counted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("constants.py"), "X = 1\nY = 2\n").unwrap();

        let metrics = run(&dir, Vec::new());
        assert_eq!(metrics.total_files, 0);
        assert_eq!(metrics.total_lines_of_code, 0);
    }
}
