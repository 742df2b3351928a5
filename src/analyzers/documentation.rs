//! Documentation token analyzer.
//!
//! Counts whitespace-separated tokens across prose files: anything with a
//! documentation extension, anything named `README*`, and documentation
//! files living under a docs-style directory. Files with zero tokens exist
//! on disk but contribute nothing.

use std::path::Path;

use walkdir::WalkDir;

use super::Analyzer;
use crate::core::{AnalyzerReport, DocFileRecord, DocumentationMetrics, Result};

/// Extensions treated as documentation.
const DOC_EXTENSIONS: &[&str] = &["md", "rst", "txt", "adoc", "asciidoc"];

/// Directory names that mark a docs tree (substring match on the relative
/// parent path, lowercased).
const DOC_DIRS: &[&str] = &["docs", "doc", "documentation", "wiki"];

/// Directories never descended into, in addition to dot-directories.
const SKIP_DIRS: &[&str] = &["node_modules", "vendor", "__pycache__"];

/// How many of the largest files to keep in the summary list.
const LARGEST_FILES_LIMIT: usize = 10;

#[derive(Default)]
pub struct DocumentationAnalyzer;

impl DocumentationAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

fn extension_of(file_name: &str) -> Option<&str> {
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

fn is_documentation_file(file_name: &str, relative_parent: &str) -> bool {
    let ext_is_doc = extension_of(file_name)
        .map(|e| DOC_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);
    if ext_is_doc {
        return true;
    }
    if file_name.to_uppercase().starts_with("README") {
        return true;
    }
    // Inside a docs directory only documentation extensions qualify, so this
    // arm never widens the set beyond the extension rule; kept for clarity of
    // the selection contract.
    let parent = relative_parent.to_lowercase();
    DOC_DIRS.iter().any(|d| parent.contains(d)) && ext_is_doc
}

impl Analyzer for DocumentationAnalyzer {
    fn name(&self) -> &'static str {
        "documentation_tokens"
    }

    fn analyze(&self, repo_root: &Path) -> Result<AnalyzerReport> {
        if !repo_root.is_dir() {
            return Ok(AnalyzerReport::failed(format!(
                "repository root does not exist: {}",
                repo_root.display()
            )));
        }

        let mut metrics = DocumentationMetrics::default();

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

        for entry in walker.flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let relative = entry
                .path()
                .strip_prefix(repo_root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            let relative_parent = Path::new(&relative)
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();

            if !is_documentation_file(&file_name, &relative_parent) {
                continue;
            }

            let Ok(bytes) = std::fs::read(entry.path()) else {
                continue;
            };
            let content = String::from_utf8_lossy(&bytes);

            let tokens = content.split_whitespace().count() as u64;
            if tokens == 0 {
                continue;
            }
            let characters = content.chars().count() as u64;
            let lines = content.split('\n').count() as u64;

            // Extensionless files (a bare README) keep an empty type key.
            let kind = extension_of(&file_name)
                .map(|e| format!(".{}", e.to_lowercase()))
                .unwrap_or_default();

            metrics.total_doc_files += 1;
            metrics.total_tokens += tokens;
            metrics.total_characters += characters;
            metrics.total_lines += lines;

            let breakdown = metrics.doc_files_by_type.entry(kind.clone()).or_default();
            breakdown.files += 1;
            breakdown.tokens += tokens;

            metrics.documentation_files.push(DocFileRecord {
                path: relative,
                tokens,
                characters,
                lines,
                kind,
            });
        }

        if metrics.total_doc_files > 0 {
            metrics.average_tokens_per_file =
                metrics.total_tokens as f64 / metrics.total_doc_files as f64;
        }

        // Stable sort by token count, largest first, then keep the top slice.
        let mut largest = metrics.documentation_files.clone();
        largest.sort_by(|a, b| b.tokens.cmp(&a.tokens));
        largest.truncate(LARGEST_FILES_LIMIT);
        metrics.largest_doc_files = largest;

        Ok(AnalyzerReport::Documentation(metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(dir: &TempDir) -> DocumentationMetrics {
        match DocumentationAnalyzer::new().analyze(dir.path()).unwrap() {
            AnalyzerReport::Documentation(m) => m,
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_counts_tokens_characters_and_lines() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("guide.md"), "hello world\nsecond line\n").unwrap();

        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 1);
        assert_eq!(metrics.total_tokens, 4);
        assert_eq!(metrics.total_characters, 24);
        // Trailing newline yields a final empty segment.
        assert_eq!(metrics.total_lines, 3);
    }

    #[test]
    fn test_readme_without_extension_is_documentation() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README"), "project overview here").unwrap();

        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 1);
        assert_eq!(metrics.documentation_files[0].kind, "");
        assert_eq!(metrics.doc_files_by_type[""].files, 1);
    }

    #[test]
    fn test_readme_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("readme.unknownext"), "words here").unwrap();

        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 1);
    }

    #[test]
    fn test_non_doc_files_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join("notes.md"), "kept").unwrap();

        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 1);
        assert_eq!(metrics.documentation_files[0].path, "notes.md");
    }

    #[test]
    fn test_empty_doc_files_excluded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("empty.md"), "").unwrap();
        std::fs::write(dir.path().join("blank.md"), "   \n\t\n").unwrap();
        std::fs::write(dir.path().join("real.md"), "one").unwrap();

        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 1);
        assert_eq!(metrics.average_tokens_per_file, 1.0);
    }

    #[test]
    fn test_average_is_zero_with_no_files() {
        let dir = TempDir::new().unwrap();
        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 0);
        assert_eq!(metrics.average_tokens_per_file, 0.0);
    }

    #[test]
    fn test_largest_files_capped_at_ten() {
        let dir = TempDir::new().unwrap();
        for i in 0..12 {
            let body = "word ".repeat(i + 1);
            std::fs::write(dir.path().join(format!("doc{i:02}.md")), body).unwrap();
        }

        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 12);
        assert_eq!(metrics.largest_doc_files.len(), 10);
        assert_eq!(metrics.largest_doc_files[0].tokens, 12);
        assert_eq!(metrics.largest_doc_files[9].tokens, 3);
        // Full list remains untruncated.
        assert_eq!(metrics.documentation_files.len(), 12);
    }

    #[test]
    fn test_largest_files_ties_keep_encounter_order() {
        let dir = TempDir::new().unwrap();
        // a.md and b.md tie at two tokens; c.md is strictly larger.
        std::fs::write(dir.path().join("a.md"), "one two").unwrap();
        std::fs::write(dir.path().join("b.md"), "three four").unwrap();
        std::fs::write(dir.path().join("c.md"), "v w x y z").unwrap();

        let metrics = run(&dir);
        let paths: Vec<_> = metrics
            .largest_doc_files
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        // The walk visits a.md before b.md, and a stable sort keeps that
        // order for the tied pair.
        assert_eq!(paths, vec!["c.md", "a.md", "b.md"]);
    }

    #[test]
    fn test_breakdown_by_type() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "one two").unwrap();
        std::fs::write(dir.path().join("b.MD"), "three").unwrap();
        std::fs::write(dir.path().join("c.rst"), "four five six").unwrap();

        let metrics = run(&dir);
        assert_eq!(metrics.doc_files_by_type[".md"].files, 2);
        assert_eq!(metrics.doc_files_by_type[".md"].tokens, 3);
        assert_eq!(metrics.doc_files_by_type[".rst"].tokens, 3);
    }

    #[test]
    fn test_hidden_directories_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".github")).unwrap();
        std::fs::write(dir.path().join(".github/PULL_REQUEST_TEMPLATE.md"), "x").unwrap();
        std::fs::write(dir.path().join("CHANGELOG.md"), "entry").unwrap();

        let metrics = run(&dir);
        assert_eq!(metrics.total_doc_files, 1);
        assert_eq!(metrics.documentation_files[0].path, "CHANGELOG.md");
    }

    #[test]
    fn test_missing_root_reports_error_as_data() {
        let report = DocumentationAnalyzer::new()
            .analyze(Path::new("/nonexistent/repo"))
            .unwrap();
        assert!(report.is_failed());
    }
}
