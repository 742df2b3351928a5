//! Cyclomatic complexity facility built on tree-sitter.
//!
//! This is the pluggable function-counting collaborator the code complexity
//! analyzer wraps: given a source file it yields per-function cyclomatic
//! complexity (1 + decision points, per McCabe) and non-blank line counts.
//! Languages without a shipped grammar are reported as unsupported and the
//! caller skips them.

pub mod queries;

use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;
use tree_sitter::{Language as TsLanguage, Node, Parser as TsParser};

use crate::core::{Error, Language, Result};

/// Maximum file size to analyze (1MB). Larger files are likely minified bundles.
const MAX_FILE_SIZE: u64 = 1_000_000;

/// Per-function complexity measurement.
#[derive(Debug, Clone)]
pub struct FunctionMetrics {
    /// Function name, or `(anonymous)` when the grammar has none.
    pub name: String,
    /// 1-indexed start line.
    pub start_line: u32,
    /// Cyclomatic complexity (1 + decision points).
    pub cyclomatic: u64,
    /// Non-blank lines within the function span.
    pub lines: u64,
}

/// Result of inspecting one source file.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    pub functions: Vec<FunctionMetrics>,
    /// Non-blank lines in the whole file.
    pub lines_of_code: u64,
}

/// Thread-safe inspector with cached per-language parsers.
pub struct Inspector {
    parsers: Mutex<HashMap<Language, TsParser>>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Inspect a file on disk.
    pub fn analyze_file(&self, path: &Path) -> Result<FileAnalysis> {
        if let Ok(metadata) = std::fs::metadata(path) {
            if metadata.len() > MAX_FILE_SIZE {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    message: format!(
                        "File too large: {} bytes (max {MAX_FILE_SIZE})",
                        metadata.len()
                    ),
                });
            }
        }
        let language = Language::detect(path).ok_or_else(|| Error::UnsupportedLanguage {
            path: path.to_path_buf(),
        })?;
        let content = std::fs::read(path)?;
        self.analyze_source(&content, language, path)
    }

    /// Inspect source content with an explicit language.
    pub fn analyze_source(
        &self,
        content: &[u8],
        lang: Language,
        path: &Path,
    ) -> Result<FileAnalysis> {
        let ts_lang = tree_sitter_language(lang);

        let tree = {
            let mut parsers = self.parsers.lock();
            let parser = parsers.entry(lang).or_insert_with(|| {
                let mut p = TsParser::new();
                p.set_language(&ts_lang).expect("language should be valid");
                p
            });

            parser.parse(content, None).ok_or_else(|| Error::Parse {
                path: path.to_path_buf(),
                message: "Failed to parse file".to_string(),
            })?
        };

        let text = String::from_utf8_lossy(content);
        let lines: Vec<&str> = text.split('\n').collect();

        let function_types = queries::function_node_types(lang);
        let decision_types = queries::decision_node_types(lang);

        let mut functions = Vec::new();
        collect_functions(
            tree.root_node(),
            content,
            &lines,
            function_types,
            decision_types,
            &mut functions,
        );

        let lines_of_code = lines.iter().filter(|l| !l.trim().is_empty()).count() as u64;

        Ok(FileAnalysis {
            functions,
            lines_of_code,
        })
    }
}

/// Map a detected language to its grammar.
fn tree_sitter_language(lang: Language) -> TsLanguage {
    match lang {
        Language::Go => tree_sitter_go::LANGUAGE.into(),
        Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::C => tree_sitter_c::LANGUAGE.into(),
        Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        Language::Ruby => tree_sitter_ruby::LANGUAGE.into(),
    }
}

fn collect_functions(
    node: Node<'_>,
    source: &[u8],
    lines: &[&str],
    function_types: &[&str],
    decision_types: &[&str],
    out: &mut Vec<FunctionMetrics>,
) {
    if function_types.contains(&node.kind()) {
        let start = node.start_position().row;
        let end = node.end_position().row;
        let nloc = lines
            .iter()
            .skip(start)
            .take(end - start + 1)
            .filter(|l| !l.trim().is_empty())
            .count() as u64;

        out.push(FunctionMetrics {
            name: function_name(&node, source),
            start_line: start as u32 + 1,
            cyclomatic: 1 + count_decisions(node, function_types, decision_types),
            lines: nloc,
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_functions(child, source, lines, function_types, decision_types, out);
    }
}

fn function_name(node: &Node<'_>, source: &[u8]) -> String {
    if let Some(name) = node
        .child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())
    {
        return name.to_string();
    }
    // Some grammars (e.g. JS method definitions) use a bare identifier child.
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(
            child.kind(),
            "identifier" | "property_identifier" | "field_identifier"
        ) {
            if let Ok(name) = child.utf8_text(source) {
                return name.to_string();
            }
        }
    }
    "(anonymous)".to_string()
}

/// Count decision points in a function subtree.
///
/// Stops at nested function definitions: their decisions belong to the
/// innermost enclosing function only.
fn count_decisions(node: Node<'_>, function_types: &[&str], decision_types: &[&str]) -> u64 {
    let mut count = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if function_types.contains(&child.kind()) {
            continue;
        }
        if decision_types.contains(&child.kind()) {
            count += 1;
        }
        count += count_decisions(child, function_types, decision_types);
    }
    count
}
