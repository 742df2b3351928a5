//! Per-language node-type tables for function extraction and decision counting.

use crate::core::Language;

/// Node types that define a function or method.
pub fn function_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &["function_declaration", "method_declaration"],
        Language::Rust => &["function_item"],
        Language::Python => &["function_definition"],
        Language::TypeScript | Language::JavaScript => &[
            "function_declaration",
            "method_definition",
            "arrow_function",
        ],
        Language::Java => &["method_declaration", "constructor_declaration"],
        Language::C | Language::Cpp => &["function_definition"],
        Language::Ruby => &["method", "singleton_method"],
    }
}

/// Decision point node types for cyclomatic complexity.
///
/// Each decision point adds one independent path per McCabe's methodology;
/// a function starts at complexity 1.
pub fn decision_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Go => &[
            "if_statement",
            "for_statement",
            "select_statement",
            "type_switch_statement",
            "expression_switch_statement",
            "expression_case",
        ],
        Language::Rust => &[
            "if_expression",
            "match_expression",
            "for_expression",
            // while_expression covers both `while cond` and `while let` in
            // tree-sitter-rust 0.23+.
            "while_expression",
            "loop_expression",
        ],
        Language::Python => &[
            "if_statement",
            "for_statement",
            "while_statement",
            "with_statement",
            "try_statement",
            "elif_clause",
            "except_clause",
            "list_comprehension",
            "set_comprehension",
            "dictionary_comprehension",
            "generator_expression",
            "conditional_expression",
        ],
        Language::TypeScript | Language::JavaScript => &[
            "if_statement",
            "for_statement",
            "for_in_statement",
            "while_statement",
            "do_statement",
            "switch_statement",
            "ternary_expression",
            "catch_clause",
            "switch_case",
        ],
        Language::Java => &[
            "if_statement",
            "for_statement",
            "enhanced_for_statement",
            "while_statement",
            "do_statement",
            "switch_statement",
            "switch_expression",
            "catch_clause",
            "conditional_expression",
        ],
        Language::C | Language::Cpp => &[
            "if_statement",
            "for_statement",
            "while_statement",
            "do_statement",
            "switch_statement",
            "case_statement",
            "conditional_expression",
        ],
        Language::Ruby => &[
            "if",
            "unless",
            "while",
            "until",
            "for",
            "case",
            "when",
            "rescue",
            "elsif",
            "conditional",
        ],
    }
}
