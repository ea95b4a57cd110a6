//! Node type tables for the structural and naming checks.

use crate::core::Language;

/// Node types that define a function.
pub fn function_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &["function_definition"],
        Language::Java | Language::Cpp | Language::C | Language::JavaScript => &[],
    }
}

/// Control-flow blocks that add one level of nesting.
///
/// `elif_clause` is handled separately: each `elif` nests one level below
/// the branch before it.
pub fn nesting_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &[
            "if_statement",
            "for_statement",
            "while_statement",
            "with_statement",
            "try_statement",
        ],
        Language::Java | Language::Cpp | Language::C | Language::JavaScript => &[],
    }
}

/// Productions the grammar keeps from Python 2 that Python 3 rejects.
pub fn legacy_node_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &["print_statement", "exec_statement", "<>"],
        Language::Java | Language::Cpp | Language::C | Language::JavaScript => &[],
    }
}

/// Numeric literal node types.
pub fn numeric_literal_types(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::Python => &["integer", "float"],
        Language::Java | Language::Cpp | Language::C | Language::JavaScript => &[],
    }
}

/// Identifier node type.
pub fn identifier_type(lang: Language) -> Option<&'static str> {
    match lang {
        Language::Python => Some("identifier"),
        Language::Java | Language::Cpp | Language::C | Language::JavaScript => None,
    }
}

/// Parameter list containers whose direct identifiers are declarations.
pub const PYTHON_PARAMETER_LISTS: &[&str] = &["parameters", "lambda_parameters"];

/// Single-character names conventionally fine as loop indices or coordinates.
pub const ALLOWED_SHORT_NAMES: &[&str] = &["i", "j", "k", "x", "y", "z"];
