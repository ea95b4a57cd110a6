//! Readability analyzer: line length, comment density and naming.

use tree_sitter::Node;

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Dimension, Language, Outcome};
use crate::parser::queries::{identifier_type, ALLOWED_SHORT_NAMES, PYTHON_PARAMETER_LISTS};
use crate::parser::{ParseResult, Parser};
use crate::score::clamp_score;

/// Lines longer than this many characters are penalized.
pub const MAX_LINE_LENGTH: usize = 100;

/// Minimum share of comment-only lines.
pub const MIN_COMMENT_RATIO: f64 = 0.10;

const LONG_LINE_PENALTY: f64 = 2.0;
const COMMENT_PENALTY: f64 = 10.0;
const SHORT_NAME_PENALTY: f64 = 2.0;

/// Readability analyzer.
pub struct Analyzer {
    parser: Parser,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Score source text, returning the score and a note per kind of deduction.
    pub fn score_source(&self, source: &str, language: Language) -> (f64, Vec<String>) {
        let mut score = 100.0;
        let mut notes = Vec::new();
        let lines: Vec<&str> = source.split('\n').collect();

        let long_lines = lines
            .iter()
            .filter(|line| line.chars().count() > MAX_LINE_LENGTH)
            .count();
        if long_lines > 0 {
            score -= long_lines as f64 * LONG_LINE_PENALTY;
            notes.push(format!(
                "{long_lines} line(s) longer than {MAX_LINE_LENGTH} characters"
            ));
        }

        let comment_lines = language.count_comment_lines(lines.iter().copied());
        let comment_ratio = comment_lines as f64 / lines.len().max(1) as f64;
        if comment_ratio < MIN_COMMENT_RATIO {
            score -= COMMENT_PENALTY;
            notes.push(format!(
                "Only {:.0}% of lines are comments",
                comment_ratio * 100.0
            ));
        }

        // The naming check is best effort: without a clean parse it is skipped.
        if language.is_executable() {
            if let Ok(result) = self.parser.parse_strict(source, language) {
                let short_names = short_identifier_references(&result);
                if !short_names.is_empty() {
                    score -= short_names.len() as f64 * SHORT_NAME_PENALTY;
                    notes.push(format!(
                        "Single-character names used {} time(s): {}",
                        short_names.len(),
                        summarize_names(&short_names)
                    ));
                }
            }
        }

        (clamp_score(score), notes)
    }
}

impl AnalyzerTrait for Analyzer {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn description(&self) -> &'static str {
        "Score line length, comment density and identifier naming"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Readability
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Outcome {
        let (score, notes) =
            self.score_source(ctx.submission.source(), ctx.submission.language());
        tracing::debug!("Readability score {score}");
        Outcome::with_notes(score, notes)
    }
}

/// Every single-character name reference outside the allowed set, in source order.
fn short_identifier_references(result: &ParseResult) -> Vec<String> {
    let mut names = Vec::new();
    let Some(identifier) = identifier_type(result.language) else {
        return names;
    };

    fn visit(node: Node<'_>, result: &ParseResult, identifier: &str, names: &mut Vec<String>) {
        if node.kind() == identifier {
            let text = result.node_text(&node);
            if text.chars().count() == 1
                && !ALLOWED_SHORT_NAMES.contains(&text)
                && is_name_reference(node)
            {
                names.push(text.to_string());
            }
            return;
        }
        for child in node.children(&mut node.walk()) {
            visit(child, result, identifier, names);
        }
    }

    visit(result.root_node(), result, identifier, &mut names);
    names
}

/// Whether an identifier is a variable reference or binding, as opposed to a
/// declaration name, parameter, attribute, keyword or import path.
fn is_name_reference(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    let is_field = |field: &str| parent.child_by_field_name(field) == Some(node);

    match parent.kind() {
        "function_definition" | "class_definition" => !is_field("name"),
        "default_parameter" | "typed_default_parameter" | "keyword_argument" => !is_field("name"),
        "attribute" => !is_field("attribute"),
        "typed_parameter" => false,
        kind if PYTHON_PARAMETER_LISTS.contains(&kind) => false,
        "list_splat_pattern" | "dictionary_splat_pattern" => !parent
            .parent()
            .is_some_and(|p| PYTHON_PARAMETER_LISTS.contains(&p.kind()) || p.kind() == "typed_parameter"),
        "dotted_name" | "aliased_import" | "global_statement" | "nonlocal_statement" => false,
        "as_pattern_target" => !is_except_alias(parent),
        "except_clause" => !node.prev_sibling().is_some_and(|s| s.kind() == "as"),
        _ => true,
    }
}

/// `except E as e` binds a plain name, not a variable reference.
fn is_except_alias(target: Node<'_>) -> bool {
    let mut current = target.parent();
    while let Some(node) = current {
        match node.kind() {
            "except_clause" => return true,
            "block" | "module" => return false,
            _ => current = node.parent(),
        }
    }
    false
}

fn summarize_names(names: &[String]) -> String {
    let mut unique: Vec<&str> = names.iter().map(String::as_str).collect();
    unique.sort_unstable();
    unique.dedup();
    unique.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(code: &str) -> f64 {
        Analyzer::new().score_source(code, Language::Python).0
    }

    /// Prefix enough comment lines to avoid the density penalty.
    fn commented(code: &str) -> String {
        format!("# comment\n# comment\n# comment\n{code}")
    }

    #[test]
    fn test_well_commented_code_scores_full() {
        let code = commented("def add(first, second):\n    return first + second\n");
        assert_eq!(score(&code), 100.0);
    }

    #[test]
    fn test_missing_comments_penalized() {
        assert_eq!(score("def add(first, second):\n    return first + second\n"), 90.0);
    }

    #[test]
    fn test_comment_ratio_counts_every_line() {
        // 1 comment out of 10 lines (trailing newline adds an empty line) = 0.10
        let code = format!("# note\n{}", "value = 1\n".repeat(8));
        assert_eq!(score(&code), 100.0);

        // 1 of 11 is below 0.10
        let code = format!("# note\n{}", "value = 1\n".repeat(9));
        assert_eq!(score(&code), 90.0);
    }

    #[test]
    fn test_long_lines_penalized() {
        let long = format!("value = '{}'\n", "a".repeat(120));
        let code = commented(&format!("{long}{long}"));
        assert_eq!(score(&code), 96.0);
    }

    #[test]
    fn test_line_length_counts_characters() {
        let line = format!("# {}\n", "é".repeat(98));
        assert_eq!(score(&line), 100.0);
    }

    #[test]
    fn test_short_names_penalized_per_reference() {
        // `a` bound once and read once, `b` bound once
        let code = commented("a = 1\nb = a\n");
        assert_eq!(score(&code), 94.0);
    }

    #[test]
    fn test_allowed_short_names() {
        let code = commented("for i in range(3):\n    x = i\n    y = x\n    z = y\n");
        assert_eq!(score(&code), 100.0);
    }

    #[test]
    fn test_declarations_are_not_references() {
        let code = commented(
            "import os as o\n\ndef f(a, b=2, *c, **d):\n    return obj.e\n\nclass C:\n    pass\n\nprint(sep=None)\n",
        );
        // `f`, `C`, params, attribute `e` and import alias are not counted
        assert_eq!(score(&code), 100.0);
    }

    #[test]
    fn test_except_alias_not_counted() {
        let code = commented("try:\n    pass\nexcept ValueError as e:\n    pass\n");
        assert_eq!(score(&code), 100.0);
    }

    #[test]
    fn test_parse_failure_skips_naming() {
        let code = commented("a = (\nb = a\n");
        assert_eq!(score(&code), 100.0);
    }

    #[test]
    fn test_python2_print_skips_naming() {
        let code = commented("b = 1\nprint b\n");
        assert_eq!(score(&code), 100.0);
    }

    #[test]
    fn test_other_languages_skip_naming() {
        let code = "// c\n// c\nint a = 1;\nint b = a;\n";
        let (score, _) = Analyzer::new().score_source(code, Language::C);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_score_clamped() {
        let code = "q = 1\n".repeat(80);
        assert_eq!(score(&code), 0.0);
    }
}
