//! Structural quality analyzer.
//!
//! Parses the submission and looks for three kinds of issue:
//!
//! - functions spanning more than 50 lines,
//! - magic numbers (numeric literals above 10, one issue per occurrence),
//! - control flow nested deeper than 4 levels (one issue for the whole file).
//!
//! Every issue deducts 5 points from 100. A submission that does not parse
//! scores zero.

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Dimension, Language, Outcome, Result};
use crate::parser::queries::{nesting_node_types, numeric_literal_types};
use crate::parser::{self, ParseResult, Parser};
use crate::score::clamp_score;

/// Longest function span (end line - start line) that is not flagged.
pub const MAX_FUNCTION_SPAN: u32 = 50;

/// Deepest control-flow nesting that is not flagged.
pub const MAX_NESTING_DEPTH: u32 = 4;

/// Numeric literals with a magnitude above this are magic numbers.
pub const MAGIC_NUMBER_LIMIT: f64 = 10.0;

/// Points deducted per issue.
pub const ISSUE_WEIGHT: f64 = 5.0;

/// Structural quality analyzer.
pub struct Analyzer {
    parser: Parser,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create a new structural analyzer.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Find structural issues in source text.
    ///
    /// Returns `Error::Parse` when the source has syntax errors. Languages
    /// without a grammar produce no issues.
    pub fn find_issues(&self, source: &str, language: Language) -> Result<Vec<Issue>> {
        if !language.is_executable() {
            return Ok(Vec::new());
        }
        let result = self.parser.parse_strict(source, language)?;
        Ok(analyze_parse_result(&result))
    }
}

impl AnalyzerTrait for Analyzer {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn description(&self) -> &'static str {
        "Detect long functions, magic numbers and deep nesting"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Quality
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Outcome {
        let language = ctx.submission.language();
        if !language.is_executable() {
            return Outcome::with_notes(
                100.0,
                vec![format!("Structural analysis is not available for {language}")],
            );
        }

        match self.find_issues(ctx.submission.source(), language) {
            Ok(issues) => {
                let score = score_issues(&issues);
                tracing::debug!("Structural analysis: {} issues, score {score}", issues.len());
                Outcome::with_notes(score, issues.into_iter().map(|i| i.description).collect())
            }
            Err(e) => {
                tracing::debug!("Structural analysis failed to parse: {e}");
                Outcome::ParseFailure {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Kind of structural issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    LongFunction,
    MagicNumber,
    DeepNesting,
}

/// A single structural finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub description: String,
    /// Points deducted for this issue.
    pub severity_weight: f64,
    /// Line the issue was found on (1-indexed).
    pub line: u32,
}

impl Issue {
    fn new(kind: IssueKind, description: String, line: u32) -> Self {
        Self {
            kind,
            description,
            severity_weight: ISSUE_WEIGHT,
            line,
        }
    }
}

/// Score a list of issues: 100 minus every issue's weight, clamped.
pub fn score_issues(issues: &[Issue]) -> f64 {
    let deducted: f64 = issues.iter().map(|i| i.severity_weight).sum();
    clamp_score(100.0 - deducted)
}

fn analyze_parse_result(result: &ParseResult) -> Vec<Issue> {
    let mut issues = Vec::new();

    for func in parser::extract_functions(result) {
        let span = func.span();
        if span > MAX_FUNCTION_SPAN {
            issues.push(Issue::new(
                IssueKind::LongFunction,
                format!("Function '{}' is too long ({span} lines)", func.name),
                func.start_line,
            ));
        }
    }

    collect_magic_numbers(result.root_node(), result, &mut issues);

    let nesting_types = nesting_node_types(result.language);
    let depth = calculate_max_nesting(result.root_node(), nesting_types, 0);
    if depth > MAX_NESTING_DEPTH {
        issues.push(Issue::new(
            IssueKind::DeepNesting,
            format!("Code has deep nesting (depth: {depth})"),
            1,
        ));
    }

    issues
}

fn collect_magic_numbers(node: Node<'_>, result: &ParseResult, issues: &mut Vec<Issue>) {
    if numeric_literal_types(result.language).contains(&node.kind()) {
        let text = result.node_text(&node);
        if let Some(value) = numeric_value(text) {
            if is_magic_number(value) {
                let line = node.start_position().row as u32 + 1;
                issues.push(Issue::new(
                    IssueKind::MagicNumber,
                    format!("Magic number {text} found at line {line} - consider using named constants"),
                    line,
                ));
            }
        }
        return;
    }

    for child in node.children(&mut node.walk()) {
        collect_magic_numbers(child, result, issues);
    }
}

/// A literal is magic when it is not -1, 0 or 1 and its magnitude exceeds 10.
pub fn is_magic_number(value: f64) -> bool {
    value != -1.0 && value != 0.0 && value != 1.0 && value.abs() > MAGIC_NUMBER_LIMIT
}

/// Numeric value of a Python literal. Imaginary literals have none.
fn numeric_value(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();

    if cleaned.ends_with('j') {
        return None;
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = cleaned.strip_prefix(prefix) {
            // Too large for u128 is still a (very) magic number.
            return Some(
                u128::from_str_radix(digits, radix)
                    .map(|v| v as f64)
                    .unwrap_or(f64::INFINITY),
            );
        }
    }

    cleaned.parse::<f64>().ok()
}

/// Maximum control-flow nesting depth below `node`.
///
/// `elif` behaves like an `if` nested in the previous branch's else, so an
/// if/elif chain nests one level per `elif`, and a trailing `else` sits at
/// the depth of the last `elif`.
fn calculate_max_nesting(node: Node<'_>, nesting_types: &[&str], depth: u32) -> u32 {
    let kind = node.kind();
    let depth = if nesting_types.contains(&kind) {
        depth + 1
    } else {
        depth
    };

    let mut max_depth = depth;
    let mut chain_depth = depth;
    for child in node.children(&mut node.walk()) {
        let child_max = match (kind, child.kind()) {
            ("if_statement", "elif_clause") => {
                chain_depth += 1;
                max_nesting_of_children(child, nesting_types, chain_depth)
            }
            ("if_statement", "else_clause") => {
                max_nesting_of_children(child, nesting_types, chain_depth)
            }
            _ => calculate_max_nesting(child, nesting_types, depth),
        };
        max_depth = max_depth.max(child_max);
    }
    max_depth
}

fn max_nesting_of_children(node: Node<'_>, nesting_types: &[&str], depth: u32) -> u32 {
    node.children(&mut node.walk())
        .map(|child| calculate_max_nesting(child, nesting_types, depth))
        .fold(depth, u32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::Submission;

    fn analyze(code: &str) -> Outcome {
        let submission = Submission::new(code, Language::Python);
        let config = Config::default();
        let ctx = AnalysisContext::new(&submission, &[], &config);
        Analyzer::new().analyze(&ctx)
    }

    fn function_with_body_lines(lines: usize) -> String {
        let mut code = String::from("def long_function():\n");
        for _ in 0..lines {
            code.push_str("    value = 1\n");
        }
        code
    }

    fn kinds(code: &str) -> Vec<IssueKind> {
        Analyzer::new()
            .find_issues(code, Language::Python)
            .unwrap()
            .into_iter()
            .map(|i| i.kind)
            .collect()
    }

    #[test]
    fn test_clean_code_scores_full() {
        let outcome = analyze("def add(a, b):\n    return a + b\n");
        assert_eq!(outcome.score(), 100.0);
        assert!(outcome.notes().is_empty());
    }

    #[test]
    fn test_function_of_51_lines_is_flagged() {
        let issues = Analyzer::new()
            .find_issues(&function_with_body_lines(51), Language::Python)
            .unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::LongFunction);
        assert_eq!(
            issues[0].description,
            "Function 'long_function' is too long (51 lines)"
        );
    }

    #[test]
    fn test_function_of_50_lines_is_not_flagged() {
        assert!(kinds(&function_with_body_lines(50)).is_empty());
    }

    #[test]
    fn test_magic_numbers_counted_per_occurrence() {
        let code = "a = 42\nb = 42\nc = 3\nd = 10\ne = 10.5\n";
        let found = kinds(code);
        assert_eq!(found, vec![IssueKind::MagicNumber; 3]);
        assert_eq!(analyze(code).score(), 85.0);
    }

    #[test]
    fn test_magic_number_literal_forms() {
        assert_eq!(kinds("a = -20\n"), vec![IssueKind::MagicNumber]);
        assert_eq!(kinds("a = 0xFF\n"), vec![IssueKind::MagicNumber]);
        assert_eq!(kinds("a = 1_000\n"), vec![IssueKind::MagicNumber]);
        assert_eq!(kinds("a = 1e3\n"), vec![IssueKind::MagicNumber]);
        assert!(kinds("a = 20j\n").is_empty());
        assert!(kinds("a = 0.5\n").is_empty());
        assert!(kinds("a = True\n").is_empty());
    }

    #[test]
    fn test_is_magic_number() {
        assert!(!is_magic_number(0.0));
        assert!(!is_magic_number(1.0));
        assert!(!is_magic_number(-1.0));
        assert!(!is_magic_number(10.0));
        assert!(is_magic_number(11.0));
        assert!(is_magic_number(-11.0));
    }

    #[test]
    fn test_deep_nesting_flagged_once() {
        let code = "\
def f(a):
    if a:
        for i in a:
            while i:
                with open('f') as fh:
                    try:
                        pass
                    except Exception:
                        pass
";
        let issues = Analyzer::new().find_issues(code, Language::Python).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].description, "Code has deep nesting (depth: 5)");
    }

    #[test]
    fn test_depth_four_is_not_flagged() {
        let code = "\
def f(a):
    if a:
        for i in a:
            while i:
                with open('f') as fh:
                    pass
";
        assert!(kinds(code).is_empty());
    }

    #[test]
    fn test_elif_chain_nests() {
        let code = "\
def grade(s):
    if s == 'a':
        return 'A'
    elif s == 'b':
        return 'B'
    elif s == 'c':
        return 'C'
    elif s == 'd':
        return 'D'
    elif s == 'e':
        return 'E'
    else:
        return 'F'
";
        assert_eq!(kinds(code), vec![IssueKind::DeepNesting]);
    }

    #[test]
    fn test_comprehensions_do_not_nest() {
        let code = "\
def f(rows):
    if rows:
        for r in rows:
            while r:
                r = [c for c in r if c for d in c if d]
";
        assert!(kinds(code).is_empty());
    }

    #[test]
    fn test_syntax_error_is_parse_failure() {
        let outcome = analyze("def broken(:\n    return 1\n");
        assert!(matches!(outcome, Outcome::ParseFailure { .. }));
        assert_eq!(outcome.score(), 0.0);
    }

    #[test]
    fn test_python2_statements_are_parse_failures() {
        for code in ["def f():\n    print \"hello\"\n", "exec \"x = 1\"\n"] {
            let outcome = analyze(code);
            assert!(matches!(outcome, Outcome::ParseFailure { .. }), "{code}");
            assert_eq!(outcome.score(), 0.0);
        }
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let code: String = (0..30).map(|n| format!("v{n} = {}\n", 100 + n)).collect();
        assert_eq!(analyze(&code).score(), 0.0);
    }

    #[test]
    fn test_tag_only_language_scores_full() {
        let submission = Submission::new("int main() { return 42; }", Language::C);
        let config = Config::default();
        let ctx = AnalysisContext::new(&submission, &[], &config);
        assert_eq!(Analyzer::new().analyze(&ctx).score(), 100.0);
    }

    #[test]
    fn test_idempotent() {
        let code = "def f():\n    return 99\n";
        let analyzer = Analyzer::new();
        let submission = Submission::new(code, Language::Python);
        let config = Config::default();
        let ctx = AnalysisContext::new(&submission, &[], &config);
        assert_eq!(analyzer.analyze(&ctx), analyzer.analyze(&ctx));
    }
}
