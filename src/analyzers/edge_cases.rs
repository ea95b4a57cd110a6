//! Edge-case handling analyzer.
//!
//! Credits validation, exception handling and boundary comparisons found
//! anywhere in the text. Applies to every language.

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Dimension, Outcome};

/// Baseline credit.
pub const BASE_SCORE: f64 = 75.0;

const VALIDATION_BONUS: f64 = 15.0;
const EXCEPTION_BONUS: f64 = 10.0;
const BOUNDARY_BONUS: f64 = 5.0;

/// Tokens that signal a guard when they appear with a conditional.
const GUARD_TOKENS: &[&str] = &["None", "null", "empty", "len("];

const BOUNDARY_OPERATORS: &[&str] = &[">=", "<=", "==", "!="];

/// Edge-case analyzer.
#[derive(Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score source text, returning the score and one note per bonus earned.
    pub fn score_source(&self, source: &str) -> (f64, Vec<String>) {
        let mut score = BASE_SCORE;
        let mut notes = Vec::new();

        if source.contains("if ") && GUARD_TOKENS.iter().any(|t| source.contains(t)) {
            score += VALIDATION_BONUS;
            notes.push("Validates inputs before use".to_string());
        }

        if source.contains("try") && source.contains("except") {
            score += EXCEPTION_BONUS;
            notes.push("Handles exceptions".to_string());
        }

        if BOUNDARY_OPERATORS.iter().any(|op| source.contains(op)) {
            score += BOUNDARY_BONUS;
            notes.push("Checks boundary conditions".to_string());
        }

        (score.min(100.0), notes)
    }
}

impl AnalyzerTrait for Analyzer {
    fn name(&self) -> &'static str {
        "edge-cases"
    }

    fn description(&self) -> &'static str {
        "Credit input validation, exception handling and boundary checks"
    }

    fn dimension(&self) -> Dimension {
        Dimension::EdgeCases
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Outcome {
        let (score, notes) = self.score_source(ctx.submission.source());
        tracing::debug!("Edge case score {score}");
        Outcome::with_notes(score, notes)
    }
}
