//! Efficiency analyzer.
//!
//! A text heuristic, not a cost model. Starting from 85 it deducts for:
//!
//! - many `for`/`while` keywords (their counts multiplied exceed 2),
//! - string building with `+=`,
//! - `append` calls within the 9 lines following each `for` line.

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Dimension, Language, Outcome};
use crate::score::clamp_score;

/// Score before any deduction.
pub const BASE_SCORE: f64 = 85.0;

const LOOP_PRODUCT_LIMIT: usize = 2;
const LOOP_PENALTY: f64 = 15.0;
const CONCAT_PENALTY: f64 = 10.0;
const APPEND_PENALTY: f64 = 5.0;

/// Lines scanned after each loop line for an append call.
pub const APPEND_WINDOW: usize = 9;

/// Efficiency analyzer.
#[derive(Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score source text, returning the score and a note per deduction.
    pub fn score_source(&self, source: &str, language: Language) -> (f64, Vec<String>) {
        let mut score = BASE_SCORE;
        let mut notes = Vec::new();

        if language != Language::Python {
            return (score, notes);
        }

        let for_count = source.matches("for ").count();
        let while_count = source.matches("while ").count();
        if for_count * while_count > LOOP_PRODUCT_LIMIT {
            score -= LOOP_PENALTY;
            notes.push(format!(
                "Heavy loop usage ({for_count} for / {while_count} while) suggests nested loops"
            ));
        }

        if source.contains("+=") && source.contains("str") {
            score -= CONCAT_PENALTY;
            notes.push("Possible string concatenation with += inside a loop".to_string());
        }

        if source.contains("append") && source.contains("for ") {
            let lines: Vec<&str> = source.split('\n').collect();
            for (i, line) in lines.iter().enumerate() {
                if !line.contains("for ") {
                    continue;
                }
                let window_end = (i + 1 + APPEND_WINDOW).min(lines.len());
                if let Some(offset) = lines[i + 1..window_end]
                    .iter()
                    .position(|l| l.contains("append"))
                {
                    score -= APPEND_PENALTY;
                    notes.push(format!(
                        "append at line {} inside loop at line {} - consider a comprehension",
                        i + 2 + offset,
                        i + 1
                    ));
                }
            }
        }

        (clamp_score(score), notes)
    }
}

impl AnalyzerTrait for Analyzer {
    fn name(&self) -> &'static str {
        "efficiency"
    }

    fn description(&self) -> &'static str {
        "Flag loop-heavy code, string concatenation and appends in loops"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Efficiency
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Outcome {
        let (score, notes) =
            self.score_source(ctx.submission.source(), ctx.submission.language());
        tracing::debug!("Efficiency score {score} ({} deductions)", notes.len());
        Outcome::with_notes(score, notes)
    }
}
