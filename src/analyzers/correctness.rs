//! Correctness analyzer: runs the caller's test cases in the sandbox.

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Dimension, Error, Outcome};
use crate::sandbox::{Harness, HarnessReport};
use crate::score::round_to_tenth;

/// Score used when no test cases are supplied.
pub const NO_TESTS_SCORE: f64 = 85.0;

/// Correctness analyzer.
#[derive(Default)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score a harness report: the pass rate rounded to one decimal.
    pub fn score_report(report: &HarnessReport) -> f64 {
        report
            .pass_rate()
            .map(round_to_tenth)
            .unwrap_or(NO_TESTS_SCORE)
    }
}

impl AnalyzerTrait for Analyzer {
    fn name(&self) -> &'static str {
        "correctness"
    }

    fn description(&self) -> &'static str {
        "Run test cases against the submission in a time-bounded interpreter"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Correctness
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Outcome {
        if ctx.test_cases.is_empty() {
            return Outcome::with_notes(
                NO_TESTS_SCORE,
                vec!["No test cases supplied".to_string()],
            );
        }

        let harness = Harness::new(&ctx.config.sandbox);
        let report = match harness.run(
            ctx.submission.source(),
            ctx.submission.language(),
            ctx.test_cases,
        ) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Test harness failed: {e}");
                return Outcome::SandboxFailure {
                    message: e.to_string(),
                };
            }
        };

        let score = Self::score_report(&report);
        tracing::debug!(
            "Correctness {score} ({}/{} passed)",
            report.passed,
            report.total
        );

        let mut notes = vec![format!("{}/{} tests passed", report.passed, report.total)];
        if !ctx.submission.language().is_executable() {
            notes.push(format!(
                "Tests are not executed for {}",
                ctx.submission.language().display_name()
            ));
        }
        if report.timed_out {
            notes.push(format!(
                "{}; unreported tests counted as failed",
                Error::SandboxTimeout(harness.timeout())
            ));
        }
        Outcome::with_notes(score, notes)
    }
}
