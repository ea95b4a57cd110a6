//! Analyzer trait and common types.

use serde::{Deserialize, Serialize};

use super::{Dimension, Submission, TestCase};
use crate::config::Config;
use crate::score::clamp_score;

/// Trait implemented by every dimension analyzer.
///
/// Analyzers hold no mutable state: running one twice on the same context
/// yields the same outcome, and any number of them may run concurrently.
pub trait Analyzer: Send + Sync {
    /// Unique identifier for this analyzer.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// The dimension this analyzer scores.
    fn dimension(&self) -> Dimension;

    /// Score the submission in the context.
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Outcome;
}

/// Context shared by all analyzers during one evaluation.
#[derive(Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// The submission under evaluation.
    pub submission: &'a Submission,
    /// Caller supplied test cases (may be empty).
    pub test_cases: &'a [TestCase],
    /// Configuration.
    pub config: &'a Config,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new analysis context.
    pub fn new(submission: &'a Submission, test_cases: &'a [TestCase], config: &'a Config) -> Self {
        Self {
            submission,
            test_cases,
            config,
        }
    }
}

/// Result of scoring one dimension.
///
/// Failures are explicit variants so a caller cannot mistake a failed
/// analysis for a low score it computed itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The dimension was scored. `notes` explain the deductions.
    Scored { score: f64, notes: Vec<String> },
    /// The source did not parse; the dimension scores zero.
    ParseFailure { message: String },
    /// The test sandbox could not run; the dimension scores zero.
    SandboxFailure { message: String },
}

impl Outcome {
    /// A scored outcome without notes.
    pub fn scored(score: f64) -> Self {
        Self::Scored {
            score,
            notes: Vec::new(),
        }
    }

    /// A scored outcome with notes.
    pub fn with_notes(score: f64, notes: Vec<String>) -> Self {
        Self::Scored { score, notes }
    }

    /// The dimension score, clamped to [0, 100]. Failures score zero.
    pub fn score(&self) -> f64 {
        match self {
            Self::Scored { score, .. } => clamp_score(*score),
            Self::ParseFailure { .. } | Self::SandboxFailure { .. } => 0.0,
        }
    }

    /// Notes attached to the outcome; failures report their message.
    pub fn notes(&self) -> Vec<String> {
        match self {
            Self::Scored { notes, .. } => notes.clone(),
            Self::ParseFailure { message } => vec![format!("Parse failure: {message}")],
            Self::SandboxFailure { message } => vec![format!("Sandbox failure: {message}")],
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Scored { .. })
    }
}
