//! Evaluation orchestration.
//!
//! The [`Evaluator`] resolves a submission reference, runs every dimension
//! analyzer in parallel, aggregates the weighted score and attaches
//! feedback. Analyzer failures degrade their own dimension only; the sole
//! errors surfaced to the caller are unresolvable sources and bad input.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analyzers;
use crate::config::Config;
use crate::core::{
    AnalysisContext, Analyzer, ContentSource, Dimension, Error, Language, Outcome, Result,
    SourceResolver, Submission, TestCase,
};
use crate::feedback::{self, FeedbackProvider, FeedbackRequest};
use crate::score::{DimensionScores, Grade};

/// Final result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    overall_score: f64,
    correctness_score: f64,
    quality_score: f64,
    efficiency_score: f64,
    readability_score: f64,
    edge_cases_score: f64,
    feedback: BTreeMap<Dimension, Vec<String>>,
    suggestions: Vec<String>,
    strengths: Vec<String>,
    grade: Grade,
    language: Language,
    /// Per-dimension outcome with the notes behind each score.
    details: BTreeMap<Dimension, Outcome>,
}

impl EvaluationResult {
    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    /// The five dimension scores.
    pub fn scores(&self) -> DimensionScores {
        DimensionScores {
            correctness: self.correctness_score,
            quality: self.quality_score,
            efficiency: self.efficiency_score,
            readability: self.readability_score,
            edge_cases: self.edge_cases_score,
        }
    }

    pub fn score(&self, dimension: Dimension) -> f64 {
        self.scores().get(dimension)
    }

    pub fn feedback(&self) -> &BTreeMap<Dimension, Vec<String>> {
        &self.feedback
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn strengths(&self) -> &[String] {
        &self.strengths
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn details(&self) -> &BTreeMap<Dimension, Outcome> {
        &self.details
    }
}

/// Static analysis of a submission: every dimension except correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub language: Language,
    pub total_lines: usize,
    pub comment_lines: usize,
    pub outcomes: BTreeMap<Dimension, Outcome>,
}

impl AnalysisReport {
    pub fn score(&self, dimension: Dimension) -> Option<f64> {
        self.outcomes.get(&dimension).map(Outcome::score)
    }
}

/// Response envelope: `{success: true, result}` or `{success: false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Evaluates submissions against an injected configuration.
pub struct Evaluator {
    config: Config,
    source: Box<dyn ContentSource>,
    feedback: Option<Box<dyn FeedbackProvider>>,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Evaluator {
    /// Create an evaluator with the default source resolver and the
    /// configured feedback service.
    pub fn new(config: Config) -> Result<Self> {
        let source = SourceResolver::new(&config.source)?;
        let feedback = feedback::provider_from_config(&config.feedback);
        Self::with_parts(config, Box::new(source), feedback)
    }

    /// Create an evaluator from explicit collaborators.
    pub fn with_parts(
        config: Config,
        source: Box<dyn ContentSource>,
        feedback: Option<Box<dyn FeedbackProvider>>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            feedback,
            analyzers: analyzers::all(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve `reference` to source text and evaluate it.
    pub fn evaluate(
        &self,
        reference: &str,
        problem_description: &str,
        test_cases: &[TestCase],
        language: Language,
    ) -> Result<EvaluationResult> {
        if reference.trim().is_empty() {
            return Err(Error::InvalidArgument("no code provided".to_string()));
        }
        let source = self.source.resolve(reference)?;
        let submission = Submission::new(source, language);
        Ok(self.evaluate_submission(&submission, problem_description, test_cases))
    }

    /// Evaluate already resolved source text. Never fails: analyzer problems
    /// lower the affected dimension instead.
    pub fn evaluate_submission(
        &self,
        submission: &Submission,
        problem_description: &str,
        test_cases: &[TestCase],
    ) -> EvaluationResult {
        let start = Instant::now();
        let ctx = AnalysisContext::new(submission, test_cases, &self.config);

        let details = run_analyzers(&self.analyzers, &ctx);
        let mut scores = DimensionScores::default();
        for (dimension, outcome) in &details {
            scores.set(*dimension, outcome.score());
        }
        let overall_score = scores.overall(&self.config.weights);

        let request = FeedbackRequest {
            source: submission.source(),
            problem_description,
            scores: &scores,
        };
        let feedback = feedback::generate(self.feedback.as_deref(), &request);

        tracing::info!(
            "Evaluated {} submission: overall {overall_score} in {:?}",
            submission.language(),
            start.elapsed()
        );

        EvaluationResult {
            overall_score,
            correctness_score: scores.correctness,
            quality_score: scores.quality,
            efficiency_score: scores.efficiency,
            readability_score: scores.readability,
            edge_cases_score: scores.edge_cases,
            feedback: feedback.feedback,
            suggestions: feedback.suggestions,
            strengths: feedback.strengths,
            grade: Grade::from_score(overall_score, &self.config.thresholds),
            language: submission.language(),
            details,
        }
    }

    /// Resolve `reference` and score the static dimensions only.
    pub fn analyze(&self, reference: &str, language: Language) -> Result<AnalysisReport> {
        if reference.trim().is_empty() {
            return Err(Error::InvalidArgument("no code provided".to_string()));
        }
        let source = self.source.resolve(reference)?;
        Ok(analyze_submission(&Submission::new(source, language), &self.config))
    }
}

/// Score the static dimensions of a submission.
pub fn analyze_submission(submission: &Submission, config: &Config) -> AnalysisReport {
    let ctx = AnalysisContext::new(submission, &[], config);
    AnalysisReport {
        language: submission.language(),
        total_lines: submission.total_lines(),
        comment_lines: submission.comment_lines(),
        outcomes: run_analyzers(&analyzers::static_only(), &ctx),
    }
}

fn run_analyzers(
    analyzers: &[Box<dyn Analyzer>],
    ctx: &AnalysisContext<'_>,
) -> BTreeMap<Dimension, Outcome> {
    analyzers
        .par_iter()
        .map(|analyzer| {
            let outcome = analyzer.analyze(ctx);
            if outcome.is_failure() {
                tracing::warn!("{} analyzer failed: {:?}", analyzer.name(), outcome.notes());
            }
            (analyzer.dimension(), outcome)
        })
        .collect()
}
