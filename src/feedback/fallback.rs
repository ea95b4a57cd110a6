//! Rule-based feedback keyed on score thresholds.

use std::collections::BTreeMap;

use super::Feedback;
use crate::core::Dimension;
use crate::score::DimensionScores;

/// Scores above this get the positive phrasing.
pub const POSITIVE_THRESHOLD: f64 = 70.0;

const SUGGESTIONS: [&str; 2] = [
    "Add more comments to explain complex logic",
    "Consider using more descriptive variable names",
];

const STRENGTHS: [&str; 2] = [
    "Code compiles and runs successfully",
    "Basic functionality is implemented",
];

/// (positive, negative) phrasing for a dimension.
fn phrases(dimension: Dimension) -> (&'static str, &'static str) {
    match dimension {
        Dimension::Correctness => ("Code passes most test cases", "Code fails several test cases"),
        Dimension::Quality => ("Good code structure", "Code quality needs improvement"),
        Dimension::Efficiency => ("Acceptable performance", "Algorithm could be more efficient"),
        Dimension::Readability => ("Code is readable", "Code readability could be improved"),
        Dimension::EdgeCases => ("Handles edge cases well", "Edge case handling needs work"),
    }
}

/// Deterministic feedback from the five scores alone.
pub fn generate(scores: &DimensionScores) -> Feedback {
    let feedback: BTreeMap<Dimension, Vec<String>> = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let (positive, negative) = phrases(dimension);
            let phrase = if scores.get(dimension) > POSITIVE_THRESHOLD {
                positive
            } else {
                negative
            };
            (dimension, vec![phrase.to_string()])
        })
        .collect();

    Feedback {
        feedback,
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        strengths: STRENGTHS.iter().map(|s| s.to_string()).collect(),
    }
}
