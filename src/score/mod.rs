//! Score aggregation: clamping, weighting and grading.

use serde::{Deserialize, Serialize};

use crate::config::{Thresholds, Weights};
use crate::core::Dimension;

/// Clamp a dimension score into [0, 100]. NaN collapses to zero.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Round to one decimal place, ties to even.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// The five dimension scores of one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub correctness: f64,
    pub quality: f64,
    pub efficiency: f64,
    pub readability: f64,
    pub edge_cases: f64,
}

impl DimensionScores {
    /// Build from raw scores, clamping each one.
    pub fn new(
        correctness: f64,
        quality: f64,
        efficiency: f64,
        readability: f64,
        edge_cases: f64,
    ) -> Self {
        Self {
            correctness: clamp_score(correctness),
            quality: clamp_score(quality),
            efficiency: clamp_score(efficiency),
            readability: clamp_score(readability),
            edge_cases: clamp_score(edge_cases),
        }
    }

    /// Score for one dimension.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Correctness => self.correctness,
            Dimension::Quality => self.quality,
            Dimension::Efficiency => self.efficiency,
            Dimension::Readability => self.readability,
            Dimension::EdgeCases => self.edge_cases,
        }
    }

    /// Set one dimension, clamping the value.
    pub fn set(&mut self, dimension: Dimension, score: f64) {
        let score = clamp_score(score);
        match dimension {
            Dimension::Correctness => self.correctness = score,
            Dimension::Quality => self.quality = score,
            Dimension::Efficiency => self.efficiency = score,
            Dimension::Readability => self.readability = score,
            Dimension::EdgeCases => self.edge_cases = score,
        }
    }

    /// Weighted overall score, rounded to one decimal place.
    pub fn overall(&self, weights: &Weights) -> f64 {
        let weighted_sum: f64 = Dimension::ALL
            .iter()
            .map(|d| clamp_score(self.get(*d)) * weights.get(*d))
            .sum();
        round_to_tenth(weighted_sum)
    }
}

/// Overall score band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl Grade {
    /// Band an overall score using the configured thresholds.
    pub fn from_score(score: f64, thresholds: &Thresholds) -> Self {
        if score >= thresholds.excellent {
            Self::Excellent
        } else if score >= thresholds.good {
            Self::Good
        } else if score >= thresholds.fair {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs improvement",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(score: f64) -> DimensionScores {
        DimensionScores::new(score, score, score, score, score)
    }

    #[test]
    fn test_overall_of_uniform_scores() {
        let weights = Weights::default();
        assert_eq!(uniform(100.0).overall(&weights), 100.0);
        assert_eq!(uniform(0.0).overall(&weights), 0.0);
        assert_eq!(uniform(85.0).overall(&weights), 85.0);
    }

    #[test]
    fn test_overall_weighted_sum() {
        let scores = DimensionScores::new(66.7, 95.0, 80.0, 90.0, 100.0);
        // 20.01 + 23.75 + 16.0 + 13.5 + 10.0 = 83.26
        assert_eq!(scores.overall(&Weights::default()), 83.3);
    }

    #[test]
    fn test_scores_are_clamped() {
        let scores = DimensionScores::new(150.0, -20.0, f64::NAN, 50.0, 100.0);
        assert_eq!(scores.correctness, 100.0);
        assert_eq!(scores.quality, 0.0);
        assert_eq!(scores.efficiency, 0.0);

        let mut scores = DimensionScores::default();
        scores.set(Dimension::Readability, 240.0);
        assert_eq!(scores.get(Dimension::Readability), 100.0);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(2.0 / 3.0 * 100.0), 66.7);
        assert_eq!(round_to_tenth(85.04), 85.0);
        assert_eq!(round_to_tenth(0.0), 0.0);
    }

    #[test]
    fn test_round_to_tenth_ties_to_even() {
        assert_eq!(round_to_tenth(0.25), 0.2);
        assert_eq!(round_to_tenth(0.75), 0.8);
        assert_eq!(round_to_tenth(87.25), 87.2);
    }

    #[test]
    fn test_overall_tie_rounds_to_even() {
        // 25.5 + 23.75 + 17.0 + 13.5 + 7.5 = 87.25
        let scores = DimensionScores::new(85.0, 95.0, 85.0, 90.0, 75.0);
        assert_eq!(scores.overall(&Weights::default()), 87.2);
    }

    #[test]
    fn test_grade_bands() {
        let thresholds = Thresholds::default();
        assert_eq!(Grade::from_score(95.0, &thresholds), Grade::Excellent);
        assert_eq!(Grade::from_score(90.0, &thresholds), Grade::Excellent);
        assert_eq!(Grade::from_score(80.0, &thresholds), Grade::Good);
        assert_eq!(Grade::from_score(60.0, &thresholds), Grade::Fair);
        assert_eq!(Grade::from_score(59.9, &thresholds), Grade::NeedsImprovement);
    }
}
