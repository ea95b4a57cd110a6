//! Categorized feedback for an evaluated submission.
//!
//! Feedback comes from a pluggable [`FeedbackProvider`] (an OpenAI-compatible
//! chat model by default). Any provider failure, including a reply that does
//! not have the expected shape, falls back to the rule-based generator in
//! [`fallback`], so feedback generation itself never fails.

pub mod fallback;
pub mod openai;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::FeedbackConfig;
use crate::core::{Dimension, Error, Result};
use crate::score::DimensionScores;

pub use openai::OpenAIProvider;

/// Feedback per dimension plus general suggestions and strengths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback: BTreeMap<Dimension, Vec<String>>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
}

/// Everything a provider sees about one submission.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackRequest<'a> {
    pub source: &'a str,
    pub problem_description: &'a str,
    pub scores: &'a DimensionScores,
}

/// Trait for feedback providers.
pub trait FeedbackProvider: Send + Sync {
    /// Produce validated feedback for a request.
    fn generate(&self, request: &FeedbackRequest<'_>) -> Result<Feedback>;

    /// Get the provider name for logging/debugging.
    fn name(&self) -> &str;
}

/// Wire shape of a provider reply before validation.
#[derive(Deserialize)]
struct RawFeedback {
    #[serde(default)]
    feedback: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    strengths: Vec<String>,
}

impl Feedback {
    /// Parse and validate a JSON reply.
    ///
    /// A surrounding Markdown code fence is ignored. Category keys are matched
    /// case-insensitively against dimension keys, with spaces read as
    /// underscores; an unknown category or a reply with no content is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawFeedback = serde_json::from_str(strip_code_fence(text))
            .map_err(|e| Error::feedback(format!("malformed feedback JSON: {e}")))?;

        let mut feedback = BTreeMap::new();
        for (key, items) in raw.feedback {
            let normalized = key.trim().to_lowercase().replace([' ', '-'], "_");
            let dimension = Dimension::from_key(&normalized)
                .ok_or_else(|| Error::feedback(format!("unknown feedback category '{key}'")))?;
            feedback
                .entry(dimension)
                .or_insert_with(Vec::new)
                .extend(items);
        }

        let parsed = Self {
            feedback,
            suggestions: raw.suggestions,
            strengths: raw.strengths,
        };
        if parsed.is_empty() {
            return Err(Error::feedback("feedback reply has no content"));
        }
        Ok(parsed)
    }

    pub fn is_empty(&self) -> bool {
        self.feedback.values().all(Vec::is_empty)
            && self.suggestions.is_empty()
            && self.strengths.is_empty()
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Build the configured provider, if feedback is enabled and a key is available.
pub fn provider_from_config(config: &FeedbackConfig) -> Option<Box<dyn FeedbackProvider>> {
    if !config.enabled {
        return None;
    }
    match OpenAIProvider::new(config) {
        Ok(provider) => Some(Box::new(provider)),
        Err(e) => {
            tracing::debug!("Feedback service disabled: {e}");
            None
        }
    }
}

/// Ask `provider` for feedback, falling back to the rule-based generator.
pub fn generate(provider: Option<&dyn FeedbackProvider>, request: &FeedbackRequest<'_>) -> Feedback {
    let Some(provider) = provider else {
        return fallback::generate(request.scores);
    };
    match provider.generate(request) {
        Ok(feedback) => feedback,
        Err(e) => {
            tracing::warn!("Feedback from {} unavailable, using fallback: {e}", provider.name());
            fallback::generate(request.scores)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(std::result::Result<&'static str, &'static str>);

    impl FeedbackProvider for FixedProvider {
        fn generate(&self, _request: &FeedbackRequest<'_>) -> Result<Feedback> {
            match self.0 {
                Ok(text) => Feedback::parse(text),
                Err(message) => Err(Error::feedback(message)),
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn request(scores: &DimensionScores) -> FeedbackRequest<'_> {
        FeedbackRequest {
            source: "x = 1\n",
            problem_description: "",
            scores,
        }
    }

    #[test]
    fn test_parse_valid_reply() {
        let text = r#"{
            "feedback": {"correctness": ["All tests pass"], "Edge Cases": ["Handles None"]},
            "suggestions": ["Use a set"],
            "strengths": ["Clear names"]
        }"#;
        let feedback = Feedback::parse(text).unwrap();
        assert_eq!(feedback.feedback[&Dimension::Correctness], vec!["All tests pass"]);
        assert_eq!(feedback.feedback[&Dimension::EdgeCases], vec!["Handles None"]);
        assert_eq!(feedback.suggestions, vec!["Use a set"]);
        assert_eq!(feedback.strengths, vec!["Clear names"]);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let text = "```json\n{\"suggestions\": [\"Add tests\"]}\n```";
        let feedback = Feedback::parse(text).unwrap();
        assert_eq!(feedback.suggestions, vec!["Add tests"]);
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        assert!(Feedback::parse("not json").is_err());
        assert!(Feedback::parse(r#"{"feedback": {"correctness": "fine"}}"#).is_err());
        assert!(Feedback::parse(r#"{"feedback": {"style": ["ok"]}}"#).is_err());
        assert!(Feedback::parse(r#"{"suggestions": "none"}"#).is_err());
        assert!(Feedback::parse("{}").is_err());
    }

    #[test]
    fn test_serializes_dimension_keys() {
        let mut feedback = Feedback::default();
        feedback
            .feedback
            .insert(Dimension::EdgeCases, vec!["ok".to_string()]);
        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json["feedback"]["edge_cases"][0], "ok");
    }

    #[test]
    fn test_generate_uses_provider() {
        let scores = DimensionScores::new(100.0, 100.0, 100.0, 100.0, 100.0);
        let provider = FixedProvider(Ok(r#"{"strengths": ["Fast"]}"#));
        let feedback = generate(Some(&provider), &request(&scores));
        assert_eq!(feedback.strengths, vec!["Fast"]);
    }

    #[test]
    fn test_generate_falls_back_on_error() {
        let scores = DimensionScores::new(100.0, 100.0, 100.0, 100.0, 100.0);
        let provider = FixedProvider(Err("quota exceeded"));
        let feedback = generate(Some(&provider), &request(&scores));
        assert_eq!(feedback, fallback::generate(&scores));
    }

    #[test]
    fn test_generate_falls_back_on_malformed_reply() {
        let scores = DimensionScores::new(10.0, 10.0, 10.0, 10.0, 10.0);
        let provider = FixedProvider(Ok("I'm sorry, I can't do that."));
        let feedback = generate(Some(&provider), &request(&scores));
        assert_eq!(feedback, fallback::generate(&scores));
    }

    #[test]
    fn test_generate_without_provider() {
        let scores = DimensionScores::default();
        assert_eq!(generate(None, &request(&scores)), fallback::generate(&scores));
    }

    #[test]
    fn test_disabled_config_has_no_provider() {
        let config = FeedbackConfig {
            enabled: false,
            api_key: Some("sk-test".to_string()),
            ..FeedbackConfig::default()
        };
        assert!(provider_from_config(&config).is_none());
    }
}
