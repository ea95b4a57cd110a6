//! OpenAI-compatible chat completions feedback provider.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Feedback, FeedbackProvider, FeedbackRequest};
use crate::config::FeedbackConfig;
use crate::core::{Dimension, Error, Result};

/// Chat completions provider.
pub struct OpenAIProvider {
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f64,
    client: reqwest::blocking::Client,
}

impl OpenAIProvider {
    /// Create a new provider from configuration.
    pub fn new(config: &FeedbackConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::config(
                    "OpenAI API key not provided. Set OPENAI_API_KEY environment variable or provide feedback.api_key in config.",
                )
            })?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Prompt asking for JSON feedback on a scored submission.
pub fn build_prompt(request: &FeedbackRequest<'_>) -> String {
    let mut scores = String::new();
    for dimension in Dimension::ALL {
        scores.push_str(&format!(
            "- {}: {}/100\n",
            dimension.display_name(),
            request.scores.get(dimension)
        ));
    }

    format!(
        "Analyze this code submission and provide detailed feedback:\n\n\
         Problem Description: {problem}\n\n\
         Code:\n```\n{code}\n```\n\n\
         Current Scores:\n{scores}\n\
         Provide:\n\
         1. Specific feedback for each category\n\
         2. Actionable suggestions for improvement\n\
         3. Strengths of the current solution\n\n\
         Format as JSON with keys: feedback, suggestions, strengths. \
         \"feedback\" maps each of correctness, quality, efficiency, readability, \
         edge_cases to a list of strings; the other two are lists of strings.\n",
        problem = request.problem_description,
        code = request.source.trim_end(),
    )
}

impl FeedbackProvider for OpenAIProvider {
    fn generate(&self, request: &FeedbackRequest<'_>) -> Result<Feedback> {
        let prompt = build_prompt(request);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .map_err(|e| Error::feedback(format!("OpenAI API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(Error::feedback(format!("OpenAI API error ({status}): {body}")));
        }

        let response: ChatResponse = response
            .json()
            .map_err(|e| Error::feedback(format!("Failed to parse OpenAI response: {e}")))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::feedback("OpenAI response has no message content"))?;

        Feedback::parse(&content)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::DimensionScores;

    #[test]
    fn test_prompt_layout() {
        let scores = DimensionScores::new(100.0, 95.0, 85.0, 90.0, 80.0);
        let request = FeedbackRequest {
            source: "def add(a, b):\n    return a + b\n",
            problem_description: "Add two numbers",
            scores: &scores,
        };
        let prompt = build_prompt(&request);
        assert!(prompt.contains("Problem Description: Add two numbers"));
        assert!(prompt.contains("```\ndef add(a, b):\n    return a + b\n```"));
        assert!(prompt.contains("- Correctness: 100/100"));
        assert!(prompt.contains("- Edge Cases: 80/100"));
        assert!(prompt.contains("Format as JSON with keys: feedback, suggestions, strengths"));
    }

    #[test]
    fn test_explicit_key_used() {
        let config = FeedbackConfig {
            api_key: Some("sk-test".to_string()),
            ..FeedbackConfig::default()
        };
        let provider = OpenAIProvider::new(&config).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model, "gpt-4");
        assert_eq!(provider.temperature, 0.3);
    }

    #[test]
    fn test_unreachable_endpoint_is_feedback_error() {
        let config = FeedbackConfig {
            api_key: Some("sk-test".to_string()),
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout_secs: 2,
            ..FeedbackConfig::default()
        };
        let provider = OpenAIProvider::new(&config).unwrap();
        let scores = DimensionScores::default();
        let request = FeedbackRequest {
            source: "x = 1\n",
            problem_description: "",
            scores: &scores,
        };
        let err = provider.generate(&request).unwrap_err();
        assert!(matches!(err, Error::Feedback(_)));
    }
}
