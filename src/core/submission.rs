//! Submission and test case representation.

use serde::{Deserialize, Serialize};

use super::Language;

/// A code submission with its source text loaded.
///
/// Built once per evaluation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    source: String,
    language: Language,
}

impl Submission {
    /// Create a submission from source text and its declared language.
    pub fn new(source: impl Into<String>, language: Language) -> Self {
        Self {
            source: source.into(),
            language,
        }
    }

    /// The submitted source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The declared language tag.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Split into lines on `\n`, keeping a trailing empty line if the text ends with one.
    pub fn lines(&self) -> std::str::Split<'_, char> {
        self.source.split('\n')
    }

    /// Count total lines.
    pub fn total_lines(&self) -> usize {
        self.lines().count()
    }

    /// Count comment-only lines.
    pub fn comment_lines(&self) -> usize {
        self.language.count_comment_lines(self.lines())
    }
}

/// A literal test case: both sides are expressions in the submission's language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Expression exercising the submitted code, e.g. `add(2, 3)`.
    #[serde(
        rename = "function_call",
        alias = "invocation",
        alias = "invocation_expression"
    )]
    pub invocation: String,
    /// Expression producing the expected value, e.g. `5`.
    #[serde(rename = "expected", alias = "expected_expression")]
    pub expected: String,
}

impl TestCase {
    pub fn new(invocation: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            invocation: invocation.into(),
            expected: expected.into(),
        }
    }
}
