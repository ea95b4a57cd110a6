//! Core types and traits for submission evaluation.

mod analyzer;
mod content_source;
mod dimension;
mod error;
mod language;
mod submission;

pub use analyzer::{AnalysisContext, Analyzer, Outcome};
pub use content_source::{
    is_github_url, parse_github_url, ContentSource, FilesystemSource, GitHubFile, GitHubSource,
    SourceResolver,
};
pub use dimension::Dimension;
pub use error::{Error, Result};
pub use language::Language;
pub use submission::{Submission, TestCase};
