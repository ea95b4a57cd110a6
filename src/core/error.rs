//! Error types for the critique library.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias using critique's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating a submission.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The submission reference could not be resolved to source text.
    #[error("Source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// Parse error from tree-sitter.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The test sandbox could not be started or read.
    #[error("Sandbox error: {0}")]
    Sandbox(String),

    /// The test sandbox exceeded its wall-clock budget.
    #[error("Sandbox timed out after {0:?}")]
    SandboxTimeout(Duration),

    /// The feedback service failed or returned an unusable payload.
    #[error("Feedback unavailable: {0}")]
    Feedback(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Create a new source-unavailable error.
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
        }
    }

    /// Create a new sandbox error.
    pub fn sandbox(message: impl Into<String>) -> Self {
        Self::Sandbox(message.into())
    }

    /// Create a new feedback error.
    pub fn feedback(message: impl Into<String>) -> Self {
        Self::Feedback(message.into())
    }

    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error must be reported to the caller instead of degrading a score.
    pub fn is_surfaced(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::Config(_) | Self::InvalidArgument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::source_unavailable("no such file");
        assert_eq!(err.to_string(), "Source unavailable: no such file");

        let err = Error::Parse {
            path: PathBuf::from("submission.py"),
            message: "unexpected indent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Parse error in submission.py: unexpected indent"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::SandboxTimeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Sandbox timed out after 10s");
    }

    #[test]
    fn test_surfaced_kinds() {
        assert!(Error::source_unavailable("x").is_surfaced());
        assert!(Error::config("x").is_surfaced());
        assert!(Error::InvalidArgument("x".into()).is_surfaced());
        assert!(!Error::sandbox("spawn failed").is_surfaced());
        assert!(!Error::feedback("quota").is_surfaced());
        assert!(!Error::SandboxTimeout(Duration::from_secs(1)).is_surfaced());
    }
}
