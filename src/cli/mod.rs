//! CLI implementation using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::{Error, Language, Result};
use crate::output::Format;

/// Critique - Multi-dimensional code submission evaluator.
#[derive(Parser)]
#[command(name = "critique")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a submission on all five dimensions
    #[command(alias = "eval")]
    Evaluate(EvaluateArgs),

    /// Score the static dimensions only (no test run, no feedback)
    Analyze(SourceArgs),

    /// Print the default configuration
    Init,
}

/// Where the submission comes from.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SubmissionInput {
    /// Submission: literal code, a local path or a GitHub file URL
    #[arg(long)]
    pub code: Option<String>,

    /// Read the submission from a local file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct SourceArgs {
    #[command(flatten)]
    pub input: SubmissionInput,

    /// Submission language (python, java, cpp, c, javascript); detected from
    /// the file extension when omitted
    #[arg(short, long)]
    pub language: Option<Language>,
}

#[derive(Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// JSON file with test cases: [{"function_call": "...", "expected": "..."}]
    #[arg(short, long)]
    pub tests: Option<PathBuf>,

    /// Problem description passed to the feedback service
    #[arg(short, long, default_value = "")]
    pub problem: String,
}

impl SourceArgs {
    /// The reference handed to the source resolver.
    ///
    /// A `--file` that does not exist is an error rather than literal text.
    pub fn reference(&self) -> Result<String> {
        match (&self.input.code, &self.input.file) {
            (Some(code), _) => Ok(code.clone()),
            (None, Some(path)) if path.is_file() => Ok(path.display().to_string()),
            (None, Some(path)) => Err(Error::source_unavailable(format!(
                "file not found: {}",
                path.display()
            ))),
            (None, None) => Err(Error::InvalidArgument("no code provided".to_string())),
        }
    }

    /// Explicit language, else detected from `--file`, else Python.
    pub fn language(&self) -> Language {
        self.language
            .or_else(|| self.input.file.as_deref().and_then(Language::detect))
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Text => Format::Text,
        }
    }
}
