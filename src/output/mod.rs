//! Output formatters for evaluation results.
//!
//! JSON output wraps results in the `{success, result}` / `{success, error}`
//! envelope. Markdown and text are for people.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::core::{Dimension, Outcome, Result};
use crate::engine::{AnalysisReport, ApiResponse, EvaluationResult};
use crate::score::Grade;

/// Output format enum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Markdown,
    Text,
}

/// Something that can be rendered for people as well as serialized.
pub trait Render: Serialize {
    fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<()>;
    fn render_text<W: Write>(&self, writer: &mut W) -> Result<()>;
}

impl Format {
    /// Write a successful result.
    pub fn write<T: Render, W: Write>(&self, data: &T, writer: &mut W) -> Result<()> {
        match self {
            Format::Json => write_json(&ApiResponse::ok(data), writer),
            Format::Markdown => data.render_markdown(writer),
            Format::Text => data.render_text(writer),
        }
    }

    /// Write a surfaced error.
    pub fn write_error<W: Write>(&self, error: &dyn std::fmt::Display, writer: &mut W) -> Result<()> {
        match self {
            Format::Json => write_json(&ApiResponse::<()>::err(error), writer),
            Format::Markdown => {
                writeln!(writer, "**Error**: {error}")?;
                Ok(())
            }
            Format::Text => {
                writeln!(writer, "{} {error}", "Error:".red().bold())?;
                Ok(())
            }
        }
    }
}

fn write_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

fn colored_score(score: f64) -> String {
    let text = format_score(score);
    if score >= 75.0 {
        text.green().to_string()
    } else if score >= 60.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

fn colored_grade(grade: Grade) -> String {
    match grade {
        Grade::Excellent | Grade::Good => grade.label().green().bold().to_string(),
        Grade::Fair => grade.label().yellow().bold().to_string(),
        Grade::NeedsImprovement => grade.label().red().bold().to_string(),
    }
}

fn outcome_status(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Scored { .. } => "scored",
        Outcome::ParseFailure { .. } => "parse failure",
        Outcome::SandboxFailure { .. } => "sandbox failure",
    }
}

fn write_list_markdown<W: Write>(writer: &mut W, title: &str, items: &[String]) -> Result<()> {
    writeln!(writer, "## {title}\n")?;
    if items.is_empty() {
        writeln!(writer, "_None_\n")?;
        return Ok(());
    }
    for item in items {
        writeln!(writer, "- {item}")?;
    }
    writeln!(writer)?;
    Ok(())
}

impl Render for EvaluationResult {
    fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# Evaluation\n")?;
        writeln!(
            writer,
            "**Overall**: {} ({})\n",
            format_score(self.overall_score()),
            self.grade()
        )?;
        writeln!(writer, "**Language**: {}\n", self.language().display_name())?;

        writeln!(writer, "| Dimension | Score | Status |")?;
        writeln!(writer, "| --- | --- | --- |")?;
        for dimension in Dimension::ALL {
            let status = self.details().get(&dimension).map_or("-", outcome_status);
            writeln!(
                writer,
                "| {} | {} | {status} |",
                dimension.display_name(),
                format_score(self.score(dimension))
            )?;
        }
        writeln!(writer)?;

        writeln!(writer, "## Feedback\n")?;
        for (dimension, items) in self.feedback() {
            for item in items {
                writeln!(writer, "- **{}**: {item}", dimension.display_name())?;
            }
        }
        writeln!(writer)?;

        write_list_markdown(writer, "Suggestions", self.suggestions())?;
        write_list_markdown(writer, "Strengths", self.strengths())?;

        writeln!(writer, "## Details\n")?;
        for (dimension, outcome) in self.details() {
            for note in outcome.notes() {
                writeln!(writer, "- {}: {note}", dimension.display_name())?;
            }
        }
        Ok(())
    }

    fn render_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "{} {} ({})",
            "Overall score:".bold(),
            colored_score(self.overall_score()),
            colored_grade(self.grade())
        )?;
        for dimension in Dimension::ALL {
            writeln!(
                writer,
                "  {:<12} {}",
                dimension.display_name(),
                colored_score(self.score(dimension))
            )?;
            if let Some(outcome) = self.details().get(&dimension) {
                for note in outcome.notes() {
                    writeln!(writer, "    {}", note.dimmed())?;
                }
            }
        }

        writeln!(writer, "\n{}", "Feedback:".bold())?;
        for (dimension, items) in self.feedback() {
            for item in items {
                writeln!(writer, "  [{}] {item}", dimension.key())?;
            }
        }
        writeln!(writer, "\n{}", "Suggestions:".bold())?;
        for item in self.suggestions() {
            writeln!(writer, "  - {item}")?;
        }
        writeln!(writer, "\n{}", "Strengths:".bold())?;
        for item in self.strengths() {
            writeln!(writer, "  + {item}")?;
        }
        Ok(())
    }
}

impl Render for AnalysisReport {
    fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "# Static Analysis\n")?;
        writeln!(
            writer,
            "**Language**: {} | **Lines**: {} | **Comment lines**: {}\n",
            self.language.display_name(),
            self.total_lines,
            self.comment_lines
        )?;
        writeln!(writer, "| Dimension | Score | Notes |")?;
        writeln!(writer, "| --- | --- | --- |")?;
        for (dimension, outcome) in &self.outcomes {
            let notes = outcome.notes();
            let notes = if notes.is_empty() {
                "-".to_string()
            } else {
                notes.join("; ")
            };
            writeln!(
                writer,
                "| {} | {} | {notes} |",
                dimension.display_name(),
                format_score(outcome.score())
            )?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn render_text<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "{} {} ({} lines, {} comments)",
            "Static analysis:".bold(),
            self.language.display_name(),
            self.total_lines,
            self.comment_lines
        )?;
        for (dimension, outcome) in &self.outcomes {
            writeln!(
                writer,
                "  {:<12} {}",
                dimension.display_name(),
                colored_score(outcome.score())
            )?;
            for note in outcome.notes() {
                writeln!(writer, "    {}", note.dimmed())?;
            }
        }
        Ok(())
    }
}
