//! Critique CLI - Multi-dimensional code submission evaluator.

use std::io::stdout;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use critique::cli::{Cli, Command};
use critique::config::Config;
use critique::core::TestCase;
use critique::engine::Evaluator;
use critique::output::Format;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let format = Format::from(cli.format);
    match run(cli, format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("{e:#}");
            if format == Format::Json {
                let _ = format.write_error(&message, &mut stdout());
            } else {
                eprintln!("Error: {message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, format: Format) -> anyhow::Result<()> {
    match cli.command {
        Command::Init => {
            print!("{}", Config::default_toml());
        }
        Command::Evaluate(args) => {
            let evaluator = evaluator(cli.config.as_deref())?;
            let test_cases = match &args.tests {
                Some(path) => load_test_cases(path)?,
                None => Vec::new(),
            };
            let result = evaluator.evaluate(
                &args.source.reference()?,
                &args.problem,
                &test_cases,
                args.source.language(),
            )?;
            format.write(&result, &mut stdout())?;
        }
        Command::Analyze(args) => {
            let evaluator = evaluator(cli.config.as_deref())?;
            let report = evaluator.analyze(&args.reference()?, args.language())?;
            format.write(&report, &mut stdout())?;
        }
    }

    Ok(())
}

fn evaluator(config_path: Option<&Path>) -> critique::core::Result<Evaluator> {
    let config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default(".")?,
    };
    Evaluator::new(config)
}

fn load_test_cases(path: &Path) -> anyhow::Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test cases from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid test case file {}", path.display()))
}
