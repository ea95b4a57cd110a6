//! Configuration loading and management.
//!
//! Configuration is read once and then passed by reference into the
//! evaluator; nothing here is mutated after loading.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::core::{Dimension, Error, Result};

/// Tolerance used when checking that the weights sum to one.
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dimension weights for the overall score.
    pub weights: Weights,
    /// Score band thresholds.
    pub thresholds: Thresholds,
    /// Test sandbox configuration.
    pub sandbox: SandboxConfig,
    /// Source acquisition configuration.
    pub source: SourceConfig,
    /// Feedback service configuration.
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Use this for explicit `--config` flags.
    /// Env vars with `CRITIQUE_` prefix override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file_exact(path))
            .merge(Env::prefixed("CRITIQUE_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from directory, looking for critique.toml or .critique/critique.toml.
    ///
    /// Missing files are silently skipped (defaults are used).
    /// Env vars with `CRITIQUE_` prefix override file/default values.
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(dir.join("critique.toml")))
            .merge(Toml::file(dir.join(".critique/critique.toml")))
            .merge(Env::prefixed("CRITIQUE_").split("__"))
            .extract()
            .map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Create default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.thresholds.validate()?;
        if self.sandbox.timeout_secs == 0 {
            return Err(Error::config("sandbox.timeout_secs must be positive"));
        }
        if self.sandbox.interpreter.trim().is_empty() {
            return Err(Error::config("sandbox.interpreter must not be empty"));
        }
        Ok(())
    }
}

/// Weights applied to each dimension. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub correctness: f64,
    pub quality: f64,
    pub efficiency: f64,
    pub readability: f64,
    pub edge_cases: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            correctness: 0.30,
            quality: 0.25,
            efficiency: 0.20,
            readability: 0.15,
            edge_cases: 0.10,
        }
    }
}

impl Weights {
    /// Weight for one dimension.
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Correctness => self.correctness,
            Dimension::Quality => self.quality,
            Dimension::Efficiency => self.efficiency,
            Dimension::Readability => self.readability,
            Dimension::EdgeCases => self.edge_cases,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }

    fn validate(&self) -> Result<()> {
        if let Some(dim) = Dimension::ALL.iter().find(|d| !self.get(**d).is_finite()) {
            return Err(Error::config(format!(
                "weight for {} must be a finite number, got {}",
                dim.key(),
                self.get(*dim)
            )));
        }
        if let Some(dim) = Dimension::ALL.iter().find(|d| self.get(**d) < 0.0) {
            return Err(Error::config(format!(
                "weight for {} must not be negative",
                dim.key()
            )));
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(Error::config(format!(
                "weights must sum to 1.0, got {total}"
            )));
        }
        Ok(())
    }
}

/// Score band thresholds for the overall grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            good: 75.0,
            fair: 60.0,
        }
    }
}

impl Thresholds {
    fn validate(&self) -> Result<()> {
        if !(self.excellent >= self.good && self.good >= self.fair) {
            return Err(Error::config(format!(
                "thresholds must satisfy excellent >= good >= fair, got {} / {} / {}",
                self.excellent, self.good, self.fair
            )));
        }
        Ok(())
    }
}

/// Test sandbox configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Wall-clock budget for one test run, in seconds.
    pub timeout_secs: u64,
    /// Interpreter used to run Python submissions.
    pub interpreter: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            interpreter: "python3".to_string(),
        }
    }
}

/// Source acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Largest accepted submission, in bytes.
    pub max_bytes: u64,
    /// GitHub token (can also use GITHUB_TOKEN env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    /// GitHub REST API base URL.
    pub github_api_url: String,
    /// HTTP timeout for remote fetches, in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024 * 1024,
            github_token: None,
            github_api_url: "https://api.github.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Feedback service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Whether to call the feedback service at all.
    pub enabled: bool,
    /// API key (can also use OPENAI_API_KEY env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Chat completions endpoint.
    pub endpoint: String,
    /// Model to request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// HTTP timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.3,
            timeout_secs: 60,
        }
    }
}
