//! Content source abstraction for resolving a submission reference to text.
//!
//! A reference is one of:
//! - a GitHub blob URL (`https://github.com/owner/repo/blob/main/solution.py`)
//! - a path to a local file
//! - the source text itself

use std::path::Path;
use std::time::Duration;

use regex::Regex;

use super::{Error, Result};
use crate::config::SourceConfig;

/// Trait for turning a submission reference into UTF-8 source text.
pub trait ContentSource: Send + Sync {
    /// Resolve the reference. Any failure is `Error::SourceUnavailable`.
    fn resolve(&self, reference: &str) -> Result<String>;
}

/// Reads submissions from the local filesystem.
pub struct FilesystemSource {
    max_bytes: u64,
}

impl FilesystemSource {
    /// Create a new filesystem source with a size cap.
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }
}

impl ContentSource for FilesystemSource {
    fn resolve(&self, reference: &str) -> Result<String> {
        let path = Path::new(reference);
        let metadata = std::fs::metadata(path).map_err(|e| {
            Error::source_unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        if metadata.len() > self.max_bytes {
            return Err(Error::source_unavailable(format!(
                "{} is {} bytes (max {})",
                path.display(),
                metadata.len(),
                self.max_bytes
            )));
        }
        std::fs::read_to_string(path).map_err(|e| {
            Error::source_unavailable(format!("cannot read {}: {e}", path.display()))
        })
    }
}

/// A file inside a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubFile {
    pub owner: String,
    pub repo: String,
    pub reference: String,
    pub path: String,
}

/// Fetches single files through the GitHub contents API.
pub struct GitHubSource {
    api_url: String,
    token: Option<String>,
    max_bytes: u64,
    client: reqwest::blocking::Client,
}

impl GitHubSource {
    /// Create a new GitHub source.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("critique/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            token: config
                .github_token
                .clone()
                .or_else(|| std::env::var("GITHUB_TOKEN").ok()),
            max_bytes: config.max_bytes,
            client,
        })
    }

    /// Build the contents API URL for a file.
    fn contents_url(&self, file: &GitHubFile) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_url, file.owner, file.repo, file.path, file.reference
        )
    }
}

impl ContentSource for GitHubSource {
    fn resolve(&self, reference: &str) -> Result<String> {
        let file = parse_github_url(reference)?;
        let url = self.contents_url(&file);
        tracing::debug!("Fetching {} from GitHub", file.path);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.raw+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .map_err(|e| Error::source_unavailable(format!("GitHub request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::source_unavailable(format!(
                "GitHub returned {} for {}/{}/{}",
                response.status(),
                file.owner,
                file.repo,
                file.path
            )));
        }

        let body = response
            .text()
            .map_err(|e| Error::source_unavailable(format!("GitHub response unreadable: {e}")))?;
        if body.len() as u64 > self.max_bytes {
            return Err(Error::source_unavailable(format!(
                "{} is {} bytes (max {})",
                file.path,
                body.len(),
                self.max_bytes
            )));
        }
        Ok(body)
    }
}

/// Resolves any reference form: local file, GitHub URL, or literal text.
pub struct SourceResolver {
    github: GitHubSource,
    filesystem: FilesystemSource,
    max_bytes: u64,
}

impl SourceResolver {
    /// Create a resolver from source configuration.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            github: GitHubSource::new(config)?,
            filesystem: FilesystemSource::new(config.max_bytes),
            max_bytes: config.max_bytes,
        })
    }
}

impl ContentSource for SourceResolver {
    fn resolve(&self, reference: &str) -> Result<String> {
        if is_single_line(reference) && Path::new(reference).is_file() {
            return self.filesystem.resolve(reference);
        }
        if is_github_url(reference) {
            return self.github.resolve(reference.trim());
        }
        if reference.len() as u64 > self.max_bytes {
            return Err(Error::source_unavailable(format!(
                "submission is {} bytes (max {})",
                reference.len(),
                self.max_bytes
            )));
        }
        Ok(reference.to_string())
    }
}

fn is_single_line(reference: &str) -> bool {
    !reference.is_empty() && !reference.contains('\n')
}

/// A reference is a GitHub URL when it is a single token mentioning github.com.
pub fn is_github_url(reference: &str) -> bool {
    let trimmed = reference.trim();
    trimmed.contains("github.com") && !trimmed.contains(char::is_whitespace)
}

/// Parse `https://github.com/<owner>/<repo>/blob/<ref>/<path>`.
pub fn parse_github_url(url: &str) -> Result<GitHubFile> {
    let re = Regex::new(
        r"^(?:https?://)?(?:www\.)?github\.com/([^/]+)/([^/]+)/(?:blob|raw)/([^/]+)/(.+?)/?$",
    )
    .expect("valid regex");

    let caps = re.captures(url.trim()).ok_or_else(|| {
        Error::source_unavailable(format!(
            "Unsupported GitHub URL: {url} (expected github.com/<owner>/<repo>/blob/<ref>/<path>)"
        ))
    })?;

    Ok(GitHubFile {
        owner: caps[1].to_string(),
        repo: caps[2].to_string(),
        reference: caps[3].to_string(),
        path: caps[4].to_string(),
    })
}
