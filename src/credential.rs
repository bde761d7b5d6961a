//! Credential acquisition.
//!
//! A run needs exactly one GitHub token. Where it comes from is decided by a
//! `CredentialStrategy` picked in configuration, and each strategy is a
//! `CredentialSource` that yields the token or fails.

use crate::error::{ReportError, Result};
use clap::ValueEnum;
use console::Term;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A non-empty GitHub access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl AsRef<str>, origin: &'static str) -> Result<Self> {
        let token = raw.as_ref().trim();
        if token.is_empty() {
            return Err(ReportError::EmptyCredential(origin));
        }
        Ok(Self(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where the token is read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStrategy {
    /// Plain-text token file (defaults to ~/.gitautomation).
    #[default]
    File,
    /// The GITHUB_TOKEN environment variable.
    Env,
    /// Ask on the terminal without echoing input.
    Prompt,
    /// The --token command line argument.
    Inline,
}

pub trait CredentialSource {
    fn acquire(&self) -> Result<Credential>;
}

/// A token already held in memory, from the environment or the command line.
pub struct StaticSource {
    value: Option<String>,
    origin: &'static str,
}

impl StaticSource {
    pub fn new(value: Option<String>, origin: &'static str) -> Self {
        Self { value, origin }
    }
}

impl CredentialSource for StaticSource {
    fn acquire(&self) -> Result<Credential> {
        match &self.value {
            Some(value) => Credential::new(value, self.origin),
            None => Err(ReportError::EmptyCredential(self.origin)),
        }
    }
}

pub struct FileSource {
    path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn read(path: &Path) -> Result<Credential> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            ReportError::CredentialFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Credential::new(contents, "credential file")
    }
}

impl CredentialSource for FileSource {
    fn acquire(&self) -> Result<Credential> {
        let path = self
            .path
            .as_deref()
            .ok_or(ReportError::EmptyCredential("credential file"))?;
        tracing::debug!(path = %path.display(), "Reading credential file");
        Self::read(path)
    }
}

/// Prompts on stderr so the report on stdout stays clean.
pub struct PromptSource {
    term: Term,
}

impl PromptSource {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for PromptSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for PromptSource {
    fn acquire(&self) -> Result<Credential> {
        self.term.write_str("Enter your GitHub token: ")?;
        let line = self.term.read_secure_line()?;
        Credential::new(line, "prompt")
    }
}

/// Builds the source for a strategy. `inline` is the value of `--token`, if any.
pub fn source_for(
    strategy: CredentialStrategy,
    env_token: Option<String>,
    inline: Option<String>,
    file: Option<PathBuf>,
) -> Box<dyn CredentialSource> {
    match strategy {
        CredentialStrategy::File => Box::new(FileSource::new(file)),
        CredentialStrategy::Env => Box::new(StaticSource::new(env_token, "GITHUB_TOKEN")),
        CredentialStrategy::Prompt => Box::new(PromptSource::new()),
        CredentialStrategy::Inline => Box::new(StaticSource::new(inline, "--token")),
    }
}
