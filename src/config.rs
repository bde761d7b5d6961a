//! Application configuration and environment variable parsing.
//!
//! This module handles loading configuration settings from the environment (e.g., .env file).
//! It defines the `AppConfig` struct which governs behavior such as the credential strategy,
//! the page size used against the GitHub API, and the checklist format scraped from pull
//! request bodies.

use crate::checklist::ChecklistFormat;
use crate::credential::CredentialStrategy;
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Largest page size the GitHub REST API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// The owner of the repository (e.g., "octocat").
    pub owner: String,
    /// The name of the repository (e.g., "Hello-World").
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').map(str::trim).collect();
        match parts.as_slice() {
            [owner, repo] if is_path_segment(owner) && is_path_segment(repo) => Ok(RepoId {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(ReportError::InvalidRepo(s.to_string())),
        }
    }
}

// Keeps owner/repo from escaping the /repos/{owner}/{repo} route.
fn is_path_segment(part: &str) -> bool {
    !part.is_empty() && part != "." && part != ".."
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Personal access token, used by the `env` credential strategy.
    pub github_token: Option<String>,

    /// When set, requests use basic auth with this username and the token as password.
    pub github_username: Option<String>,

    /// Base URL of the REST API. Defaults to https://api.github.com.
    pub github_api_url: Option<String>,

    /// Repository used when none is given on the command line ("owner/repo").
    pub activity_repo: Option<String>,

    /// How the credential is acquired: file, env, prompt, or inline.
    #[serde(default)]
    pub activity_credential: CredentialStrategy,

    /// Token file read by the `file` strategy. Defaults to ~/.gitautomation.
    pub activity_credential_file: Option<PathBuf>,

    /// Records per page. Clamped to 1..=100.
    #[serde(default = "default_per_page")]
    pub activity_per_page: u32,

    /// Hard limit on the number of pages requested per run.
    pub activity_max_pages: Option<u32>,

    /// Stop paging pull requests once a whole page was last updated before
    /// the window start. Off by default, so every page up to the empty one is read.
    #[serde(default)]
    pub activity_pulls_early_stop: bool,

    /// Section header literal marking the checklist in pull request bodies.
    #[serde(default = "default_checklist_section")]
    pub activity_checklist_section: String,

    /// Sub-header literal after which checklist items are listed.
    #[serde(default = "default_checklist_items")]
    pub activity_checklist_items: String,
}

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

fn default_checklist_section() -> String {
    ChecklistFormat::V1_SECTION.to_string()
}

fn default_checklist_items() -> String {
    ChecklistFormat::V1_ITEMS.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_username: None,
            github_api_url: None,
            activity_repo: None,
            activity_credential: CredentialStrategy::default(),
            activity_credential_file: None,
            activity_per_page: default_per_page(),
            activity_max_pages: None,
            activity_pulls_early_stop: false,
            activity_checklist_section: default_checklist_section(),
            activity_checklist_items: default_checklist_items(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn per_page(&self) -> u32 {
        self.activity_per_page.clamp(1, MAX_PER_PAGE)
    }

    pub fn credential_file(&self) -> Option<PathBuf> {
        self.activity_credential_file
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".gitautomation")))
    }

    pub fn checklist_format(&self) -> ChecklistFormat {
        ChecklistFormat::new(
            &self.activity_checklist_section,
            &self.activity_checklist_items,
        )
    }
}
