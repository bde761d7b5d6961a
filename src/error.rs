use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a report run.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid repository '{0}': expected 'owner/repo'")]
    InvalidRepo(String),

    #[error("Invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Start date {start} is after end date {end}")]
    InvertedWindow {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Invalid action '{0}': expected commits, issues, or pulls")]
    InvalidAction(String),

    #[error("No credential available from {0}")]
    EmptyCredential(&'static str),

    #[error("Failed to read credential file {path}: {source}")]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
