pub mod checklist;
pub mod config;
pub mod credential;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod github;
pub mod records;
pub mod report;
pub mod window;

pub use config::{AppConfig, RepoId};
pub use error::ReportError;
pub use github::{ActivityKind, GitHubClient, PageSource};
pub use report::{run_report, ReportRequest};
pub use window::TimeWindow;
