use crate::config::{AppConfig, RepoId};
use crate::credential::Credential;
use crate::error::ReportError;
use crate::window::TimeWindow;
use anyhow::Result;
use clap::ValueEnum;
use octocrab::Octocrab;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Query string as ordered (name, value) pairs.
pub type QueryParams = Vec<(&'static str, String)>;

/// The kind of record a report lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ActivityKind {
    Commits,
    Issues,
    Pulls,
}

impl ActivityKind {
    fn endpoint(self) -> &'static str {
        match self {
            ActivityKind::Commits => "commits",
            ActivityKind::Issues => "issues",
            ActivityKind::Pulls => "pulls",
        }
    }

    pub fn route(self, repo: &RepoId) -> String {
        format!("/repos/{}/{}/{}", repo.owner, repo.repo, self.endpoint())
    }

    /// Filters sent to the API, before `per_page` and `page`.
    ///
    /// Only the commits endpoint bounds both ends of the window and filters by
    /// author; issues and pull requests are narrowed client-side.
    pub fn params(self, window: &TimeWindow, author: Option<&str>) -> QueryParams {
        match self {
            ActivityKind::Commits => {
                let mut params = vec![
                    ("since", window.since_param()),
                    ("until", window.until_param()),
                ];
                if let Some(author) = author {
                    params.push(("author", author.to_string()));
                }
                params
            }
            ActivityKind::Issues => vec![
                ("state", "all".to_string()),
                ("since", window.since_param()),
            ],
            ActivityKind::Pulls => vec![
                ("state", "closed".to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
            ],
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for ActivityKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commits" => Ok(ActivityKind::Commits),
            "issues" => Ok(ActivityKind::Issues),
            "pulls" => Ok(ActivityKind::Pulls),
            _ => Err(ReportError::InvalidAction(s.trim().to_string())),
        }
    }
}

/// Anything that can answer a GET for one page of a listing endpoint.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, route: &str, params: &[(&'static str, String)]) -> Result<Value>;
}

pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    pub fn new(config: &AppConfig, credential: &Credential) -> Result<Self> {
        let mut builder = Octocrab::builder();
        builder = match &config.github_username {
            Some(username) => {
                builder.basic_auth(username.clone(), credential.expose().to_string())
            }
            None => builder.personal_token(credential.expose().to_string()),
        };
        if let Some(base) = &config.github_api_url {
            builder = builder.base_uri(base.as_str())?;
        }

        Ok(Self {
            octocrab: builder.build()?,
        })
    }
}

impl PageSource for GitHubClient {
    async fn fetch_page(&self, route: &str, params: &[(&'static str, String)]) -> Result<Value> {
        match self.octocrab.get::<Value, _, _>(route, Some(&params)).await {
            Ok(value) => Ok(value),
            Err(octocrab::Error::GitHub { source, .. }) => {
                Err(ReportError::Api(source.message.clone()).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoId {
        "octocat/Hello-World".parse().unwrap()
    }

    #[test]
    fn test_routes() {
        assert_eq!(
            ActivityKind::Commits.route(&repo()),
            "/repos/octocat/Hello-World/commits"
        );
        assert_eq!(
            ActivityKind::Issues.route(&repo()),
            "/repos/octocat/Hello-World/issues"
        );
        assert_eq!(
            ActivityKind::Pulls.route(&repo()),
            "/repos/octocat/Hello-World/pulls"
        );
    }

    #[test]
    fn test_commit_params_bound_both_ends() {
        let window = TimeWindow::parse("2023-01-01", "2023-01-31").unwrap();
        let params = ActivityKind::Commits.params(&window, Some("octocat"));
        assert_eq!(
            params,
            vec![
                ("since", "2023-01-01T00:00:00Z".to_string()),
                ("until", "2023-01-31T23:59:59Z".to_string()),
                ("author", "octocat".to_string()),
            ]
        );
    }

    #[test]
    fn test_issue_and_pull_params() {
        let window = TimeWindow::parse("2023-01-01", "2023-01-31").unwrap();
        let issues = ActivityKind::Issues.params(&window, Some("octocat"));
        assert_eq!(issues[0], ("state", "all".to_string()));
        assert_eq!(issues[1], ("since", "2023-01-01T00:00:00Z".to_string()));
        assert_eq!(issues.len(), 2);

        let pulls = ActivityKind::Pulls.params(&window, None);
        assert_eq!(pulls[0], ("state", "closed".to_string()));
        assert!(pulls.iter().all(|(name, _)| *name != "since"));
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(" Pulls ".parse::<ActivityKind>().unwrap(), ActivityKind::Pulls);
        assert!(matches!(
            "merges".parse::<ActivityKind>(),
            Err(ReportError::InvalidAction(_))
        ));
    }
}
