use crate::config::{AppConfig, RepoId};
use crate::error::ReportError;
use crate::github::{ActivityKind, PageSource};
use crate::records::{ActivityRecord, Commit, Issue, PullRequest};
use crate::window::TimeWindow;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Walks the `page` parameter of a listing endpoint until the API runs dry.
pub struct Paginator<'a, S> {
    source: &'a S,
    per_page: u32,
    max_pages: Option<u32>,
}

impl<'a, S: PageSource> Paginator<'a, S> {
    pub fn new(source: &'a S, config: &AppConfig) -> Self {
        Self {
            source,
            per_page: config.per_page(),
            max_pages: config.activity_max_pages,
        }
    }

    /// Fetches every page until one comes back empty.
    pub async fn fetch_all<R: DeserializeOwned>(
        &self,
        route: &str,
        params: &[(&'static str, String)],
    ) -> Result<Vec<R>> {
        self.fetch_until(route, params, |_: &[R]| false).await
    }

    /// Like `fetch_all`, but also stops after a page for which `done` holds.
    pub async fn fetch_until<R, F>(
        &self,
        route: &str,
        params: &[(&'static str, String)],
        done: F,
    ) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        F: Fn(&[R]) -> bool,
    {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            if self.max_pages.is_some_and(|max| page > max) {
                tracing::warn!(
                    route,
                    max_pages = page - 1,
                    "Hit page limit before an empty page. Data may be incomplete."
                );
                break;
            }

            let mut query = params.to_vec();
            query.push(("per_page", self.per_page.to_string()));
            query.push(("page", page.to_string()));

            let items: Vec<R> = parse_page(self.source.fetch_page(route, &query).await?)?;
            tracing::debug!(route, page, count = items.len(), "Fetched page");

            if items.is_empty() {
                break;
            }

            let stop = done(&items);
            records.extend(items);
            if stop {
                tracing::debug!(route, page, "Remaining pages fall outside the window");
                break;
            }
            page += 1;
        }

        Ok(records)
    }
}

/// Turns one response body into records.
///
/// An object with a `message` field where a list was expected is the API
/// reporting an error.
pub fn parse_page<R: DeserializeOwned>(body: Value) -> Result<Vec<R>, ReportError> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| ReportError::UnexpectedPayload(e.to_string()))
            })
            .collect(),
        Value::Object(map) => match map.get("message").and_then(Value::as_str) {
            Some(message) => Err(ReportError::Api(message.to_string())),
            None => Err(ReportError::UnexpectedPayload(
                "expected a list of records".to_string(),
            )),
        },
        other => Err(ReportError::UnexpectedPayload(format!(
            "expected a list of records, got {other}"
        ))),
    }
}

/// Retrieves every record of `kind` for the repository and window.
pub async fn fetch_activity<S: PageSource>(
    source: &S,
    config: &AppConfig,
    repo: &RepoId,
    kind: ActivityKind,
    window: &TimeWindow,
    author: Option<&str>,
) -> Result<Vec<ActivityRecord>> {
    let paginator = Paginator::new(source, config);
    let route = kind.route(repo);
    let params = kind.params(window, author);

    tracing::info!(repo = %repo, kind = %kind, since = %window.since_param(), until = %window.until_param(), "Fetching activity");

    let records = match kind {
        ActivityKind::Commits => paginator
            .fetch_all::<Commit>(&route, &params)
            .await?
            .into_iter()
            .map(ActivityRecord::Commit)
            .collect::<Vec<_>>(),
        ActivityKind::Issues => paginator
            .fetch_all::<Issue>(&route, &params)
            .await?
            .into_iter()
            .map(ActivityRecord::Issue)
            .collect(),
        ActivityKind::Pulls if config.activity_pulls_early_stop => {
            // Sorted by last update, newest first; a merge is always an update.
            let window_start = window.start();
            paginator
                .fetch_until::<PullRequest, _>(&route, &params, |page| {
                    page.iter()
                        .all(|pr| pr.updated_at.is_some_and(|at| at < window_start))
                })
                .await?
                .into_iter()
                .map(ActivityRecord::PullRequest)
                .collect()
        }
        ActivityKind::Pulls => paginator
            .fetch_all::<PullRequest>(&route, &params)
            .await?
            .into_iter()
            .map(ActivityRecord::PullRequest)
            .collect(),
    };

    tracing::info!(repo = %repo, kind = %kind, count = records.len(), "Fetched activity");
    Ok(records)
}
