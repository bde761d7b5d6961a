//! Report rendering and the fetch-extract-render pipeline.

use crate::checklist::{Checklist, ChecklistFormat};
use crate::config::{AppConfig, RepoId};
use crate::extract::{CommitSummary, Extractor, IssueSummary, PullSummary, Summary};
use crate::fetcher;
use crate::github::{ActivityKind, PageSource};
use crate::window::TimeWindow;
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use std::io::Write;

/// Printed after every report block.
pub const DIVIDER: &str = "--------------------------------------";

/// What to report on.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub repo: RepoId,
    pub kind: ActivityKind,
    pub window: TimeWindow,
    pub author: Option<String>,
}

pub struct Renderer<W: Write> {
    out: W,
    checklist: ChecklistFormat,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, checklist: ChecklistFormat) -> Self {
        Self { out, checklist }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(&mut self, summary: &Summary) -> std::io::Result<()> {
        match summary {
            Summary::Commit(commit) => self.commit(commit),
            Summary::Issue(issue) => self.issue(issue),
            Summary::Pull(pull) => self.pull(pull),
        }
    }

    pub fn empty(&mut self, request: &ReportRequest) -> std::io::Result<()> {
        let who = request
            .author
            .as_deref()
            .map(|author| format!(" by {author}"))
            .unwrap_or_default();
        writeln!(
            self.out,
            "No {}{} found in {} between {} and {}.",
            request.kind,
            who,
            request.repo,
            request.window.start().date_naive(),
            request.window.end().date_naive(),
        )
    }

    fn commit(&mut self, commit: &CommitSummary) -> std::io::Result<()> {
        let sha: String = commit.sha.chars().take(7).collect();
        let date = commit
            .date
            .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| "Unknown".to_string());
        let issues = if commit.issue_refs.is_empty() {
            "None".to_string()
        } else {
            commit.issue_refs.join(", ")
        };

        writeln!(self.out, "Commit: {sha}")?;
        writeln!(self.out, "Commit Title: {}", commit.title)?;
        writeln!(self.out, "Author: {}", commit.author)?;
        writeln!(self.out, "Date: {date}")?;
        writeln!(self.out, "Issue #: {issues}")?;
        writeln!(self.out, "{DIVIDER}")
    }

    fn issue(&mut self, issue: &IssueSummary) -> std::io::Result<()> {
        match issue.number {
            Some(number) => writeln!(self.out, "Issue Number: {number}")?,
            None => writeln!(self.out, "Issue Number: Unknown")?,
        }
        writeln!(self.out, "Title: {}", issue.title)?;
        writeln!(self.out, "Body: {}", issue.body)?;
        writeln!(self.out, "{DIVIDER}")
    }

    fn pull(&mut self, pull: &PullSummary) -> std::io::Result<()> {
        writeln!(self.out, "PR Title: {}", pull.title)?;
        writeln!(self.out, "Author: {}", pull.author)?;
        writeln!(
            self.out,
            "Merged at: {}",
            pull.merged_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        writeln!(self.out, "Body: {}", pull.body)?;

        match self.checklist.scrape(&pull.body) {
            Checklist::Items(items) => {
                writeln!(self.out, "Fix List Items:")?;
                for item in items {
                    writeln!(self.out, "{item}")?;
                }
            }
            Checklist::ItemsMissing => writeln!(self.out, "No fix list items found.")?,
            Checklist::SectionMissing => writeln!(self.out, "No fix list section found.")?,
        }
        writeln!(self.out, "{DIVIDER}")
    }
}

/// Fetches, filters, and prints one report. Returns the number of blocks written.
pub async fn run_report<S: PageSource, W: Write>(
    source: &S,
    config: &AppConfig,
    request: &ReportRequest,
    out: W,
) -> Result<usize> {
    let records = fetcher::fetch_activity(
        source,
        config,
        &request.repo,
        request.kind,
        &request.window,
        request.author.as_deref(),
    )
    .await
    .with_context(|| format!("Failed to fetch {} for {}", request.kind, request.repo))?;

    let extractor = Extractor::new(&request.window, request.author.as_deref());
    let mut renderer = Renderer::new(out, config.checklist_format());
    let mut written = 0;

    for summary in records.iter().filter_map(|record| extractor.extract(record)) {
        renderer.render(&summary)?;
        written += 1;
    }

    if written == 0 {
        renderer.empty(request)?;
    }
    renderer.into_inner().flush()?;

    tracing::debug!(repo = %request.repo, kind = %request.kind, written, "Report complete");
    Ok(written)
}
