//! Projects raw records into the fields a report prints.

use crate::records::{ActivityRecord, Commit, Issue, PullRequest, User};
use crate::window::TimeWindow;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

static ISSUE_REF: OnceLock<Regex> = OnceLock::new();

fn issue_ref_regex() -> &'static Regex {
    ISSUE_REF.get_or_init(|| Regex::new(r"#(\d+)").expect("issue reference regex should compile"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: String,
    pub title: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    /// Issue numbers referenced as `#123`, in order of appearance.
    pub issue_refs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub number: Option<u64>,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullSummary {
    pub number: Option<u64>,
    pub title: String,
    pub author: String,
    pub merged_at: DateTime<Utc>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary {
    Commit(CommitSummary),
    Issue(IssueSummary),
    Pull(PullSummary),
}

/// Every `#<digits>` reference in `message`. Duplicates are kept.
pub fn issue_refs(message: &str) -> Vec<String> {
    issue_ref_regex()
        .captures_iter(message)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// The first line of a commit message.
pub fn short_message(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

pub fn summarize_commit(commit: &Commit) -> CommitSummary {
    let detail = commit.commit.as_ref();
    let message = detail.and_then(|d| d.message.as_deref()).unwrap_or("");
    let author = detail.and_then(|d| d.author.as_ref());

    CommitSummary {
        sha: commit.sha.clone().unwrap_or_default(),
        title: short_message(message).to_string(),
        author: author
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        date: author.and_then(|a| a.date),
        issue_refs: issue_refs(message),
    }
}

/// Selects and summarizes records for one report.
pub struct Extractor<'a> {
    window: &'a TimeWindow,
    author: Option<&'a str>,
}

impl<'a> Extractor<'a> {
    pub fn new(window: &'a TimeWindow, author: Option<&'a str>) -> Self {
        Self { window, author }
    }

    pub fn extract(&self, record: &ActivityRecord) -> Option<Summary> {
        match record {
            // The API already applied the window and author to commits.
            ActivityRecord::Commit(commit) => Some(Summary::Commit(summarize_commit(commit))),
            ActivityRecord::Issue(issue) => self.issue(issue).map(Summary::Issue),
            ActivityRecord::PullRequest(pr) => self.pull(pr).map(Summary::Pull),
        }
    }

    fn by_author(&self, user: &Option<User>) -> bool {
        match self.author {
            None => true,
            Some(wanted) => {
                User::login_of(user).is_some_and(|login| login.eq_ignore_ascii_case(wanted))
            }
        }
    }

    fn issue(&self, issue: &Issue) -> Option<IssueSummary> {
        let created_at = issue.created_at?;
        if !self.window.contains(created_at) || !self.by_author(&issue.user) {
            return None;
        }

        Some(IssueSummary {
            number: issue.number,
            title: issue.title.clone().unwrap_or_default(),
            body: issue.body.clone().unwrap_or_default(),
        })
    }

    fn pull(&self, pr: &PullRequest) -> Option<PullSummary> {
        let merged_at = pr.merged_at?;
        if !self.window.contains(merged_at) || !self.by_author(&pr.user) {
            return None;
        }

        Some(PullSummary {
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            author: User::login_of(&pr.user)
                .unwrap_or(UNKNOWN_AUTHOR)
                .to_string(),
            merged_at,
            body: pr.body.clone().unwrap_or_default(),
        })
    }
}
