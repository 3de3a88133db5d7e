use crate::error::{ReportError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashMap;

/// Layout of every commit timestamp the API hands back.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
const SHORT_SHA_LEN: usize = 7;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Repository {
    pub full_name: String,
    pub private: bool,
    pub html_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub login: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Commit {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetails,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommitDetails {
    pub message: String,
    pub committer: CommitSignature,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommitSignature {
    pub date: String,
}

/// Snapshot of the repository a commit was fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub full_name: String,
    pub private: bool,
    pub html_url: String,
}

impl From<&Repository> for RepoRef {
    fn from(repo: &Repository) -> Self {
        Self {
            full_name: repo.full_name.clone(),
            private: repo.private,
            html_url: repo.html_url.clone(),
        }
    }
}

impl RepoRef {
    pub fn label(&self) -> &'static str {
        if self.private {
            "[PRIVATE]"
        } else {
            "[PUBLIC]"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredCommit {
    pub short_sha: String,
    pub message: String,
    /// Raw committer timestamp, kept as text so it can be exported unmodified.
    pub timestamp: String,
    pub html_url: String,
    pub repository: RepoRef,
}

impl AuthoredCommit {
    pub fn from_api(commit: Commit, repository: &RepoRef) -> Self {
        let short_sha = commit.sha.chars().take(SHORT_SHA_LEN).collect();
        Self {
            short_sha,
            message: commit.commit.message,
            timestamp: commit.commit.committer.date,
            html_url: commit.html_url,
            repository: repository.clone(),
        }
    }

    pub fn summary_line(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn committed_at(&self) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).map_err(|_| {
            ReportError::Timestamp {
                value: self.timestamp.clone(),
            }
        })
    }

    pub fn display_date(&self) -> Result<String> {
        Ok(self.committed_at()?.format(DISPLAY_FORMAT).to_string())
    }
}

/// Everything one run collected, ready to be rendered.
#[derive(Debug, Clone)]
pub struct CommitReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Newest first.
    pub commits: Vec<AuthoredCommit>,
    /// Only repositories with at least one matching commit appear here.
    pub repo_counts: HashMap<String, usize>,
}

impl CommitReport {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Per-repository counts, busiest first; equal counts fall back to name order.
    pub fn repo_breakdown(&self) -> Vec<(&str, usize)> {
        let mut breakdown: Vec<(&str, usize)> = self
            .repo_counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        breakdown.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        breakdown
    }

    pub fn file_stem(&self) -> String {
        format!("commits_{}_to_{}", self.start, self.end)
    }
}
