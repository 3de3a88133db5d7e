use crate::error::Result;
use crate::github_client::{GithubClient, Transport};
use crate::models::{AuthoredCommit, Commit, CommitReport, RepoRef, Repository};
use chrono::NaiveDate;
use futures::{stream, StreamExt};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_CONCURRENCY: usize = 4;

pub struct CommitCollector<'a, T> {
    client: &'a GithubClient<T>,
    concurrency: usize,
}

impl<'a, T: Transport> CommitCollector<'a, T> {
    pub fn new(client: &'a GithubClient<T>, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn collect(&self, start: NaiveDate, end: NaiveDate) -> Result<CommitReport> {
        println!("Fetching your repositories (including private)...");
        let repos = dedup_repositories(self.client.list_repositories().await?);
        println!("Found {} repositories", repos.len());

        println!("\nFetching commits from {} to {}...", start, end);
        println!("{}", "-".repeat(80));

        let total = repos.len();
        let mut fetches = stream::iter(repos.iter().enumerate())
            .map(move |(index, repo)| async move {
                let result = self.client.list_commits(&repo.full_name, start, end).await;
                (index, repo, result)
            })
            .buffered(self.concurrency);

        let mut per_repo = Vec::with_capacity(total);
        while let Some((index, repo, result)) = fetches.next().await {
            let commits = result?;

            let repo_ref = RepoRef::from(repo);
            println!(
                "[{}/{}] {} {}... ✓ {} commits",
                index + 1,
                total,
                repo_ref.label(),
                repo_ref.full_name,
                commits.len()
            );
            per_repo.push((repo_ref, commits));
        }

        Ok(aggregate(start, end, per_repo))
    }
}

/// Keeps the first occurrence of each `full_name`; the API can list one
/// repository under several affiliations.
pub fn dedup_repositories(repos: Vec<Repository>) -> Vec<Repository> {
    let mut seen = HashSet::new();
    let before = repos.len();
    let unique: Vec<Repository> = repos
        .into_iter()
        .filter(|repo| seen.insert(repo.full_name.clone()))
        .collect();

    if unique.len() != before {
        tracing::debug!(dropped = before - unique.len(), "duplicate repositories removed");
    }
    unique
}

/// Tags commits with their repository, counts them per repository and sorts
/// everything newest first.
pub fn aggregate(
    start: NaiveDate,
    end: NaiveDate,
    per_repo: Vec<(RepoRef, Vec<Commit>)>,
) -> CommitReport {
    let mut commits = Vec::new();
    let mut repo_counts = HashMap::new();

    for (repo, repo_commits) in per_repo {
        if repo_commits.is_empty() {
            continue;
        }
        *repo_counts.entry(repo.full_name.clone()).or_insert(0) += repo_commits.len();
        commits.extend(
            repo_commits
                .into_iter()
                .map(|commit| AuthoredCommit::from_api(commit, &repo)),
        );
    }

    // Fixed-width UTC timestamps order the same as the instants they name.
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    CommitReport {
        start,
        end,
        commits,
        repo_counts,
    }
}
