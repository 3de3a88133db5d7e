use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::models::{Commit, Repository, User};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::future::Future;

pub const PER_PAGE: usize = 100;
const AFFILIATION: &str = "owner,collaborator,organization_member";

/// Status and decoded JSON body of one GET.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub trait Transport: Send + Sync {
    fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = Result<ApiResponse>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("github-commit-report"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {}", config.token))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body = if status.is_success() {
            serde_json::from_str(&text)?
        } else {
            // Error bodies are only ever logged.
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }
}

/// Why a pagination run stopped before the last page.
#[derive(Debug)]
pub enum PageFailure {
    Status(ApiResponse),
    Transport(reqwest::Error),
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFailure::Status(response) => write!(f, "{}", response.status),
            PageFailure::Transport(e) => write!(f, "{}", e),
        }
    }
}

/// Items gathered by a pagination run, plus what cut it short.
#[derive(Debug)]
pub struct Paginated<I> {
    pub items: Vec<I>,
    pub failure: Option<PageFailure>,
}

pub struct GithubClient<T = HttpTransport> {
    transport: T,
    username: String,
}

impl GithubClient<HttpTransport> {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_transport(
            HttpTransport::new(config)?,
            config.username.clone(),
        ))
    }
}

impl<T: Transport> GithubClient<T> {
    pub fn with_transport(transport: T, username: impl Into<String>) -> Self {
        Self {
            transport,
            username: username.into(),
        }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves the login the token belongs to. A 401 means the token itself was rejected.
    pub async fn validate_token(&self) -> Result<User> {
        let response = self.transport.get("/user", &[]).await?;
        match response.status {
            StatusCode::OK => Ok(serde_json::from_value(response.body)?),
            StatusCode::UNAUTHORIZED => Err(ReportError::InvalidToken),
            status => Err(ReportError::TokenCheck(status)),
        }
    }

    /// Every repository the token can see, in the order the API returns them.
    /// A failing page ends the listing early with whatever came before it.
    pub async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let query = [("affiliation", AFFILIATION.to_string())];
        let listing = self.paginate::<Repository>("/user/repos", &query).await?;

        match listing.failure {
            None => {}
            // Nothing listed at all: the API is unreachable, not merely refusing a page.
            Some(PageFailure::Transport(e)) if listing.items.is_empty() => {
                return Err(ReportError::Http(e))
            }
            Some(failure) => {
                println!("Error fetching repositories: {}", failure);
                if let PageFailure::Status(response) = &failure {
                    tracing::debug!(body = %response.body, "repository listing refused");
                }
                tracing::warn!(
                    reason = %failure,
                    collected = listing.items.len(),
                    "repository listing stopped early"
                );
            }
        }
        Ok(listing.items)
    }

    /// Commits by the configured user in `repo_full_name` between `start` 00:00:00Z
    /// and `end` 23:59:59Z. Inaccessible or empty repositories, and requests that
    /// fail outright, yield what was gathered before the failure, usually nothing.
    pub async fn list_commits(
        &self,
        repo_full_name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Commit>> {
        let path = format!("/repos/{}/commits", repo_full_name);
        let query = [
            ("author", self.username.clone()),
            ("since", format!("{}T00:00:00Z", start)),
            ("until", format!("{}T23:59:59Z", end)),
        ];
        let listing = self.paginate::<Commit>(&path, &query).await?;

        match &listing.failure {
            Some(PageFailure::Status(response)) => tracing::debug!(
                repo = repo_full_name,
                status = %response.status,
                "skipping remaining commit pages"
            ),
            Some(PageFailure::Transport(e)) => tracing::warn!(
                repo = repo_full_name,
                error = %e,
                kept = listing.items.len(),
                "request failed, keeping commits fetched so far"
            ),
            None => {}
        }
        Ok(listing.items)
    }

    /// Walks `page=1,2,..` with `per_page=100` until a short page, an empty
    /// page, a non-200 status, or a request that never got a response.
    pub async fn paginate<I: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Paginated<I>> {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let mut params = query.to_vec();
            params.push(("per_page", PER_PAGE.to_string()));
            params.push(("page", page.to_string()));

            tracing::debug!(path, page, "requesting page");
            let response = match self.transport.get(path, &params).await {
                Ok(response) => response,
                Err(ReportError::Http(e)) => {
                    return Ok(Paginated {
                        items,
                        failure: Some(PageFailure::Transport(e)),
                    })
                }
                Err(e) => return Err(e),
            };
            if response.status != StatusCode::OK {
                return Ok(Paginated {
                    items,
                    failure: Some(PageFailure::Status(response)),
                });
            }

            let batch: Vec<I> = serde_json::from_value(response.body)?;
            let batch_len = batch.len();
            items.extend(batch);

            if batch_len < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(Paginated {
            items,
            failure: None,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn valid_token_resolves_login() {
        let transport = ScriptedTransport::new().respond("/user", 200, json!({ "login": "octo" }));
        let client = GithubClient::with_transport(transport, "octo");

        let user = client.validate_token().await.unwrap();
        assert_eq!(user.login, "octo");
    }

    #[tokio::test]
    async fn rejected_token_is_invalid_and_makes_no_other_calls() {
        let transport = ScriptedTransport::new().respond("/user", 401, json!({ "message": "Bad credentials" }));
        let client = GithubClient::with_transport(transport, "octo");

        let err = client.validate_token().await.unwrap_err();
        assert!(matches!(err, ReportError::InvalidToken));
        assert_eq!(err.to_string(), "Invalid token");
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn other_token_failures_embed_the_status() {
        let transport = ScriptedTransport::new().respond("/user", 503, Value::Null);
        let client = GithubClient::with_transport(transport, "octo");

        let err = client.validate_token().await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn repositories_accumulate_until_short_page() {
        let transport = ScriptedTransport::new()
            .respond("/user/repos", 200, repo_page("a", 100))
            .respond("/user/repos", 200, repo_page("b", 100))
            .respond("/user/repos", 200, repo_page("c", 37));
        let client = GithubClient::with_transport(transport, "octo");

        let repos = client.list_repositories().await.unwrap();
        assert_eq!(repos.len(), 237);
        assert_eq!(repos[0].full_name, "a/repo-0");
        assert_eq!(repos[236].full_name, "c/repo-36");

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].param("page"), Some("3"));
        assert_eq!(requests[0].param("per_page"), Some("100"));
        assert_eq!(requests[0].param("affiliation"), Some(AFFILIATION));
    }

    #[tokio::test]
    async fn full_last_page_is_followed_by_one_empty_page() {
        let transport = ScriptedTransport::new()
            .respond("/user/repos", 200, repo_page("a", 100))
            .respond("/user/repos", 200, json!([]));
        let client = GithubClient::with_transport(transport, "octo");

        let repos = client.list_repositories().await.unwrap();
        assert_eq!(repos.len(), 100);
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn repository_listing_keeps_partial_result_on_error() {
        let transport = ScriptedTransport::new()
            .respond("/user/repos", 200, repo_page("a", 100))
            .respond("/user/repos", 500, json!({ "message": "boom" }));
        let client = GithubClient::with_transport(transport, "octo");

        let repos = client.list_repositories().await.unwrap();
        assert_eq!(repos.len(), 100);
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn commit_query_scopes_author_and_window() {
        let transport = ScriptedTransport::new().respond(
            "/repos/octo/app/commits",
            200,
            json!([commit_json("abcdef0123", "2024-01-05T08:00:00Z", "init")]),
        );
        let client = GithubClient::with_transport(transport, "octo");

        let commits = client
            .list_commits("octo/app", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(commits.len(), 1);

        let request = &client.transport().requests()[0];
        assert_eq!(request.path, "/repos/octo/app/commits");
        assert_eq!(request.param("author"), Some("octo"));
        assert_eq!(request.param("since"), Some("2024-01-01T00:00:00Z"));
        assert_eq!(request.param("until"), Some("2024-01-31T23:59:59Z"));
        assert_eq!(request.param("page"), Some("1"));
    }

    #[tokio::test]
    async fn commit_pages_sum_to_total() {
        let transport = ScriptedTransport::new()
            .respond("/repos/octo/app/commits", 200, commit_page(100))
            .respond("/repos/octo/app/commits", 200, commit_page(100))
            .respond("/repos/octo/app/commits", 200, commit_page(100))
            .respond("/repos/octo/app/commits", 200, commit_page(12));
        let client = GithubClient::with_transport(transport, "octo");

        let commits = client
            .list_commits("octo/app", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(commits.len(), 312);
        assert_eq!(client.transport().requests().len(), 4);
    }

    #[tokio::test]
    async fn refused_repository_yields_what_was_collected() {
        let transport = ScriptedTransport::new()
            .respond("/repos/octo/app/commits", 200, commit_page(100))
            .respond("/repos/octo/app/commits", 403, json!({ "message": "forbidden" }))
            .respond("/repos/octo/empty/commits", 409, json!({ "message": "Git Repository is empty." }));
        let client = GithubClient::with_transport(transport, "octo");

        let partial = client
            .list_commits("octo/app", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(partial.len(), 100);

        let empty = client
            .list_commits("octo/empty", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn connection_failure_keeps_earlier_commit_pages() {
        let transport = ScriptedTransport::new()
            .respond("/repos/octo/app/commits", 200, commit_page(100))
            .unreachable("/repos/octo/app/commits");
        let client = GithubClient::with_transport(transport, "octo");

        let commits = client
            .list_commits("octo/app", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap();
        assert_eq!(commits.len(), 100);
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn unreachable_api_fails_repository_listing() {
        let transport = ScriptedTransport::new().unreachable("/user/repos");
        let client = GithubClient::with_transport(transport, "octo");

        let err = client.list_repositories().await.unwrap_err();
        assert!(matches!(err, ReportError::Http(_)));
    }

    #[tokio::test]
    async fn connection_failure_mid_listing_keeps_partial_repositories() {
        let transport = ScriptedTransport::new()
            .respond("/user/repos", 200, repo_page("a", 100))
            .unreachable("/user/repos");
        let client = GithubClient::with_transport(transport, "octo");

        let repos = client.list_repositories().await.unwrap();
        assert_eq!(repos.len(), 100);
    }

    #[tokio::test]
    async fn malformed_page_is_a_decode_error() {
        let transport = ScriptedTransport::new().respond(
            "/repos/octo/app/commits",
            200,
            json!([{ "sha": "abc" }]),
        );
        let client = GithubClient::with_transport(transport, "octo");

        let err = client
            .list_commits("octo/app", date(2024, 1, 1), date(2024, 1, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Decode(_)));
    }
}
