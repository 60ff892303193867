//! GitHub issue tracker client.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::repo_id::RepoId;
use crate::tracker::{
    self, ApiRateLimiter, NewRemoteIssue, NewRemoteLabel, RateLimitInfo, RemoteIssue,
    RemoteIssueUpdate, RemoteLabel, RemoteTracker, TrackerError,
};

use super::convert::{state_param, to_remote_issue, to_remote_label};
use super::error::GitHubError;
use super::pagination::parse_link_header;
use super::types::{
    API_VERSION, CreateIssueRequest, CreateLabelRequest, CreatedIssue, DEFAULT_API_URL,
    GitHubIssue, GitHubLabel, PER_PAGE, UpdateIssueRequest,
};

/// Connection settings for [`GitHubTracker`].
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Personal access token. Without it only public reads work.
    pub token: Option<String>,
    /// REST endpoint, `https://api.github.com` or a GitHub Enterprise `/api/v3` URL.
    pub api_url: String,
    /// Proactive pacing; `None` disables it.
    pub requests_per_second: Option<u32>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            requests_per_second: Some(tracker::rate_limits::GITHUB_DEFAULT_RPS),
        }
    }
}

impl GitHubConfig {
    /// Default settings with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }
}

/// Create an Octocrab instance for the given endpoint and optional token.
pub fn create_client(api_url: &Url, token: Option<&str>) -> Result<Octocrab, GitHubError> {
    let mut builder = Octocrab::builder().base_uri(api_url.as_str())?;
    if let Some(token) = token {
        builder = builder.personal_token(token.to_string());
    }
    builder.build().map_err(GitHubError::Octocrab)
}

/// GitHub client implementing the [`RemoteTracker`] trait.
///
/// Issue and label endpoints go through `reqwest` so that response headers
/// (pagination, rate-limit metadata) stay visible; repository lookups and
/// rate-limit status use `octocrab`.
#[derive(Clone)]
pub struct GitHubTracker {
    octocrab: Arc<Octocrab>,
    http_client: reqwest::Client,
    /// API root without a trailing slash.
    api_url: Url,
    token: Option<Arc<String>>,
    rate_limiter: Option<ApiRateLimiter>,
}

impl std::fmt::Debug for GitHubTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubTracker")
            .field("api_url", &self.api_url.as_str())
            .field("has_token", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl GitHubTracker {
    /// Create a client from connection settings.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubError> {
        let api_url = Url::parse(config.api_url.trim_end_matches('/'))
            .map_err(|e| GitHubError::Internal(format!("Invalid API URL {}: {}", config.api_url, e)))?;
        let token = config.token.filter(|t| !t.trim().is_empty());
        let octocrab = create_client(&api_url, token.as_deref())?;

        Ok(Self {
            octocrab: Arc::new(octocrab),
            http_client: reqwest::Client::new(),
            api_url,
            token: token.map(Arc::new),
            rate_limiter: config.requests_per_second.map(ApiRateLimiter::new),
        })
    }

    /// Get a reference to the inner Octocrab client.
    pub fn inner(&self) -> &Octocrab {
        &self.octocrab
    }

    /// Wait for rate limiter if one is configured.
    async fn wait_for_rate_limit(&self) {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }
    }

    /// Absolute URL for a repository-scoped route.
    fn repo_url(&self, repo: &RepoId, suffix: &str) -> Result<Url, GitHubError> {
        let raw = format!(
            "{}/repos/{}/{}/{}",
            self.api_url.as_str().trim_end_matches('/'),
            repo.owner(),
            repo.name(),
            suffix
        );
        Url::parse(&raw).map_err(|e| GitHubError::Internal(format!("Invalid URL {}: {}", raw, e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .http_client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, "tracksync")
            .header("X-GitHub-Api-Version", API_VERSION);

        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token.as_str())),
            None => request,
        }
    }

    /// Send a request and return the raw successful response.
    async fn send(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<reqwest::Response, GitHubError> {
        self.wait_for_rate_limit().await;

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        let err = GitHubError::from_response(status, &headers, &body, resource);
        tracing::debug!(status = status.as_u16(), resource, error = %err, "GitHub request failed");
        Err(err)
    }

    /// GET every page of a list endpoint, following `rel="next"` links.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        first: Url,
        resource: &str,
    ) -> Result<Vec<T>, GitHubError> {
        let mut items = Vec::new();
        let mut next = Some(first);
        let mut page = 0u32;

        while let Some(url) = next.take() {
            page += 1;
            let response = self.send(self.request(Method::GET, url), resource).await?;
            next = next_page_url(response.headers())?;

            let batch: Vec<T> = response.json().await?;
            tracing::debug!(resource, page, count = batch.len(), "Fetched page");
            items.extend(batch);
        }

        Ok(items)
    }
}

/// URL of the next page from the `Link` header, if any.
fn next_page_url(headers: &HeaderMap) -> Result<Option<Url>, GitHubError> {
    let Some(next) = headers
        .get("link")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| parse_link_header(h).next)
    else {
        return Ok(None);
    };

    Url::parse(&next)
        .map(Some)
        .map_err(|e| GitHubError::Internal(format!("Invalid pagination link {}: {}", next, e)))
}

#[async_trait]
impl RemoteTracker for GitHubTracker {
    fn has_credentials(&self) -> bool {
        self.token.is_some()
    }

    async fn list_issues(&self, repo: &RepoId) -> tracker::Result<Vec<RemoteIssue>> {
        let mut url = self.repo_url(repo, "issues")?;
        url.query_pairs_mut()
            .append_pair("state", "all")
            .append_pair("per_page", &PER_PAGE.to_string());

        let issues: Vec<GitHubIssue> = self
            .get_all_pages(url, &format!("issues of {}", repo))
            .await?;
        Ok(issues.into_iter().map(to_remote_issue).collect())
    }

    async fn create_issue(&self, repo: &RepoId, issue: &NewRemoteIssue) -> tracker::Result<i64> {
        let url = self.repo_url(repo, "issues")?;
        let body = CreateIssueRequest {
            title: &issue.title,
            body: issue.body.as_deref(),
            labels: &issue.labels,
        };

        let response = self
            .send(
                self.request(Method::POST, url).json(&body),
                &format!("issues of {}", repo),
            )
            .await?;
        let created: CreatedIssue = response.json().await.map_err(GitHubError::from)?;
        Ok(created.number)
    }

    async fn update_issue(
        &self,
        repo: &RepoId,
        number: i64,
        update: &RemoteIssueUpdate,
    ) -> tracker::Result<()> {
        let url = self.repo_url(repo, &format!("issues/{}", number))?;
        let body = UpdateIssueRequest {
            title: &update.title,
            body: update.body.as_deref(),
            labels: &update.labels,
            state: state_param(update.state),
        };

        self.send(
            self.request(Method::PATCH, url).json(&body),
            &format!("{}#{}", repo, number),
        )
        .await?;
        Ok(())
    }

    async fn list_labels(&self, repo: &RepoId) -> tracker::Result<Vec<RemoteLabel>> {
        let mut url = self.repo_url(repo, "labels")?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());

        let labels: Vec<GitHubLabel> = self
            .get_all_pages(url, &format!("labels of {}", repo))
            .await?;
        Ok(labels.into_iter().map(to_remote_label).collect())
    }

    async fn create_label(&self, repo: &RepoId, label: &NewRemoteLabel) -> tracker::Result<()> {
        let url = self.repo_url(repo, "labels")?;
        let body = CreateLabelRequest {
            name: &label.name,
            color: &label.color,
        };

        self.send(
            self.request(Method::POST, url).json(&body),
            &format!("label {}", label.name),
        )
        .await?;
        Ok(())
    }

    async fn validate_repo(&self, repo: &RepoId) -> tracker::Result<()> {
        self.wait_for_rate_limit().await;
        self.octocrab
            .repos(repo.owner(), repo.name())
            .get()
            .await
            .map_err(|e| match TrackerError::from(GitHubError::from(e)) {
                TrackerError::NotFound { .. } => TrackerError::not_found(repo.to_string()),
                other => other,
            })?;
        Ok(())
    }

    async fn rate_limit(&self) -> tracker::Result<RateLimitInfo> {
        let rate_limit = self
            .octocrab
            .ratelimit()
            .get()
            .await
            .map_err(GitHubError::from)?;
        let core = &rate_limit.resources.core;

        Ok(RateLimitInfo {
            limit: core.limit,
            remaining: core.remaining,
            reset_at: DateTime::from_timestamp(core.reset as i64, 0).unwrap_or_else(Utc::now),
        })
    }
}
