use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::github_state::GithubState;
use crate::repo_id::RepoId;

use super::errors::Result;

/// An issue as reported by the remote tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIssue {
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub state: GithubState,
    /// Flat label names, reserved and free-form.
    pub labels: Vec<String>,
    /// Assignee logins.
    pub assignees: Vec<String>,
    pub updated_at: DateTime<Utc>,
    /// GitHub lists pull requests through the issues endpoint.
    pub is_pull_request: bool,
}

/// Payload for creating a remote issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRemoteIssue {
    pub title: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
}

/// Payload for updating a remote issue. The label set is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteIssueUpdate {
    pub title: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
    pub state: GithubState,
}

/// A label defined on the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLabel {
    pub name: String,
    pub color: String,
}

/// Payload for creating a remote label. `color` is six hex digits, no `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRemoteLabel {
    pub name: String,
    pub color: String,
}

/// Rate limit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    pub limit: usize,
    /// Requests remaining in the current window.
    pub remaining: usize,
    /// When the rate limit window resets.
    pub reset_at: DateTime<Utc>,
}

/// Client for a GitHub-style remote issue tracker.
///
/// Implementations report throttling as [`TrackerError::Throttled`](super::TrackerError::Throttled)
/// and leave backoff to [`RateLimitGuard`](super::RateLimitGuard).
#[async_trait]
pub trait RemoteTracker: Send + Sync {
    /// Whether an access token is configured.
    fn has_credentials(&self) -> bool;

    /// All issues of a repository, open and closed, across every page.
    async fn list_issues(&self, repo: &RepoId) -> Result<Vec<RemoteIssue>>;

    /// Create an issue and return its number.
    async fn create_issue(&self, repo: &RepoId, issue: &NewRemoteIssue) -> Result<i64>;

    /// Update title, body, labels and state of an issue.
    async fn update_issue(
        &self,
        repo: &RepoId,
        number: i64,
        update: &RemoteIssueUpdate,
    ) -> Result<()>;

    /// All labels defined on a repository.
    async fn list_labels(&self, repo: &RepoId) -> Result<Vec<RemoteLabel>>;

    /// Create a label. Fails with `AlreadyExists` when the name is taken.
    async fn create_label(&self, repo: &RepoId, label: &NewRemoteLabel) -> Result<()>;

    /// Check that the repository exists and is visible with the configured token.
    async fn validate_repo(&self, repo: &RepoId) -> Result<()>;

    /// Current core API quota.
    async fn rate_limit(&self) -> Result<RateLimitInfo>;
}

#[async_trait]
impl<T: RemoteTracker + ?Sized> RemoteTracker for Arc<T> {
    fn has_credentials(&self) -> bool {
        (**self).has_credentials()
    }

    async fn list_issues(&self, repo: &RepoId) -> Result<Vec<RemoteIssue>> {
        (**self).list_issues(repo).await
    }

    async fn create_issue(&self, repo: &RepoId, issue: &NewRemoteIssue) -> Result<i64> {
        (**self).create_issue(repo, issue).await
    }

    async fn update_issue(
        &self,
        repo: &RepoId,
        number: i64,
        update: &RemoteIssueUpdate,
    ) -> Result<()> {
        (**self).update_issue(repo, number, update).await
    }

    async fn list_labels(&self, repo: &RepoId) -> Result<Vec<RemoteLabel>> {
        (**self).list_labels(repo).await
    }

    async fn create_label(&self, repo: &RepoId, label: &NewRemoteLabel) -> Result<()> {
        (**self).create_label(repo, label).await
    }

    async fn validate_repo(&self, repo: &RepoId) -> Result<()> {
        (**self).validate_repo(repo).await
    }

    async fn rate_limit(&self) -> Result<RateLimitInfo> {
        (**self).rate_limit().await
    }
}
