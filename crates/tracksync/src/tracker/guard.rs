use async_trait::async_trait;

use crate::repo_id::RepoId;
use crate::retry::with_rate_limit_retry;

use super::errors::Result;
use super::types::{
    NewRemoteIssue, NewRemoteLabel, RateLimitInfo, RemoteIssue, RemoteIssueUpdate, RemoteLabel,
    RemoteTracker,
};

/// A wrapper around any [`RemoteTracker`] that applies the bounded
/// rate-limit backoff of [`with_rate_limit_retry`] to every call.
///
/// # Example
///
/// ```ignore
/// use tracksync::tracker::RateLimitGuard;
///
/// let tracker = RateLimitGuard::new(GitHubTracker::new(config)?);
/// // A throttled call is now retried once or fails with RateLimited.
/// let issues = tracker.list_issues(&repo).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RateLimitGuard<T> {
    inner: T,
}

impl<T> RateLimitGuard<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner tracker.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: RemoteTracker> RemoteTracker for RateLimitGuard<T> {
    fn has_credentials(&self) -> bool {
        self.inner.has_credentials()
    }

    async fn list_issues(&self, repo: &RepoId) -> Result<Vec<RemoteIssue>> {
        let inner = &self.inner;
        with_rate_limit_retry("list_issues", move || inner.list_issues(repo)).await
    }

    async fn create_issue(&self, repo: &RepoId, issue: &NewRemoteIssue) -> Result<i64> {
        let inner = &self.inner;
        with_rate_limit_retry("create_issue", move || inner.create_issue(repo, issue)).await
    }

    async fn update_issue(
        &self,
        repo: &RepoId,
        number: i64,
        update: &RemoteIssueUpdate,
    ) -> Result<()> {
        let inner = &self.inner;
        with_rate_limit_retry("update_issue", move || {
            inner.update_issue(repo, number, update)
        })
        .await
    }

    async fn list_labels(&self, repo: &RepoId) -> Result<Vec<RemoteLabel>> {
        let inner = &self.inner;
        with_rate_limit_retry("list_labels", move || inner.list_labels(repo)).await
    }

    async fn create_label(&self, repo: &RepoId, label: &NewRemoteLabel) -> Result<()> {
        let inner = &self.inner;
        with_rate_limit_retry("create_label", move || inner.create_label(repo, label)).await
    }

    async fn validate_repo(&self, repo: &RepoId) -> Result<()> {
        let inner = &self.inner;
        with_rate_limit_retry("validate_repo", move || inner.validate_repo(repo)).await
    }

    async fn rate_limit(&self) -> Result<RateLimitInfo> {
        self.inner.rate_limit().await
    }
}
