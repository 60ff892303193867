//! Sync orchestrator.
//!
//! A run walks the stages in a fixed order:
//!
//! `ValidateConfig → FetchRemoteSnapshot → ProvisionLabels → Push(Create) →
//! Push(Update) → Pull → PersistWatermark`
//!
//! Only configuration errors and the fatal rate-limit error abort a run.
//! Everything else is recorded in [`SyncSummary::errors`] and the run goes on.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tracksync::github::{GitHubConfig, GitHubTracker};
//! use tracksync::store::DbStore;
//! use tracksync::sync::Synchronizer;
//!
//! let store = Arc::new(DbStore::new(db));
//! let tracker = Arc::new(GitHubTracker::new(GitHubConfig::with_token(token))?);
//! let sync = Synchronizer::new(store.clone(), store, tracker);
//! let summary = sync.sync(project_id, None).await?;
//! println!("created {} / imported {}", summary.created, summary.imported);
//! ```

mod labels;
mod pull;
mod push;

use std::sync::Arc;

use uuid::Uuid;

use crate::repo_id::RepoId;
use crate::store::{ActivityEntry, ActivityLog, IssueStore, Project};
use crate::tracker::{RateLimitGuard, RemoteTracker, short_error_message};

use super::context::SyncContext;
use super::error::{ConfigError, Result, SyncError};
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{SyncStage, SyncSummary};

/// Bidirectional synchronizer between the local store and a remote tracker.
///
/// Collaborators are injected; every tracker call goes through a
/// [`RateLimitGuard`].
pub struct Synchronizer {
    store: Arc<dyn IssueStore>,
    activity: Arc<dyn ActivityLog>,
    tracker: RateLimitGuard<Arc<dyn RemoteTracker>>,
}

impl Synchronizer {
    pub fn new(
        store: Arc<dyn IssueStore>,
        activity: Arc<dyn ActivityLog>,
        tracker: Arc<dyn RemoteTracker>,
    ) -> Self {
        Self {
            store,
            activity,
            tracker: RateLimitGuard::new(tracker),
        }
    }

    /// Synchronize one project with its remote repository.
    ///
    /// # Errors
    /// - [`SyncError::Config`] before any network call when the project is
    ///   missing, has no or a malformed repository, or no token is configured
    /// - [`SyncError::RateLimited`] when throttling outlasts the bounded backoff
    /// - [`SyncError::Store`] when the project cannot be loaded
    #[tracing::instrument(skip_all, fields(project_id = %project_id))]
    pub async fn sync(
        &self,
        project_id: Uuid,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<SyncSummary> {
        emit(
            on_progress,
            SyncProgress::Stage {
                stage: SyncStage::ValidateConfig,
            },
        );
        let (project, repo) = self.validate_config(project_id).await?;
        let mut ctx = SyncContext::new(project, repo, on_progress);

        ctx.enter(SyncStage::FetchRemoteSnapshot);
        let snapshot = self.tracker.list_issues(&ctx.repo).await;
        if let Some(issues) = ctx.tracker_outcome(snapshot, || {
            "Failed to fetch remote issues".to_string()
        })? {
            ctx.set_snapshot(issues);
        }

        ctx.enter(SyncStage::ProvisionLabels);
        self.provision_labels(&mut ctx).await?;

        ctx.enter(SyncStage::PushCreate);
        self.push_create(&mut ctx).await?;

        // Without a snapshot neither conflicts nor remote changes are known.
        if ctx.has_snapshot() {
            ctx.enter(SyncStage::PushUpdate);
            self.push_update(&mut ctx).await?;

            ctx.enter(SyncStage::Pull);
            self.pull(&mut ctx).await?;

            ctx.enter(SyncStage::PersistWatermark);
            let started_at = ctx.started_at;
            let persisted = self.store.set_watermark(ctx.project.id, started_at).await;
            if ctx
                .store_outcome(persisted, || "Failed to save sync watermark".to_string())
                .is_some()
            {
                ctx.summary.synced_at = Some(started_at);
            }
        }

        let summary = ctx.summary;
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            imported = summary.imported,
            pulled = summary.pulled,
            conflicts = summary.conflicts,
            errors = summary.errors.len(),
            "Sync complete"
        );
        Ok(summary)
    }

    /// Check the project configuration without touching the network.
    async fn validate_config(&self, project_id: Uuid) -> Result<(Project, RepoId)> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or(ConfigError::ProjectNotFound { project_id })?;

        let repo = match project.github_repo.as_deref().map(str::trim) {
            Some(repo) if !repo.is_empty() => repo.parse::<RepoId>().map_err(ConfigError::from)?,
            _ => return Err(ConfigError::MissingRepository.into()),
        };

        if !self.tracker.has_credentials() {
            return Err(ConfigError::MissingCredential.into());
        }

        Ok((project, repo))
    }

    /// Append to the activity log; failures are only logged.
    async fn log_activity(&self, entry: ActivityEntry) {
        let issue_id = entry.issue_id;
        if let Err(e) = self.activity.record(entry).await {
            tracing::warn!(%issue_id, "Failed to record activity: {}", short_error_message(&e));
        }
    }
}

/// Validate a repository string and check that it exists remotely.
///
/// # Errors
/// [`ConfigError::InvalidRepository`] for malformed input,
/// [`ConfigError::RepositoryNotFound`] when the tracker does not know it.
pub async fn validate_repo<T: RemoteTracker + ?Sized>(tracker: &T, input: &str) -> Result<RepoId> {
    let repo: RepoId = input.parse().map_err(ConfigError::from)?;

    match tracker.validate_repo(&repo).await {
        Ok(()) => Ok(repo),
        Err(crate::tracker::TrackerError::NotFound { .. }) => Err(ConfigError::RepositoryNotFound {
            repo: repo.to_string(),
        }
        .into()),
        Err(e) => Err(SyncError::from(e)),
    }
}
