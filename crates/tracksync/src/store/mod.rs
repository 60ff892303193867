//! Persistent issue store and activity log.
//!
//! The sync engine only talks to the [`IssueStore`] and [`ActivityLog`]
//! traits; [`DbStore`] implements both over a sea-orm connection.

mod db_store;
mod errors;
mod types;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use db_store::{DbStore, NewProject};
pub use errors::{Result, StoreError};
pub use types::{ActivityEntry, Issue, IssueFilter, IssuePatch, NewIssue, Project};

/// Project and issue persistence used by a sync run.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Load a project, `None` if it does not exist.
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;

    /// Issues matching `filter`, oldest first.
    async fn find_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>>;

    /// Insert an issue and return the stored record.
    async fn create_issue(&self, data: NewIssue) -> Result<Issue>;

    /// Apply a partial update atomically and return the stored record.
    async fn update_issue(&self, id: Uuid, patch: IssuePatch) -> Result<Issue>;

    /// Persist the sync watermark of a project.
    async fn set_watermark(&self, project_id: Uuid, at: DateTime<Utc>) -> Result<()>;
}

/// Append-only audit trail.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, entry: ActivityEntry) -> Result<()>;
}
