//! tracksync - bidirectional sync between a local Kanban issue store and
//! GitHub issues.
//!
//! Local issues carry a type, a priority, free-form labels and a status. On
//! the remote side they become plain issues whose labels encode type and
//! priority (`type:bug`, `priority:high`). A [`Synchronizer`] run pushes
//! local creations and edits, pulls remote state and new issues, and settles
//! concurrent edits by last write wins.
//!
//! # Features
//!
//! - `github` - The [`github::GitHubTracker`] client.
//! - `sqlite` / `postgres` - Database backends for [`store::DbStore`].
//! - `migrate` - Enables database migration support. When enabled, you can use
//!   [`connect_and_migrate`] to automatically run migrations on connection.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tracksync::{connect_and_migrate, store::DbStore, sync::Synchronizer};
//! use tracksync::github::{GitHubConfig, GitHubTracker};
//!
//! let db = connect_and_migrate("sqlite://tracksync.db?mode=rwc").await?;
//! let store = Arc::new(DbStore::new(db));
//! let tracker = Arc::new(GitHubTracker::new(GitHubConfig::with_token(token))?);
//!
//! let summary = Synchronizer::new(store.clone(), store, tracker)
//!     .sync(project_id, None)
//!     .await?;
//! ```

pub mod db;
pub mod entity;
pub mod labels;
pub mod repo_id;
pub mod retry;
pub mod store;
pub mod sync;
pub mod tracker;

#[cfg(feature = "github")]
pub mod github;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use repo_id::{InvalidRepoId, RepoId};
pub use store::{ActivityLog, DbStore, IssueStore, StoreError};
pub use sync::{ConfigError, SyncError, SyncSummary, Synchronizer};
pub use tracker::{RateLimitGuard, RemoteTracker, TrackerError};
