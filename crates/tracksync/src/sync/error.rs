//! Terminal failures of a sync run.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::repo_id::InvalidRepoId;
use crate::store::StoreError;
use crate::tracker::TrackerError;

/// Configuration problems detected before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Project not found: {project_id}")]
    ProjectNotFound { project_id: Uuid },

    #[error("Project has no GitHub repository configured")]
    MissingRepository,

    #[error(transparent)]
    InvalidRepository(#[from] InvalidRepoId),

    #[error("GitHub repository not found or not accessible: {repo}")]
    RepositoryNotFound { repo: String },

    #[error("No GitHub access token configured")]
    MissingCredential,
}

/// Errors that abort a sync run.
///
/// Per-item failures never surface here; they are collected in
/// [`SyncSummary::errors`](super::SyncSummary::errors).
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Remote tracker error: {0}")]
    Remote(TrackerError),
}

impl From<TrackerError> for SyncError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::RateLimited { reset_at } => SyncError::RateLimited { reset_at },
            other => SyncError::Remote(other),
        }
    }
}

impl SyncError {
    /// Reset time when the run was aborted by rate limiting.
    pub fn rate_limit_reset(&self) -> Option<DateTime<Utc>> {
        match self {
            SyncError::RateLimited { reset_at } => Some(*reset_at),
            _ => None,
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
