//! Remote issue tracker abstraction.
//!
//! This module defines the [`RemoteTracker`] trait the sync engine talks to,
//! the [`TrackerError`] taxonomy and the [`RateLimitGuard`] decorator.
//!
//! # Example
//!
//! ```ignore
//! use tracksync::tracker::{RemoteTracker, TrackerError};
//! use tracksync::RepoId;
//!
//! async fn count_open<T: RemoteTracker>(tracker: &T, repo: &RepoId) -> Result<usize, TrackerError> {
//!     let issues = tracker.list_issues(repo).await?;
//!     Ok(issues.iter().filter(|i| !i.is_pull_request).count())
//! }
//! ```

mod errors;
mod guard;
#[cfg(feature = "github")]
mod rate_limit;
mod types;

pub use errors::{Result, TrackerError, short_error_message};
pub use guard::RateLimitGuard;
#[cfg(feature = "github")]
pub use rate_limit::{ApiRateLimiter, rate_limits};
pub use types::{
    NewRemoteIssue, NewRemoteLabel, RateLimitInfo, RemoteIssue, RemoteIssueUpdate, RemoteLabel,
    RemoteTracker,
};
