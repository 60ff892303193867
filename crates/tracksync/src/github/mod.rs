//! GitHub implementation of the remote tracker.
//!
//! # Module Structure
//!
//! - [`error`] - Error types and response classification
//! - [`types`] - REST wire types
//! - [`client`] - [`GitHubTracker`], the [`RemoteTracker`](crate::tracker::RemoteTracker) implementation
//! - [`pagination`] - `Link` header parsing
//! - [`convert`] - Conversion to tracker types
//!
//! ```ignore
//! use tracksync::github::{GitHubConfig, GitHubTracker};
//!
//! let tracker = GitHubTracker::new(GitHubConfig::with_token(token))?;
//! let issues = tracker.list_issues(&"octo/widgets".parse()?).await?;
//! ```

mod client;
mod convert;
mod error;
mod pagination;
mod types;

pub use client::{GitHubConfig, GitHubTracker, create_client};
pub use convert::{github_state, to_remote_issue, to_remote_label};
pub use error::{GitHubError, rate_limit_reset, retry_after};
pub use pagination::{LinkPagination, parse_link_header};
pub use types::{DEFAULT_API_URL, GitHubIssue, GitHubLabel};
