//! GitHub API error types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::tracker::TrackerError;

use super::types::GitHubErrorBody;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Throttled by GitHub")]
    Throttled {
        retry_after: Option<Duration>,
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("GitHub returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Parse `Retry-After` (seconds) from response headers.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Parse `X-RateLimit-Reset` (epoch seconds) from response headers.
pub fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
}

fn rate_limit_remaining(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

impl GitHubError {
    /// Classify a non-success response.
    ///
    /// 429 is always throttling. GitHub also answers 403 for exhausted
    /// primary quotas (`x-ratelimit-remaining: 0`) and secondary limits
    /// (`retry-after`), so a 403 carrying either header is throttling too.
    pub fn from_response(
        status: StatusCode,
        headers: &HeaderMap,
        body: &str,
        resource: &str,
    ) -> Self {
        let retry_after = retry_after(headers);
        let throttled = status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN
                && (rate_limit_remaining(headers) == Some(0) || retry_after.is_some()));
        if throttled {
            return Self::Throttled {
                retry_after,
                reset_at: rate_limit_reset(headers),
            };
        }

        let parsed: Option<GitHubErrorBody> = serde_json::from_str(body).ok();
        match status {
            StatusCode::UNAUTHORIZED => Self::AuthRequired,
            StatusCode::NOT_FOUND => Self::NotFound(resource.to_string()),
            StatusCode::UNPROCESSABLE_ENTITY
                if parsed.as_ref().is_some_and(GitHubErrorBody::is_already_exists) =>
            {
                Self::AlreadyExists(resource.to_string())
            }
            _ => Self::Status {
                status: status.as_u16(),
                message: parsed
                    .map(|b| b.message)
                    .unwrap_or_else(|| body.trim().to_string()),
            },
        }
    }
}

impl From<GitHubError> for TrackerError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Throttled {
                retry_after,
                reset_at,
            } => TrackerError::throttled(retry_after, reset_at),
            GitHubError::AuthRequired => TrackerError::AuthRequired,
            GitHubError::NotFound(resource) => TrackerError::not_found(resource),
            GitHubError::AlreadyExists(resource) => TrackerError::already_exists(resource),
            GitHubError::Status { status, message } => TrackerError::api(Some(status), message),
            GitHubError::Http(e) if e.is_connect() || e.is_timeout() => {
                TrackerError::network(e.to_string())
            }
            GitHubError::Http(e) => TrackerError::api(e.status().map(|s| s.as_u16()), e.to_string()),
            GitHubError::Octocrab(e) => octocrab_to_tracker(e),
            GitHubError::Internal(msg) => TrackerError::internal(msg),
        }
    }
}

/// Map octocrab failures onto the tracker taxonomy by HTTP status.
fn octocrab_to_tracker(err: octocrab::Error) -> TrackerError {
    match &err {
        octocrab::Error::GitHub { source, .. } => {
            classify_status(source.status_code.as_u16(), &source.message)
        }
        _ => TrackerError::api(None, err.to_string()),
    }
}

/// Classify a status and message when no response headers are available.
///
/// A 403 is throttling only when GitHub says so in the message; otherwise it
/// is a permission failure.
fn classify_status(status: u16, message: &str) -> TrackerError {
    match status {
        401 => TrackerError::AuthRequired,
        404 => TrackerError::not_found(message),
        429 => TrackerError::throttled(None, None),
        403 if message.to_lowercase().contains("rate limit") => {
            TrackerError::throttled(None, None)
        }
        status => TrackerError::api(Some(status), message),
    }
}
