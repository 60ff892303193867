use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur when talking to a remote issue tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// API error from the tracker.
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// The tracker throttled the request. Transient; see [`crate::retry`].
    #[error("Throttled by remote tracker")]
    Throttled {
        /// Value of the `Retry-After` header, if sent.
        retry_after: Option<Duration>,
        /// Reset time of the exhausted quota, if sent.
        reset_at: Option<DateTime<Utc>>,
    },

    /// Rate limit exceeded beyond the bounded backoff. Fatal to a sync run.
    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    /// The resource already exists (e.g. a label with the same name).
    #[error("Already exists: {resource}")]
    AlreadyExists { resource: String },

    /// Resource not found (repository, issue, etc.).
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Authentication required or failed.
    #[error("Authentication required")]
    AuthRequired,

    /// Network or connection error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Unexpected/internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TrackerError {
    /// Create an API error.
    #[inline]
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a throttling error.
    #[inline]
    pub fn throttled(retry_after: Option<Duration>, reset_at: Option<DateTime<Utc>>) -> Self {
        Self::Throttled {
            retry_after,
            reset_at,
        }
    }

    /// Create an already-exists error.
    #[inline]
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource: resource.into(),
        }
    }

    /// Create a not found error.
    #[inline]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a network error.
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create an internal error.
    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a transient throttling response.
    #[inline]
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }

    /// Check if this error must abort a sync run.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    #[inline]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message, which keeps summaries readable
/// when an error carries a multi-line response body.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
