//! Bounded backoff for throttled tracker calls.
//!
//! A throttled call is retried exactly once, through `backon`, when the
//! tracker asks for a short wait. Longer waits, or a second throttle, become
//! [`TrackerError::RateLimited`], which aborts a sync run.

use std::future::Future;
use std::time::Duration;

use backon::{ConstantBuilder, Retryable};
use chrono::{DateTime, Utc};

use crate::tracker::{Result, TrackerError};

/// Longest wait the guard sleeps through before giving up.
pub const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Added to every computed wait so the retry lands after the reset.
pub const RATE_LIMIT_MARGIN: Duration = Duration::from_secs(1);

/// Wait requested by a throttling error.
///
/// `Retry-After` wins over the reset timestamp. Reset times are rounded up to
/// whole seconds; a reset in the past yields zero. `None` when the error
/// carries no metadata or is not a throttling error.
pub fn throttle_wait(err: &TrackerError, now: DateTime<Utc>) -> Option<Duration> {
    let TrackerError::Throttled {
        retry_after,
        reset_at,
    } = err
    else {
        return None;
    };

    if let Some(retry_after) = retry_after {
        return Some(*retry_after);
    }

    reset_at.map(|reset_at| {
        let millis = (reset_at - now).num_milliseconds();
        if millis <= 0 {
            Duration::ZERO
        } else {
            Duration::from_secs((millis as u64).div_ceil(1000))
        }
    })
}

/// Convert a throttling error into the fatal rate-limit error.
fn into_rate_limited(err: TrackerError, now: DateTime<Utc>) -> TrackerError {
    match err {
        TrackerError::Throttled {
            reset_at: Some(reset_at),
            ..
        } => TrackerError::RateLimited { reset_at },
        TrackerError::Throttled {
            retry_after: Some(retry_after),
            ..
        } => TrackerError::RateLimited {
            reset_at: now
                + chrono::Duration::from_std(retry_after).unwrap_or(chrono::Duration::zero()),
        },
        TrackerError::Throttled { .. } => TrackerError::RateLimited { reset_at: now },
        other => other,
    }
}

/// Backoff of the guard: a single retry.
///
/// The delay itself comes from the throttling error, see
/// [`with_rate_limit_retry`].
#[must_use]
pub fn single_retry() -> ConstantBuilder {
    ConstantBuilder::default()
        .with_delay(RATE_LIMIT_MARGIN)
        .with_max_times(1)
}

/// Whether a throttled call may be retried: the requested wait must stay
/// within [`MAX_RATE_LIMIT_WAIT`].
fn is_short_throttle(err: &TrackerError) -> bool {
    err.is_throttled()
        && throttle_wait(err, Utc::now()).is_none_or(|wait| wait <= MAX_RATE_LIMIT_WAIT)
}

/// Run a tracker call, retrying once after a short throttle.
///
/// - not throttled: the result is returned as is
/// - wait above [`MAX_RATE_LIMIT_WAIT`]: `RateLimited` without retrying
/// - otherwise: sleep `wait + RATE_LIMIT_MARGIN` and call again; a second
///   throttle becomes `RateLimited`
///
/// # Example
///
/// ```ignore
/// use tracksync::retry::with_rate_limit_retry;
///
/// let issues = with_rate_limit_retry("list_issues", || client.list_issues(&repo)).await?;
/// ```
pub async fn with_rate_limit_retry<T, F, Fut>(operation: &str, call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let result = call
        .retry(single_retry())
        .when(is_short_throttle)
        .adjust(|err, delay| {
            let wait = throttle_wait(err, Utc::now()).unwrap_or(Duration::ZERO);
            delay.map(|_| wait + RATE_LIMIT_MARGIN)
        })
        .notify(|_, delay| {
            tracing::warn!(
                operation,
                delay_ms = delay.as_millis() as u64,
                "Throttled by remote tracker, retrying once"
            );
        })
        .await;

    match result {
        Err(err) if err.is_throttled() => {
            tracing::warn!(operation, "Rate limit outlasts the bounded backoff, giving up");
            Err(into_rate_limited(err, Utc::now()))
        }
        other => other,
    }
}
