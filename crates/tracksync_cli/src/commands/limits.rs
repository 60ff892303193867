//! Rate limit status command.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;
use tracksync::tracker::{RateLimitInfo, RemoteTracker};

use super::{OutputFormat, print_rows};
use crate::config::Config;

/// Rate limit information for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub(crate) struct RateLimitDisplay {
    #[tabled(rename = "Limit")]
    pub limit: String,
    #[tabled(rename = "Used")]
    pub used: String,
    #[tabled(rename = "Remaining")]
    pub remaining: String,
    #[tabled(rename = "Usage %")]
    pub usage_percent: String,
    #[tabled(rename = "Resets At")]
    pub reset_at: String,
    #[tabled(rename = "Resets In")]
    pub reset_in: String,
}

impl RateLimitDisplay {
    fn new(info: &RateLimitInfo, now: DateTime<Utc>) -> Self {
        let used = info.limit.saturating_sub(info.remaining);
        let usage_percent = if info.limit > 0 {
            (used as f64 / info.limit as f64) * 100.0
        } else {
            0.0
        };
        let reset_duration = info.reset_at.signed_duration_since(now);
        let reset_in = if reset_duration.num_seconds() > 0 {
            format_duration(reset_duration)
        } else {
            "now".to_string()
        };

        Self {
            limit: info.limit.to_string(),
            used: used.to_string(),
            remaining: info.remaining.to_string(),
            usage_percent: format!("{:.1}%", usage_percent),
            reset_at: info.reset_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            reset_in,
        }
    }
}

/// Show the core API quota.
pub(crate) async fn handle_limits(
    output: OutputFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = super::github_tracker(config)?;
    let info = tracker.rate_limit().await?;
    print_rows(vec![RateLimitDisplay::new(&info, Utc::now())], output)
}

/// Format a duration in a human-readable way.
fn format_duration(duration: chrono::Duration) -> String {
    let total_secs = duration.num_seconds();
    if total_secs < 60 {
        format!("{}s", total_secs)
    } else if total_secs < 3600 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    } else {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    }
}
