//! Sync command.

use std::sync::Arc;

use console::{Term, style};
use serde::Serialize;
use tabled::Tabled;
use tracksync::store::DbStore;
use tracksync::{SyncError, SyncSummary, Synchronizer, connect_and_migrate};
use uuid::Uuid;

use super::{OutputFormat, print_rows};
use crate::config::Config;
use crate::progress::{ProgressReporter, callback};

/// One row of the summary table.
#[derive(Debug, Clone, Serialize, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Created")]
    created: usize,
    #[tabled(rename = "Updated")]
    updated: usize,
    #[tabled(rename = "Imported")]
    imported: usize,
    #[tabled(rename = "Pulled")]
    pulled: usize,
    #[tabled(rename = "Labels")]
    labels_created: usize,
    #[tabled(rename = "Conflicts")]
    conflicts: usize,
    #[tabled(rename = "Errors")]
    errors: usize,
}

impl From<&SyncSummary> for SummaryRow {
    fn from(summary: &SyncSummary) -> Self {
        Self {
            created: summary.created,
            updated: summary.updated,
            imported: summary.imported,
            pulled: summary.pulled,
            labels_created: summary.labels_created,
            conflicts: summary.conflicts,
            errors: summary.errors.len(),
        }
    }
}

/// Run one sync of a project and print the summary.
pub(crate) async fn handle_sync(
    project_id: Uuid,
    output: OutputFormat,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_and_migrate(database_url).await?;
    let store = Arc::new(DbStore::new(db));
    let tracker = Arc::new(super::github_tracker(config)?);
    let synchronizer = Synchronizer::new(store.clone(), store, tracker);

    let reporter = Arc::new(ProgressReporter::new());
    let on_progress = callback(Arc::clone(&reporter));
    let result = synchronizer.sync(project_id, Some(&on_progress)).await;
    reporter.finish();

    let summary = match result {
        Ok(summary) => summary,
        Err(SyncError::RateLimited { reset_at }) => {
            return Err(format!(
                "GitHub rate limit exhausted; try again after {}",
                reset_at.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "created": summary.created,
                    "updated": summary.updated,
                    "imported": summary.imported,
                    "pulled": summary.pulled,
                    "labels_created": summary.labels_created,
                    "conflicts": summary.conflicts,
                    "errors": summary.errors,
                    "synced_at": summary.synced_at,
                }))?
            );
        }
        OutputFormat::Table => print_summary(&summary)?,
    }

    Ok(())
}

fn print_summary(summary: &SyncSummary) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();

    if summary.is_noop() && summary.errors.is_empty() {
        println!("{} Already up to date", style("✓").green().bold());
    } else {
        print_rows(vec![SummaryRow::from(summary)], OutputFormat::Table)?;
    }

    for error in &summary.errors {
        if is_tty {
            println!("  {} {}", style("✗").red(), error);
        } else {
            tracing::warn!(error = %error, "Sync item failed");
        }
    }

    if summary.synced_at.is_none() {
        println!(
            "{} Remote state was not fully read; the sync watermark was not advanced.",
            style("!").yellow().bold()
        );
    }
    Ok(())
}
