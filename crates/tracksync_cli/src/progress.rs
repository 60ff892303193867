//! Progress reporting for sync runs.
//!
//! Two modes, as for every long-running command:
//! - Interactive mode (TTY): a spinner using indicatif
//! - Logging mode (non-TTY): structured logging using tracing

use std::sync::Mutex;
use std::time::Duration;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use tracksync::sync::{ProgressCallback, Side, SyncProgress};

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Spinner for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging,
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging => log_event(event),
        }
    }

    /// Finish the spinner (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a shared reporter into the library's callback type.
pub fn callback(reporter: std::sync::Arc<ProgressReporter>) -> ProgressCallback {
    Box::new(move |event| reporter.handle(event))
}

/// Counters shown next to the spinner.
#[derive(Default)]
struct Tally {
    created: usize,
    updated: usize,
    imported: usize,
    pulled: usize,
}

/// Interactive reporter showing the current stage and running counts.
pub struct InteractiveReporter {
    spinner: ProgressBar,
    tally: Mutex<Tally>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self {
            spinner,
            tally: Mutex::new(Tally::default()),
        }
    }

    pub fn handle(&self, event: SyncProgress) {
        let Ok(mut tally) = self.tally.lock() else {
            return;
        };

        match event {
            SyncProgress::Stage { stage } => {
                self.spinner.set_prefix(format!("{:24}", stage.to_string()));
            }
            SyncProgress::SnapshotFetched { issues } => {
                self.spinner
                    .println(format!("  {} remote issues", style(issues).cyan()));
            }
            SyncProgress::LabelCreated { name } => {
                self.spinner
                    .println(format!("  {} label {}", style("+").green(), style(name).cyan()));
            }
            SyncProgress::IssueCreated { .. } => tally.created += 1,
            SyncProgress::IssueUpdated { .. } => tally.updated += 1,
            SyncProgress::IssueImported { .. } => tally.imported += 1,
            SyncProgress::IssuePulled { .. } => tally.pulled += 1,
            SyncProgress::Conflict { number, winner } => {
                let side = match winner {
                    Side::Local => "local",
                    Side::Remote => "remote",
                };
                self.spinner.println(format!(
                    "  {} #{} edited on both sides, keeping {}",
                    style("!").yellow(),
                    number,
                    side
                ));
            }
            SyncProgress::ItemFailed { error } => {
                self.spinner
                    .println(format!("  {} {}", style("✗").red(), error));
            }
            _ => {}
        }

        self.spinner.set_message(format!(
            "{} created, {} updated, {} imported, {} pulled",
            tally.created, tally.updated, tally.imported, tally.pulled
        ));
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn log_event(event: SyncProgress) {
    match event {
        SyncProgress::Stage { stage } => tracing::debug!(%stage, "Stage"),
        SyncProgress::SnapshotFetched { issues } => {
            tracing::info!(issues, "Fetched remote issues");
        }
        SyncProgress::LabelCreated { name } => tracing::info!(label = %name, "Created label"),
        SyncProgress::IssueCreated { title, number } => {
            tracing::info!(number, title = %title, "Created remote issue");
        }
        SyncProgress::IssueUpdated { number } => tracing::info!(number, "Updated remote issue"),
        SyncProgress::IssueImported { number, title } => {
            tracing::info!(number, title = %title, "Imported remote issue");
        }
        SyncProgress::IssuePulled { number, fields } => {
            tracing::info!(number, fields, "Pulled remote changes");
        }
        SyncProgress::Conflict { number, winner } => {
            tracing::info!(number, winner = ?winner, "Resolved conflict");
        }
        SyncProgress::ItemFailed { error } => tracing::warn!(error = %error, "Item failed"),
        _ => {}
    }
}
