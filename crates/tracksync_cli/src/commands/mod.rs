pub(crate) mod limits;
pub(crate) mod migrate;
pub(crate) mod project;
pub(crate) mod sync;
pub(crate) mod validate;

use clap::ValueEnum;
use serde::Serialize;
use tabled::Tabled;

/// Output format for tabular command output.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// Print rows as a rounded table or pretty JSON.
pub(crate) fn print_rows<T: Tabled + Serialize>(
    rows: Vec<T>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Table => {
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

/// Build a GitHub tracker from configuration.
pub(crate) fn github_tracker(
    config: &crate::config::Config,
) -> Result<tracksync::github::GitHubTracker, Box<dyn std::error::Error>> {
    Ok(tracksync::github::GitHubTracker::new(config.tracker_config())?)
}
