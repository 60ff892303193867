//! Repository validation command.

use console::style;
use tracksync::sync::validate_repo;

use crate::config::Config;

/// Check a repository string and its existence on GitHub.
pub(crate) async fn handle_validate_repo(
    repo: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = super::github_tracker(config)?;
    let repo = validate_repo(&tracker, repo).await?;

    println!(
        "{} Repository {} is accessible",
        style("✓").green().bold(),
        style(&repo).cyan()
    );
    Ok(())
}
