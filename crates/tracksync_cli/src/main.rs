//! tracksync CLI - keep a local Kanban board in sync with GitHub issues.

mod commands;
mod config;
mod progress;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::commands::OutputFormat;

#[derive(Parser)]
#[command(name = "tracksync")]
#[command(version)]
#[command(about = "Bidirectional sync between a local issue board and GitHub issues")]
#[command(
    long_about = "tracksync keeps the issues of a local Kanban project in sync with a GitHub \
repository. Local issue type and priority travel as `type:` and `priority:` labels; \
edits made on both sides since the last run are settled by last write wins."
)]
#[command(after_long_help = r#"EXAMPLES
    Create a project linked to a repository:
        $ tracksync project add "Widgets" --repo octo/widgets

    Sync a project:
        $ tracksync sync 6f1c2b9e-0c1d-4a57-a5f4-1e2d3c4b5a69

    Check that a repository exists and is reachable:
        $ tracksync validate-repo octo/widgets

CONFIGURATION
    tracksync reads configuration from:
      1. ~/.config/tracksync/config.toml (or $XDG_CONFIG_HOME/tracksync/config.toml)
      2. ./tracksync.toml
      3. Environment variables (TRACKSYNC_* prefix, e.g., TRACKSYNC_GITHUB_TOKEN)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    TRACKSYNC_DATABASE_URL                  Database connection string (default: ~/.local/state/tracksync/tracksync.db)
    TRACKSYNC_GITHUB_TOKEN                  GitHub personal access token
    TRACKSYNC_GITHUB_API_URL                GitHub API URL (default: https://api.github.com)
    TRACKSYNC_GITHUB_REQUESTS_PER_SECOND    Proactive request pacing, 0 disables (default: 10)
    GITHUB_PAT                              Fallback GitHub token
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize a project with its GitHub repository
    Sync {
        /// Project ID
        project_id: Uuid,

        /// Output format for the summary
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Manage local projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Check that a repository is well-formed and accessible
    ValidateRepo {
        /// Repository in owner/repo form
        repo: String,
    },
    /// Show current GitHub rate limit status
    Limits {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Add a project
    Add {
        /// Project name
        name: String,

        /// Linked GitHub repository (owner/repo)
        #[arg(short, long)]
        repo: Option<String>,

        /// Project description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List projects
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only when not attached to a terminal
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("tracksync=info,tracksync_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();
    let cli = Cli::parse();

    // Commands that only talk to GitHub
    match &cli.command {
        Commands::ValidateRepo { repo } => {
            return commands::validate::handle_validate_repo(repo, &config).await;
        }
        Commands::Limits { output } => {
            return commands::limits::handle_limits(*output, &config).await;
        }
        _ => {}
    }

    let database_url = config
        .database_url()
        .ok_or("Could not determine a database location; set TRACKSYNC_DATABASE_URL")?;
    ensure_sqlite_dir(&database_url)?;

    match cli.command {
        Commands::Sync { project_id, output } => {
            commands::sync::handle_sync(project_id, output, &config, &database_url).await?;
        }
        Commands::Project { action } => {
            commands::project::handle_project(action, &database_url).await?;
        }
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::ValidateRepo { .. } | Commands::Limits { .. } => {}
    }

    Ok(())
}

/// Create the parent directory of a SQLite database file.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    // Strip query parameters (e.g., ?mode=rwc) before path operations
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if db_path.is_relative() && !db_path.as_os_str().is_empty() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory. \
             Consider using an absolute path.",
            db_path.display()
        );
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
