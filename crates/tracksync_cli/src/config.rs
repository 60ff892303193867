//! Configuration file support for tracksync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `TRACKSYNC_`, e.g., `TRACKSYNC_DATABASE_URL`)
//! 2. Local config file (./tracksync.toml)
//! 3. User config file (~/.config/tracksync/config.toml)
//! 4. Built-in defaults
//!
//! `GITHUB_PAT` is honored as a token when no other source sets one.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/tracksync/tracksync.db"  # optional, this is the default
//!
//! [github]
//! token = "ghp_..."  # or use TRACKSYNC_GITHUB_TOKEN env var
//! api_url = "https://github.example.com/api/v3"  # GitHub Enterprise
//! requests_per_second = 10  # 0 disables pacing
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use tracksync::github::{DEFAULT_API_URL, GitHubConfig as TrackerConfig};
use tracksync::tracker::rate_limits;

/// Environment variables whose names contain an underscore inside a key.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("TRACKSYNC_GITHUB_API_URL", "github.api_url"),
    (
        "TRACKSYNC_GITHUB_REQUESTS_PER_SECOND",
        "github.requests_per_second",
    ),
];

/// Fallback token variable.
const LEGACY_TOKEN_VAR: &str = "GITHUB_PAT";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// GitHub configuration.
    pub github: GitHubConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    pub token: Option<String>,
    /// REST API root.
    pub api_url: String,
    /// Proactive request pacing; 0 disables it.
    pub requests_per_second: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            requests_per_second: rate_limits::GITHUB_DEFAULT_RPS,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Errors in any source are logged and the defaults are used instead.
    pub fn load() -> Self {
        let mut config = match Self::build(Self::default_config_path(), Some("tracksync.toml".into()))
        {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {}", e);
                Config::default()
            }
        };

        if config.github.token.is_none() {
            config.github.token = std::env::var(LEGACY_TOKEN_VAR)
                .ok()
                .filter(|t| !t.trim().is_empty());
        }
        config
    }

    fn build(user: Option<PathBuf>, local: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        for path in [user, local].into_iter().flatten() {
            if path.exists() {
                tracing::debug!("Loading config from {:?}", path);
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
            }
        }

        // e.g., TRACKSYNC_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("TRACKSYNC")
                .separator("_")
                .try_parsing(true),
        );
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        builder.build()?.try_deserialize()
    }

    /// Get the database URL, falling back to the default state directory path.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("tracksync.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Connection settings for the GitHub client.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            token: self.github.token.clone(),
            api_url: self.github.api_url.clone(),
            requests_per_second: (self.github.requests_per_second > 0)
                .then_some(self.github.requests_per_second),
        }
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tracksync").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/tracksync` or `~/.local/state/tracksync`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tracksync").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}
