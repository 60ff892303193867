//! Project management commands.

use console::style;
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;
use tabled::Tabled;
use tracksync::store::{DbStore, NewProject};
use tracksync::{ProjectColumn, ProjectEntity, ProjectModel, RepoId, connect_and_migrate};

use super::{OutputFormat, print_rows};
use crate::ProjectAction;

/// Display struct for project listing.
#[derive(Debug, Clone, Serialize, Tabled)]
struct ProjectDisplay {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Repository")]
    repository: String,
    #[tabled(rename = "Last Sync")]
    last_synced_at: String,
}

impl From<&ProjectModel> for ProjectDisplay {
    fn from(project: &ProjectModel) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name.clone(),
            repository: project.github_repo.clone().unwrap_or_else(|| "-".to_string()),
            last_synced_at: project
                .github_synced_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Handle project management commands.
pub(crate) async fn handle_project(
    action: ProjectAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = connect_and_migrate(database_url).await?;

    match action {
        ProjectAction::Add {
            name,
            repo,
            description,
        } => {
            // Reject malformed repositories early; existence is checked on sync.
            if let Some(repo) = repo.as_deref() {
                repo.parse::<RepoId>()?;
            }

            let store = DbStore::new(db);
            let project = store
                .create_project(NewProject {
                    name,
                    description,
                    github_repo: repo.map(|r| r.trim().to_string()),
                })
                .await?;

            println!(
                "{} Added project '{}' ({})",
                style("✓").green().bold(),
                style(&project.name).cyan(),
                project.id
            );
        }
        ProjectAction::List { output } => {
            let projects = ProjectEntity::find()
                .order_by_asc(ProjectColumn::CreatedAt)
                .all(&db)
                .await?;

            if projects.is_empty() && matches!(output, OutputFormat::Table) {
                println!("No projects. Add one with: tracksync project add <name> --repo <owner/repo>");
                return Ok(());
            }
            print_rows(projects.iter().map(ProjectDisplay::from).collect(), output)?;
        }
    }

    Ok(())
}
