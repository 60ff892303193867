use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::prelude::*;

use super::errors::{Result, StoreError};
use super::types::{ActivityEntry, Issue, IssueFilter, IssuePatch, NewIssue, Project};
use super::{ActivityLog, IssueStore};

/// Issue store backed by the sea-orm entities.
#[derive(Debug)]
pub struct DbStore {
    db: DatabaseConnection,
}

/// Data for inserting a new project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub github_repo: Option<String>,
}

impl DbStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert a project.
    pub async fn create_project(&self, data: NewProject) -> Result<Project> {
        let now = Utc::now().fixed_offset();
        let model = ProjectActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name),
            description: Set(data.description),
            github_repo: Set(data.github_repo),
            github_synced_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = model.insert(&self.db).await?;
        Ok(project_from_model(model))
    }

    /// Load a single issue.
    pub async fn get_issue(&self, id: Uuid) -> Result<Option<Issue>> {
        IssueEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(issue_from_model)
            .transpose()
    }

    /// Activity entries of an issue, oldest first.
    pub async fn activities(&self, issue_id: Uuid) -> Result<Vec<IssueActivityModel>> {
        IssueActivityEntity::find()
            .filter(IssueActivityColumn::IssueId.eq(issue_id))
            .order_by_asc(IssueActivityColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl IssueStore for DbStore {
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        let model = ProjectEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(project_from_model))
    }

    async fn find_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let mut query = IssueEntity::find().filter(IssueColumn::ProjectId.eq(filter.project_id));
        query = match filter.linked {
            Some(true) => query.filter(IssueColumn::GithubIssueNumber.is_not_null()),
            Some(false) => query.filter(IssueColumn::GithubIssueNumber.is_null()),
            None => query,
        };

        let models = query
            .order_by_asc(IssueColumn::CreatedAt)
            .order_by_asc(IssueColumn::Id)
            .all(&self.db)
            .await?;

        // Timestamps are compared in Rust: SQLite stores them as text with an
        // offset, which does not order reliably across offsets.
        let mut issues = Vec::with_capacity(models.len());
        for model in models {
            let issue = issue_from_model(model)?;
            if filter.matches(&issue) {
                issues.push(issue);
            }
        }
        Ok(issues)
    }

    async fn create_issue(&self, data: NewIssue) -> Result<Issue> {
        if data.title.trim().is_empty() {
            return Err(StoreError::invalid_input("issue title must not be empty"));
        }

        let now = Utc::now();
        let model = IssueActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(data.project_id),
            title: Set(data.title),
            description: Set(data.description),
            issue_type: Set(data.issue_type),
            priority: Set(data.priority),
            status: Set(data.status),
            labels: Set(serde_json::json!(data.labels)),
            assignees: Set(serde_json::json!(data.assignees)),
            github_issue_number: Set(data.github_issue_number),
            github_state: Set(data.github_state),
            created_at: Set(now.fixed_offset()),
            updated_at: Set(data.updated_at.unwrap_or(now).fixed_offset()),
        };
        let model = model.insert(&self.db).await?;
        issue_from_model(model)
    }

    async fn update_issue(&self, id: Uuid, patch: IssuePatch) -> Result<Issue> {
        let model = IssueEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::issue_not_found(id))?;

        if patch.is_empty() {
            return issue_from_model(model);
        }

        let mut active = model.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(issue_type) = patch.issue_type {
            active.issue_type = Set(issue_type);
        }
        if let Some(priority) = patch.priority {
            active.priority = Set(priority);
        }
        if let Some(labels) = patch.labels {
            active.labels = Set(serde_json::json!(labels));
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(number) = patch.github_issue_number {
            active.github_issue_number = Set(Some(number));
        }
        if let Some(state) = patch.github_state {
            active.github_state = Set(Some(state));
        }
        if let Some(updated_at) = patch.updated_at {
            active.updated_at = Set(updated_at.fixed_offset());
        }

        let model = active.update(&self.db).await?;
        issue_from_model(model)
    }

    async fn set_watermark(&self, project_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let model = ProjectEntity::find_by_id(project_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::project_not_found(project_id))?;

        let mut active = model.into_active_model();
        active.github_synced_at = Set(Some(at.fixed_offset()));
        active.update(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl ActivityLog for DbStore {
    async fn record(&self, entry: ActivityEntry) -> Result<()> {
        let model = IssueActivityActiveModel {
            id: Set(Uuid::new_v4()),
            issue_id: Set(entry.issue_id),
            action: Set(entry.action),
            field: Set(entry.field),
            old_value: Set(entry.old_value),
            new_value: Set(entry.new_value),
            created_at: Set(Utc::now().fixed_offset()),
        };
        model.insert(&self.db).await?;
        Ok(())
    }
}

// ─── Model Conversion ────────────────────────────────────────────────────────

fn project_from_model(model: ProjectModel) -> Project {
    Project {
        id: model.id,
        name: model.name,
        github_repo: model.github_repo,
        last_synced_at: model.github_synced_at.map(|at| at.with_timezone(&Utc)),
    }
}

fn issue_from_model(model: IssueModel) -> Result<Issue> {
    let labels = string_list("labels", model.labels)?;
    let assignees = string_list("assignees", model.assignees)?;

    Ok(Issue {
        id: model.id,
        project_id: model.project_id,
        title: model.title,
        description: model.description,
        issue_type: model.issue_type,
        priority: model.priority,
        labels,
        assignees,
        status: model.status,
        github_issue_number: model.github_issue_number,
        github_state: model.github_state,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn string_list(field: &str, value: serde_json::Value) -> Result<Vec<String>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value)
        .map_err(|e| StoreError::invalid_input(format!("{field} is not a list of strings: {e}")))
}
