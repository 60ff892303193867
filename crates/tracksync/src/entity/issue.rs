//! Issue entity - a card on the board, optionally linked to a remote issue.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::github_state::GithubState;
use super::issue_status::IssueStatus;
use super::issue_type::IssueType;
use super::priority::Priority;

/// Issue model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning project. Never changes after insert.
    pub project_id: Uuid,

    // ─── Content ─────────────────────────────────────────────────────────────
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub issue_type: IssueType,
    pub priority: Priority,
    pub status: IssueStatus,
    /// Free-form labels (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub labels: serde_json::Value,
    /// Assignee usernames (JSON array of strings).
    #[sea_orm(column_type = "Json")]
    pub assignees: serde_json::Value,

    // ─── Remote Link ─────────────────────────────────────────────────────────
    /// Remote issue number; `None` until the issue is pushed.
    pub github_issue_number: Option<i64>,
    /// Last observed remote state.
    pub github_state: Option<GithubState>,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    pub created_at: DateTimeWithTimeZone,
    /// Last local edit; the conflict-detection clock.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An issue belongs to a project.
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
    /// An issue has many activity entries.
    #[sea_orm(has_many = "super::issue_activity::Entity")]
    Activities,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::issue_activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
