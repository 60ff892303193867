//! Project entity - owns issues and carries the sync watermark.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Free-form description.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Linked remote repository in `owner/repo` form.
    pub github_repo: Option<String>,

    /// Start time of the last completed sync run (the watermark).
    pub github_synced_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A project has many issues.
    #[sea_orm(has_many = "super::issue::Entity")]
    Issues,
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
