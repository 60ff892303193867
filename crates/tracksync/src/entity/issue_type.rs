//! Issue type enum, also encoded as the reserved `type:` label.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of work an issue tracks.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum IssueType {
    #[sea_orm(string_value = "TASK")]
    #[default]
    Task,
    #[sea_orm(string_value = "STORY")]
    Story,
    #[sea_orm(string_value = "BUG")]
    Bug,
    #[sea_orm(string_value = "DOCS")]
    Docs,
}

impl IssueType {
    /// Lowercase name used after the `type:` label prefix.
    pub fn label_value(self) -> &'static str {
        match self {
            IssueType::Task => "task",
            IssueType::Story => "story",
            IssueType::Bug => "bug",
            IssueType::Docs => "docs",
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::Task => write!(f, "Task"),
            IssueType::Story => write!(f, "Story"),
            IssueType::Bug => write!(f, "Bug"),
            IssueType::Docs => write!(f, "Docs"),
        }
    }
}

impl std::str::FromStr for IssueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task" => Ok(IssueType::Task),
            "story" => Ok(IssueType::Story),
            "bug" => Ok(IssueType::Bug),
            "docs" => Ok(IssueType::Docs),
            _ => Err(format!("Unknown issue type: {}", s)),
        }
    }
}
