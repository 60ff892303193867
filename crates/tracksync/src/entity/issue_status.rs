//! Local workflow stage of an issue.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kanban column an issue sits in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum IssueStatus {
    #[sea_orm(string_value = "BACKLOG")]
    #[default]
    Backlog,
    #[sea_orm(string_value = "TODO")]
    Todo,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "DONE")]
    Done,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueStatus::Backlog => write!(f, "Backlog"),
            IssueStatus::Todo => write!(f, "Todo"),
            IssueStatus::InProgress => write!(f, "InProgress"),
            IssueStatus::Done => write!(f, "Done"),
        }
    }
}
