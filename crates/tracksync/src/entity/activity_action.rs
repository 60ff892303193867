//! Kinds of audit entries written for an issue.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Action recorded in the issue activity log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ActivityAction {
    #[sea_orm(string_value = "CREATED")]
    Created,
    #[sea_orm(string_value = "STATUS_CHANGED")]
    StatusChanged,
    #[sea_orm(string_value = "EDITED")]
    Edited,
    #[sea_orm(string_value = "SYNCED")]
    Synced,
}
