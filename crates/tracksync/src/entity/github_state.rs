//! Open/closed state mirrored from the remote tracker.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::issue_status::IssueStatus;

/// Last observed state of the linked remote issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GithubState {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl GithubState {
    /// State a local issue should have remotely: closed iff it is done.
    pub fn for_status(status: IssueStatus) -> Self {
        if status == IssueStatus::Done {
            GithubState::Closed
        } else {
            GithubState::Open
        }
    }
}

impl std::fmt::Display for GithubState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GithubState::Open => write!(f, "open"),
            GithubState::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_done_maps_to_closed() {
        assert_eq!(GithubState::for_status(IssueStatus::Done), GithubState::Closed);
        assert_eq!(GithubState::for_status(IssueStatus::InProgress), GithubState::Open);
        assert_eq!(GithubState::for_status(IssueStatus::Backlog), GithubState::Open);
    }
}
