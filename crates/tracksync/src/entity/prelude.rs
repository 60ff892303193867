//! Common re-exports for convenient entity usage.

pub use super::activity_action::ActivityAction;
pub use super::github_state::GithubState;
pub use super::issue::{
    ActiveModel as IssueActiveModel, Column as IssueColumn, Entity as IssueEntity,
    Model as IssueModel,
};
pub use super::issue_activity::{
    ActiveModel as IssueActivityActiveModel, Column as IssueActivityColumn,
    Entity as IssueActivityEntity, Model as IssueActivityModel,
};
pub use super::issue_status::IssueStatus;
pub use super::issue_type::IssueType;
pub use super::priority::Priority;
pub use super::project::{
    ActiveModel as ProjectActiveModel, Column as ProjectColumn, Entity as ProjectEntity,
    Model as ProjectModel,
};
