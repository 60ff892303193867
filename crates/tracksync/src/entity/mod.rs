//! SeaORM entity definitions for the tracksync database schema.

pub mod activity_action;
pub mod github_state;
pub mod issue;
pub mod issue_activity;
pub mod issue_status;
pub mod issue_type;
pub mod prelude;
pub mod priority;
pub mod project;
