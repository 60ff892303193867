//! Domain records exchanged with the issue store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entity::prelude::{ActivityAction, GithubState, IssueStatus, IssueType, Priority};

/// A project as seen by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    /// Configured remote repository (`owner/repo`), unvalidated.
    pub github_repo: Option<String>,
    /// Watermark of the previous sync run.
    pub last_synced_at: Option<DateTime<Utc>>,
}

/// A local issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub issue_type: IssueType,
    pub priority: Priority,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub status: IssueStatus,
    pub github_issue_number: Option<i64>,
    pub github_state: Option<GithubState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Whether the issue has been pushed to the remote tracker.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.github_issue_number.is_some()
    }
}

/// Data for inserting a new issue.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub issue_type: IssueType,
    pub priority: Priority,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub status: IssueStatus,
    pub github_issue_number: Option<i64>,
    pub github_state: Option<GithubState>,
    /// Explicit modification time; defaults to now.
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewIssue {
    /// Start a new issue with defaults for everything but the title.
    pub fn new(project_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update of an issue. `None` fields are left untouched.
///
/// `updated_at` only moves when it is set explicitly, so writes made by the
/// sync engine do not look like local edits to the next run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub issue_type: Option<IssueType>,
    pub priority: Option<Priority>,
    pub labels: Option<Vec<String>>,
    pub status: Option<IssueStatus>,
    pub github_issue_number: Option<i64>,
    pub github_state: Option<GithubState>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl IssuePatch {
    /// True if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Query filter for [`IssueStore::find_issues`](super::IssueStore::find_issues).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFilter {
    pub project_id: Uuid,
    /// `Some(true)` for pushed issues only, `Some(false)` for never-pushed only.
    pub linked: Option<bool>,
    /// Only issues modified strictly after this instant.
    pub updated_after: Option<DateTime<Utc>>,
}

impl IssueFilter {
    /// All issues of a project.
    pub fn project(project_id: Uuid) -> Self {
        Self {
            project_id,
            linked: None,
            updated_after: None,
        }
    }

    /// Restrict to linked (`true`) or unlinked (`false`) issues.
    #[must_use]
    pub fn linked(mut self, linked: bool) -> Self {
        self.linked = Some(linked);
        self
    }

    /// Restrict to issues modified after `at`, if given.
    #[must_use]
    pub fn updated_after(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.updated_after = at;
        self
    }

    /// Check an issue against the filter.
    pub fn matches(&self, issue: &Issue) -> bool {
        issue.project_id == self.project_id
            && self.linked.is_none_or(|linked| issue.is_linked() == linked)
            && self.updated_after.is_none_or(|at| issue.updated_at > at)
    }
}

/// One audit entry for the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub issue_id: Uuid,
    pub action: ActivityAction,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl ActivityEntry {
    /// Entry without a field change.
    pub fn new(issue_id: Uuid, action: ActivityAction) -> Self {
        Self {
            issue_id,
            action,
            field: None,
            old_value: None,
            new_value: None,
        }
    }

    /// Attach a field change to the entry.
    #[must_use]
    pub fn with_change(
        mut self,
        field: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        self.field = Some(field.into());
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }
}
