use std::collections::{HashMap, HashSet};

use crate::entity::activity_action::ActivityAction;
use crate::entity::github_state::GithubState;
use crate::entity::issue_status::IssueStatus;
use crate::labels::{DecodedLabels, decode_labels};
use crate::store::{ActivityEntry, Issue, IssueFilter, IssuePatch, NewIssue};
use crate::tracker::RemoteIssue;

use super::super::conflict::Side;
use super::super::context::SyncContext;
use super::super::error::Result;
use super::super::progress::SyncProgress;
use super::Synchronizer;

/// Case-insensitive set equality of two label lists.
fn same_labels(a: &[String], b: &[String]) -> bool {
    let a: HashSet<String> = a.iter().map(|l| l.to_lowercase()).collect();
    let b: HashSet<String> = b.iter().map(|l| l.to_lowercase()).collect();
    a == b
}

fn join_labels(labels: &[String]) -> String {
    labels.join(", ")
}

/// Changes a remote issue implies for its local counterpart.
///
/// Each entry of `changes` is `(field, old, new)` for the activity log.
#[derive(Debug, Default)]
pub(super) struct RemoteDiff {
    pub patch: IssuePatch,
    pub changes: Vec<(&'static str, Option<String>, Option<String>)>,
    /// Set when a newly closed remote issue forces `Done`.
    pub forced_status: Option<IssueStatus>,
}

impl RemoteDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Diff state, type, priority and free-form labels.
pub(super) fn diff_remote(local: &Issue, remote: &RemoteIssue, decoded: &DecodedLabels) -> RemoteDiff {
    let mut diff = RemoteDiff::default();

    if local.github_state != Some(remote.state) {
        diff.patch.github_state = Some(remote.state);
        diff.changes.push((
            "githubState",
            local.github_state.map(|s| s.to_string()),
            Some(remote.state.to_string()),
        ));

        if remote.state == GithubState::Closed && local.status != IssueStatus::Done {
            diff.patch.status = Some(IssueStatus::Done);
            diff.forced_status = Some(IssueStatus::Done);
        }
    }

    if local.issue_type != decoded.issue_type {
        diff.patch.issue_type = Some(decoded.issue_type);
        diff.changes.push((
            "type",
            Some(local.issue_type.to_string()),
            Some(decoded.issue_type.to_string()),
        ));
    }

    if local.priority != decoded.priority {
        diff.patch.priority = Some(decoded.priority);
        diff.changes.push((
            "priority",
            Some(local.priority.to_string()),
            Some(decoded.priority.to_string()),
        ));
    }

    if !same_labels(&local.labels, &decoded.labels) {
        diff.patch.labels = Some(decoded.labels.clone());
        diff.changes.push((
            "labels",
            Some(join_labels(&local.labels)),
            Some(join_labels(&decoded.labels)),
        ));
    }

    diff
}

impl Synchronizer {
    /// Apply the remote snapshot locally: update counterparts, import the rest.
    pub(super) async fn pull(&self, ctx: &mut SyncContext<'_>) -> Result<()> {
        let filter = IssueFilter::project(ctx.project.id).linked(true);
        let linked = self.store.find_issues(&filter).await;
        let Some(linked) = ctx.store_outcome(linked, || "Failed to load synced issues".to_string())
        else {
            return Ok(());
        };
        let mut by_number: HashMap<i64, Issue> = linked
            .into_iter()
            .filter_map(|issue| issue.github_issue_number.map(|n| (n, issue)))
            .collect();

        let snapshot = ctx.snapshot().to_vec();
        for remote in &snapshot {
            if ctx.skip_pull(remote.number) {
                continue;
            }

            match by_number.remove(&remote.number) {
                Some(local) => self.pull_changes(ctx, &local, remote).await,
                None => self.import(ctx, remote).await,
            }
        }

        Ok(())
    }

    async fn pull_changes(&self, ctx: &mut SyncContext<'_>, local: &Issue, remote: &RemoteIssue) {
        let decoded = decode_labels(&remote.labels);
        let diff = diff_remote(local, remote, &decoded);
        if diff.is_empty() {
            return;
        }

        if ctx.resolve_conflict(local.id, remote.number, local.updated_at, remote.updated_at)
            == Some(Side::Local)
        {
            tracing::debug!(number = remote.number, "Local edit is newer, keeping it");
            return;
        }

        let updated = self.store.update_issue(local.id, diff.patch).await;
        if ctx
            .store_outcome(updated, || {
                format!("Failed to apply remote changes of issue #{}", remote.number)
            })
            .is_none()
        {
            return;
        }

        ctx.summary.pulled += 1;
        ctx.emit(SyncProgress::IssuePulled {
            number: remote.number,
            fields: diff.changes.len(),
        });
        tracing::debug!(number = remote.number, fields = diff.changes.len(), "Pulled remote changes");

        for (field, old, new) in diff.changes {
            self.log_activity(
                ActivityEntry::new(local.id, ActivityAction::Synced).with_change(field, old, new),
            )
            .await;
        }
        if let Some(status) = diff.forced_status {
            self.log_activity(
                ActivityEntry::new(local.id, ActivityAction::StatusChanged).with_change(
                    "status",
                    Some(local.status.to_string()),
                    Some(status.to_string()),
                ),
            )
            .await;
        }
    }

    async fn import(&self, ctx: &mut SyncContext<'_>, remote: &RemoteIssue) {
        let decoded = decode_labels(&remote.labels);
        let status = match remote.state {
            GithubState::Closed => IssueStatus::Done,
            GithubState::Open => IssueStatus::Backlog,
        };

        // Never later than the run start, so the next run does not push it back.
        let updated_at = remote.updated_at.min(ctx.started_at);

        let data = NewIssue {
            project_id: ctx.project.id,
            title: remote.title.clone(),
            description: remote.body.clone(),
            issue_type: decoded.issue_type,
            priority: decoded.priority,
            labels: decoded.labels,
            assignees: remote.assignees.clone(),
            status,
            github_issue_number: Some(remote.number),
            github_state: Some(remote.state),
            updated_at: Some(updated_at),
        };

        let created = self.store.create_issue(data).await;
        let Some(issue) = ctx.store_outcome(created, || {
            format!("Failed to import remote issue #{}", remote.number)
        }) else {
            return;
        };

        ctx.summary.imported += 1;
        ctx.emit(SyncProgress::IssueImported {
            number: remote.number,
            title: remote.title.clone(),
        });
        tracing::debug!(number = remote.number, "Imported remote issue");
        self.log_activity(ActivityEntry::new(issue.id, ActivityAction::Created))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::entity::issue_type::IssueType;
    use crate::entity::priority::Priority;

    fn local() -> Issue {
        let now = Utc::now();
        Issue {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Login fails".to_string(),
            description: None,
            issue_type: IssueType::Bug,
            priority: Priority::High,
            labels: vec!["auth".to_string()],
            assignees: Vec::new(),
            status: IssueStatus::InProgress,
            github_issue_number: Some(9),
            github_state: Some(GithubState::Open),
            created_at: now,
            updated_at: now,
        }
    }

    fn remote(state: GithubState, labels: &[&str]) -> RemoteIssue {
        RemoteIssue {
            number: 9,
            title: "Login fails".to_string(),
            body: None,
            state,
            labels: labels.iter().map(|s| s.to_string()).collect(),
            assignees: Vec::new(),
            updated_at: Utc::now(),
            is_pull_request: false,
        }
    }

    fn diff(local: &Issue, remote: &RemoteIssue) -> RemoteDiff {
        diff_remote(local, remote, &decode_labels(&remote.labels))
    }

    #[test]
    fn unchanged_remote_has_no_diff() {
        let remote = remote(GithubState::Open, &["type:bug", "priority:high", "AUTH"]);
        assert!(diff(&local(), &remote).is_empty());
    }

    #[test]
    fn closing_remotely_forces_done() {
        let remote = remote(GithubState::Closed, &["type:bug", "priority:high", "auth"]);
        let diff = diff(&local(), &remote);

        assert_eq!(diff.patch.github_state, Some(GithubState::Closed));
        assert_eq!(diff.patch.status, Some(IssueStatus::Done));
        assert_eq!(diff.forced_status, Some(IssueStatus::Done));
        assert_eq!(diff.changes.len(), 1);
    }

    #[test]
    fn closing_a_done_issue_does_not_force_status() {
        let mut local = local();
        local.status = IssueStatus::Done;
        let remote = remote(GithubState::Closed, &["type:bug", "priority:high", "auth"]);
        let diff = diff(&local, &remote);

        assert_eq!(diff.patch.status, None);
        assert_eq!(diff.forced_status, None);
        assert!(!diff.is_empty());
    }

    #[test]
    fn reopening_only_updates_state() {
        let mut local = local();
        local.status = IssueStatus::Done;
        local.github_state = Some(GithubState::Closed);
        let remote = remote(GithubState::Open, &["type:bug", "priority:high", "auth"]);
        let diff = diff(&local, &remote);

        assert_eq!(diff.patch.github_state, Some(GithubState::Open));
        assert_eq!(diff.patch.status, None);
    }

    #[test]
    fn metadata_changes_are_listed_per_field() {
        let remote = remote(GithubState::Open, &["type:story", "priority:low", "ui"]);
        let diff = diff(&local(), &remote);

        let fields: Vec<_> = diff.changes.iter().map(|(field, _, _)| *field).collect();
        assert_eq!(fields, vec!["type", "priority", "labels"]);
        assert_eq!(diff.patch.issue_type, Some(IssueType::Story));
        assert_eq!(diff.patch.priority, Some(Priority::Low));
        assert_eq!(diff.patch.labels, Some(vec!["ui".to_string()]));
    }
}
