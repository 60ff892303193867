use chrono::Duration;

use crate::entity::activity_action::ActivityAction;
use crate::entity::github_state::GithubState;
use crate::labels::encode_labels;
use crate::store::{ActivityEntry, Issue, IssueFilter, IssuePatch};
use crate::tracker::{NewRemoteIssue, RemoteIssueUpdate, RemoteTracker};

use super::super::conflict::Side;
use super::super::context::SyncContext;
use super::super::error::Result;
use super::super::progress::SyncProgress;
use super::Synchronizer;

impl Synchronizer {
    /// Create remote issues for every never-synced local issue, oldest first.
    pub(super) async fn push_create(&self, ctx: &mut SyncContext<'_>) -> Result<()> {
        let filter = IssueFilter::project(ctx.project.id).linked(false);
        let issues = self.store.find_issues(&filter).await;
        let Some(issues) = ctx.store_outcome(issues, || "Failed to load unsynced issues".to_string())
        else {
            return Ok(());
        };

        for issue in issues {
            let payload = NewRemoteIssue {
                title: issue.title.clone(),
                body: issue.description.clone(),
                labels: encode_labels(issue.issue_type, issue.priority, &issue.labels),
            };

            let created = self.tracker.create_issue(&ctx.repo, &payload).await;
            let Some(number) = ctx.tracker_outcome(created, || {
                format!("Failed to create remote issue for \"{}\"", issue.title)
            })?
            else {
                continue;
            };
            ctx.pushed.insert(number);

            let patch = IssuePatch {
                github_issue_number: Some(number),
                github_state: Some(GithubState::Open),
                ..IssuePatch::default()
            };
            let linked = self.store.update_issue(issue.id, patch).await;
            if ctx
                .store_outcome(linked, || {
                    format!(
                        "Failed to link \"{}\" to remote issue #{}",
                        issue.title, number
                    )
                })
                .is_none()
            {
                continue;
            }

            tracing::debug!(number, title = %issue.title, "Created remote issue");
            ctx.created.insert(issue.id);
            ctx.summary.created += 1;
            ctx.emit(SyncProgress::IssueCreated {
                title: issue.title.clone(),
                number,
            });
            self.log_activity(ActivityEntry::new(issue.id, ActivityAction::Synced).with_change(
                "githubIssueNumber",
                None,
                Some(number.to_string()),
            ))
            .await;
        }

        Ok(())
    }

    /// Send local edits made since the last run to their remote issues.
    pub(super) async fn push_update(&self, ctx: &mut SyncContext<'_>) -> Result<()> {
        let filter = IssueFilter::project(ctx.project.id)
            .linked(true)
            .updated_after(ctx.watermark);
        let issues = self.store.find_issues(&filter).await;
        let Some(issues) = ctx.store_outcome(issues, || "Failed to load edited issues".to_string())
        else {
            return Ok(());
        };

        for issue in issues {
            let Some(number) = issue.github_issue_number else {
                continue;
            };
            let state = GithubState::for_status(issue.status);

            // Just created as open; only a done issue still needs closing.
            if ctx.created.contains(&issue.id) && state == GithubState::Open {
                continue;
            }

            let remote_updated_at = ctx.remote_issue(number).map(|r| r.updated_at);
            if let Some(remote_updated_at) = remote_updated_at
                && ctx.resolve_conflict(issue.id, number, issue.updated_at, remote_updated_at)
                    == Some(Side::Remote)
            {
                tracing::debug!(number, "Remote edit is newer, leaving it to pull");
                continue;
            }

            self.push_issue(ctx, &issue, number, state).await?;
        }

        Ok(())
    }

    async fn push_issue(
        &self,
        ctx: &mut SyncContext<'_>,
        issue: &Issue,
        number: i64,
        state: GithubState,
    ) -> Result<()> {
        let update = RemoteIssueUpdate {
            title: issue.title.clone(),
            body: issue.description.clone(),
            labels: encode_labels(issue.issue_type, issue.priority, &issue.labels),
            state,
        };

        let result = self.tracker.update_issue(&ctx.repo, number, &update).await;
        if ctx
            .tracker_outcome(result, || format!("Failed to update remote issue #{}", number))?
            .is_none()
        {
            ctx.failed_push.insert(number);
            self.keep_for_retry(ctx, issue).await;
            return Ok(());
        }

        ctx.pushed.insert(number);
        ctx.summary.updated += 1;
        ctx.emit(SyncProgress::IssueUpdated { number });
        tracing::debug!(number, "Updated remote issue");

        let mut entry = ActivityEntry::new(issue.id, ActivityAction::Synced);
        if issue.github_state != Some(state) {
            let patch = IssuePatch {
                github_state: Some(state),
                ..IssuePatch::default()
            };
            let reconciled = self.store.update_issue(issue.id, patch).await;
            if ctx
                .store_outcome(reconciled, || {
                    format!("Failed to record state of remote issue #{}", number)
                })
                .is_some()
            {
                entry = entry.with_change(
                    "githubState",
                    issue.github_state.map(|s| s.to_string()),
                    Some(state.to_string()),
                );
            }
        }
        self.log_activity(entry).await;

        Ok(())
    }

    /// Keep an issue whose push failed eligible for the next run.
    ///
    /// The next watermark is this run's start, so an edit made before it
    /// is moved just past it.
    async fn keep_for_retry(&self, ctx: &mut SyncContext<'_>, issue: &Issue) {
        if issue.updated_at > ctx.started_at {
            return;
        }

        let patch = IssuePatch {
            updated_at: Some(ctx.started_at + Duration::milliseconds(1)),
            ..IssuePatch::default()
        };
        let touched = self.store.update_issue(issue.id, patch).await;
        ctx.store_outcome(touched, || {
            format!("Failed to keep \"{}\" pending for the next run", issue.title)
        });
    }
}
