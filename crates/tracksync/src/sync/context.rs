//! Per-run state shared by the sync stages.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repo_id::RepoId;
use crate::store::{Project, StoreError};
use crate::tracker::{RemoteIssue, TrackerError, short_error_message};

use super::conflict::{self, Side};
use super::error::{Result, SyncError};
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::{SyncStage, SyncSummary};

/// State of one sync run.
///
/// Stages never call each other; everything they share lives here.
pub struct SyncContext<'a> {
    pub project: Project,
    pub repo: RepoId,
    /// Watermark of the previous run.
    pub watermark: Option<DateTime<Utc>>,
    /// Start of this run; becomes the next watermark.
    pub started_at: DateTime<Utc>,
    /// Remote issues fetched once at the start, pull requests excluded.
    /// `None` if the fetch failed.
    snapshot: Option<Vec<RemoteIssue>>,
    snapshot_index: HashMap<i64, usize>,
    /// Issues created remotely in this run.
    pub created: HashSet<Uuid>,
    /// Remote numbers written in this run; their snapshot entries are stale.
    pub pushed: HashSet<i64>,
    /// Remote numbers whose update failed; their local edits must survive pull.
    pub failed_push: HashSet<i64>,
    /// Conflict outcomes by local issue id, so each is counted once.
    resolutions: HashMap<Uuid, Side>,
    pub summary: SyncSummary,
    on_progress: Option<&'a ProgressCallback>,
}

impl<'a> SyncContext<'a> {
    pub fn new(project: Project, repo: RepoId, on_progress: Option<&'a ProgressCallback>) -> Self {
        Self {
            watermark: project.last_synced_at,
            project,
            repo,
            started_at: Utc::now(),
            snapshot: None,
            snapshot_index: HashMap::new(),
            created: HashSet::new(),
            pushed: HashSet::new(),
            failed_push: HashSet::new(),
            resolutions: HashMap::new(),
            summary: SyncSummary::default(),
            on_progress,
        }
    }

    pub fn emit(&self, event: SyncProgress) {
        emit(self.on_progress, event);
    }

    pub fn enter(&self, stage: SyncStage) {
        tracing::info!(project = %self.project.id, repo = %self.repo, "Sync stage: {}", stage);
        self.emit(SyncProgress::Stage { stage });
    }

    /// Store the remote snapshot, dropping pull requests.
    pub fn set_snapshot(&mut self, issues: Vec<RemoteIssue>) {
        let issues: Vec<RemoteIssue> = issues.into_iter().filter(|i| !i.is_pull_request).collect();
        self.snapshot_index = issues
            .iter()
            .enumerate()
            .map(|(idx, issue)| (issue.number, idx))
            .collect();
        self.emit(SyncProgress::SnapshotFetched {
            issues: issues.len(),
        });
        self.snapshot = Some(issues);
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Snapshot entries, empty if the fetch failed.
    pub fn snapshot(&self) -> &[RemoteIssue] {
        self.snapshot.as_deref().unwrap_or_default()
    }

    /// Whether pull must leave this remote issue alone.
    pub fn skip_pull(&self, number: i64) -> bool {
        self.pushed.contains(&number) || self.failed_push.contains(&number)
    }

    pub fn remote_issue(&self, number: i64) -> Option<&RemoteIssue> {
        let idx = *self.snapshot_index.get(&number)?;
        self.snapshot.as_ref()?.get(idx)
    }

    /// Run conflict detection for a linked issue, counting each issue once.
    ///
    /// Returns the winning side, or `None` when there is no conflict.
    pub fn resolve_conflict(
        &mut self,
        issue_id: Uuid,
        number: i64,
        local_updated_at: DateTime<Utc>,
        remote_updated_at: DateTime<Utc>,
    ) -> Option<Side> {
        if let Some(side) = self.resolutions.get(&issue_id) {
            return Some(*side);
        }

        let winner = conflict::detect(self.watermark, local_updated_at, remote_updated_at)?.winner;
        self.resolutions.insert(issue_id, winner);
        self.summary.conflicts += 1;
        tracing::info!(number, %winner, "Conflicting edits since last sync");
        self.emit(SyncProgress::Conflict { number, winner });
        Some(winner)
    }

    /// Record a non-fatal failure.
    pub fn record_error(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.emit(SyncProgress::ItemFailed {
            error: message.clone(),
        });
        self.summary.errors.push(message);
    }

    /// Unwrap a tracker result for one item.
    ///
    /// Fatal errors abort the run; others are recorded with `describe` as
    /// prefix and yield `Ok(None)`.
    pub fn tracker_outcome<T>(
        &mut self,
        result: std::result::Result<T, TrackerError>,
        describe: impl FnOnce() -> String,
    ) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() => Err(SyncError::from(err)),
            Err(err) => {
                self.record_error(format!("{}: {}", describe(), short_error_message(&err)));
                Ok(None)
            }
        }
    }

    /// Unwrap a store result for one item, recording failures.
    pub fn store_outcome<T>(
        &mut self,
        result: std::result::Result<T, StoreError>,
        describe: impl FnOnce() -> String,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.record_error(format!("{}: {}", describe(), short_error_message(&err)));
                None
            }
        }
    }
}
