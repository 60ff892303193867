//! Progress reporting types for sync runs.

use super::conflict::Side;
use super::types::SyncStage;

/// Progress events emitted during a sync run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// A stage is starting.
    Stage {
        stage: SyncStage,
    },

    /// The remote snapshot was fetched.
    SnapshotFetched {
        /// Issues in the snapshot, pull requests excluded.
        issues: usize,
    },

    /// A missing label was created remotely.
    LabelCreated {
        name: String,
    },

    /// A local issue was created remotely.
    IssueCreated {
        title: String,
        number: i64,
    },

    /// A remote issue was updated from a local edit.
    IssueUpdated {
        number: i64,
    },

    /// A remote issue was imported.
    IssueImported {
        number: i64,
        title: String,
    },

    /// A local issue was updated from remote changes.
    IssuePulled {
        number: i64,
        /// Number of fields changed.
        fields: usize,
    },

    /// Both sides changed since the last run.
    Conflict {
        number: i64,
        winner: Side,
    },

    /// A per-item operation failed; the run continues.
    ItemFailed {
        error: String,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
///
/// # Example
///
/// ```ignore
/// use tracksync::sync::{emit, SyncProgress, ProgressCallback};
///
/// fn report(on_progress: Option<&ProgressCallback>) {
///     emit(on_progress, SyncProgress::SnapshotFetched { issues: 42 });
/// }
/// ```
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
