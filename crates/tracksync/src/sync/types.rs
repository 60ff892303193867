//! Sync result types.

use chrono::{DateTime, Utc};

/// Stages of a sync run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStage {
    ValidateConfig,
    FetchRemoteSnapshot,
    ProvisionLabels,
    PushCreate,
    PushUpdate,
    Pull,
    PersistWatermark,
}

impl std::fmt::Display for SyncStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SyncStage::ValidateConfig => "validating configuration",
            SyncStage::FetchRemoteSnapshot => "fetching remote issues",
            SyncStage::ProvisionLabels => "provisioning labels",
            SyncStage::PushCreate => "creating remote issues",
            SyncStage::PushUpdate => "updating remote issues",
            SyncStage::Pull => "pulling remote changes",
            SyncStage::PersistWatermark => "saving sync watermark",
        };
        f.write_str(name)
    }
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Local issues created remotely.
    pub created: usize,
    /// Remote issues updated from local edits.
    pub updated: usize,
    /// Remote issues imported as new local issues.
    pub imported: usize,
    /// Local issues updated from remote changes.
    pub pulled: usize,
    /// Labels created on the remote repository.
    pub labels_created: usize,
    /// Issues edited on both sides since the last run.
    pub conflicts: usize,
    /// Per-item failures (non-fatal).
    pub errors: Vec<String>,
    /// Watermark persisted by this run; `None` when it was not saved.
    pub synced_at: Option<DateTime<Utc>>,
}

impl SyncSummary {
    /// True if the run changed nothing on either side.
    pub fn is_noop(&self) -> bool {
        self.created == 0
            && self.updated == 0
            && self.imported == 0
            && self.pulled == 0
            && self.labels_created == 0
    }
}
