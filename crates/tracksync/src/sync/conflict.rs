//! Whole-record last-write-wins conflict detection.

use chrono::{DateTime, Utc};

/// Side of a sync whose version of an issue is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Local,
    Remote,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Local => write!(f, "local"),
            Side::Remote => write!(f, "remote"),
        }
    }
}

/// Both sides edited an issue since the last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub winner: Side,
}

impl Conflict {
    #[inline]
    pub fn remote_wins(&self) -> bool {
        self.winner == Side::Remote
    }
}

/// Detect a conflict between a local and a remote edit.
///
/// Without a watermark nothing has been synced yet, so nothing can conflict.
/// The remote side wins only with a strictly later timestamp; a tie keeps
/// the local version.
pub fn detect(
    watermark: Option<DateTime<Utc>>,
    local_updated_at: DateTime<Utc>,
    remote_updated_at: DateTime<Utc>,
) -> Option<Conflict> {
    let watermark = watermark?;
    if local_updated_at <= watermark || remote_updated_at <= watermark {
        return None;
    }

    let winner = if remote_updated_at > local_updated_at {
        Side::Remote
    } else {
        Side::Local
    };
    Some(Conflict { winner })
}
