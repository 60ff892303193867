//! Bidirectional issue synchronization.
//!
//! # Module Structure
//!
//! - [`types`] - `SyncSummary` and `SyncStage`
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`conflict`] - Last-write-wins conflict detection
//! - [`engine`] - The `Synchronizer` and its stages
//!
//! # Example
//!
//! ```ignore
//! use tracksync::sync::{SyncProgress, Synchronizer};
//!
//! let progress: tracksync::sync::ProgressCallback = Box::new(|event| {
//!     if let SyncProgress::ItemFailed { error } = event {
//!         eprintln!("{error}");
//!     }
//! });
//! let summary = synchronizer.sync(project_id, Some(&progress)).await?;
//! ```

pub mod conflict;
mod context;
pub mod engine;
mod error;
mod progress;
mod types;

pub use conflict::{Conflict, Side, detect as detect_conflict};
pub use engine::{Synchronizer, validate_repo};
pub use error::{ConfigError, Result, SyncError};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{SyncStage, SyncSummary};
