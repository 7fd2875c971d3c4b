use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use logreap_core::RunId;

/// A file the sweep selected but could not remove.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDeletionFailure {
    /// Path of the file.
    pub path: PathBuf,
    /// Error reported by the filesystem port.
    pub error: String,
}

/// Outcome of one completed retention sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Correlation identifier of the run.
    pub run_id: RunId,
    /// Files modified before this instant were candidates.
    pub cutoff: DateTime<Utc>,
    /// Files returned by enumeration.
    pub scanned: u64,
    /// Files older than the cutoff with a matching extension.
    pub candidates: u64,
    /// Files removed, or that would have been removed in dry-run mode.
    pub deleted: u64,
    /// Candidates that disappeared before they could be removed.
    pub already_missing: u64,
    /// Candidates rewritten after enumeration and therefore kept.
    pub skipped_recent: u64,
    /// Sum of the listed sizes of deleted files.
    pub bytes_reclaimed: u64,
    /// Per-file failures absorbed by the sweep.
    pub failures: Vec<FileDeletionFailure>,
    /// Whether deletions were only simulated.
    pub dry_run: bool,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl SweepSummary {
    pub(crate) fn new(run_id: RunId, cutoff: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            run_id,
            cutoff,
            scanned: 0,
            candidates: 0,
            deleted: 0,
            already_missing: 0,
            skipped_recent: 0,
            bytes_reclaimed: 0,
            failures: Vec::new(),
            dry_run,
            duration_ms: 0,
        }
    }

    /// Returns whether any file was deleted.
    #[must_use]
    pub fn has_deletions(&self) -> bool {
        self.deleted > 0
    }
}
