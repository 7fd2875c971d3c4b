//! Log retention sweep.
//!
//! Enumerates a log directory once, selects files older than the policy
//! cutoff and deletes them one by one. Individual deletion failures are
//! recorded in the returned summary and never abort the sweep; only an
//! enumeration failure or an observed cancellation ends a run early.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use logreap_core::{AppError, AppResult, RunId};
use logreap_domain::{FileRecord, ProgressPercent, RetentionPolicy};

use crate::retention_ports::{
    DeleteOutcome, FileDeletionFailure, LogFileStore, ProgressSink, SweepSummary,
};


/// Application service that applies a retention policy to a log directory.
#[derive(Clone)]
pub struct LogRetentionService {
    store: Arc<dyn LogFileStore>,
    dry_run: bool,
}

impl LogRetentionService {
    /// Creates a service from a filesystem port implementation.
    #[must_use]
    pub fn new(store: Arc<dyn LogFileStore>) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Selects candidates without deleting them when enabled.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs one sweep.
    ///
    /// Progress is reported before each candidate and once more with 100
    /// after the last one. Cancellation is checked at every iteration
    /// boundary and surfaces as `AppError::Cancelled`; files deleted before
    /// that point stay deleted.
    pub async fn run(
        &self,
        policy: &RetentionPolicy,
        progress: &dyn ProgressSink,
        cancellation: &CancellationToken,
    ) -> AppResult<SweepSummary> {
        let started_at = Instant::now();
        let cutoff = policy.cutoff(Utc::now());
        let mut summary = SweepSummary::new(RunId::new(), cutoff, self.dry_run);

        let listed = self
            .store
            .list_files(
                policy.directory_path(),
                policy.file_extensions(),
                policy.recursive(),
            )
            .await?;
        summary.scanned = count(listed.len());

        let candidates: Vec<FileRecord> = listed
            .into_iter()
            .filter(|record| {
                policy.matches_extension(&record.path) && record.is_older_than(cutoff)
            })
            .collect();
        let total = candidates.len();
        summary.candidates = count(total);

        for (processed, candidate) in candidates.iter().enumerate() {
            progress.report(ProgressPercent::from_ratio(processed, total));

            if cancellation.is_cancelled() {
                return Err(AppError::Cancelled(format!(
                    "log retention run '{}' stopped after {processed} of {total} files ({} deleted)",
                    summary.run_id, summary.deleted
                )));
            }

            self.process_candidate(candidate, cutoff, &mut summary).await;
        }

        progress.report(ProgressPercent::COMPLETE);
        summary.duration_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(summary)
    }

    async fn process_candidate(
        &self,
        candidate: &FileRecord,
        cutoff: DateTime<Utc>,
        summary: &mut SweepSummary,
    ) {
        match self.store.last_modified_utc(&candidate.path).await {
            Ok(None) => {
                summary.already_missing = summary.already_missing.saturating_add(1);
                return;
            }
            Ok(Some(last_modified)) if last_modified >= cutoff => {
                summary.skipped_recent = summary.skipped_recent.saturating_add(1);
                return;
            }
            Ok(Some(_)) => {}
            Err(error) => {
                record_failure(summary, candidate, &error);
                return;
            }
        }

        if self.dry_run {
            record_deleted(summary, candidate);
            return;
        }

        match self.store.delete_file(&candidate.path).await {
            Ok(DeleteOutcome::Deleted) => record_deleted(summary, candidate),
            Ok(DeleteOutcome::AlreadyMissing) => {
                summary.already_missing = summary.already_missing.saturating_add(1);
            }
            Err(error) => record_failure(summary, candidate, &error),
        }
    }
}

fn record_deleted(summary: &mut SweepSummary, candidate: &FileRecord) {
    summary.deleted = summary.deleted.saturating_add(1);
    summary.bytes_reclaimed = summary.bytes_reclaimed.saturating_add(candidate.size_bytes);
}

fn record_failure(summary: &mut SweepSummary, candidate: &FileRecord, error: &AppError) {
    summary.failures.push(FileDeletionFailure {
        path: candidate.path.clone(),
        error: error.to_string(),
    });
}

fn count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
