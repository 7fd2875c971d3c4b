use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use logreap_core::AppResult;
use logreap_domain::FileRecord;

/// Result of a single delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file existed and was removed.
    Deleted,
    /// The file was already gone; treated as success.
    AlreadyMissing,
}

/// Filesystem port used by the retention sweep.
#[async_trait]
pub trait LogFileStore: Send + Sync {
    /// Lists files under `directory` whose extension is in `extensions`.
    ///
    /// `extensions` holds lowercase values with a leading dot, matched
    /// against the end of each file name, so dot-files such as `.txt` are
    /// included. A missing directory yields an empty list; a directory that
    /// exists but cannot be read returns `AppError::Enumeration`.
    async fn list_files(
        &self,
        directory: &Path,
        extensions: &BTreeSet<String>,
        recursive: bool,
    ) -> AppResult<Vec<FileRecord>>;

    /// Returns the current modification time, or `None` when the file is gone.
    async fn last_modified_utc(&self, path: &Path) -> AppResult<Option<DateTime<Utc>>>;

    /// Deletes one file.
    async fn delete_file(&self, path: &Path) -> AppResult<DeleteOutcome>;
}
