use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logreap_application::{DeleteOutcome, LogFileStore};
use logreap_core::{AppError, AppResult};
use logreap_domain::{FileRecord, extension_matches};
use tokio::fs;
use tracing::{debug, warn};


/// Log file store backed by the local filesystem.
///
/// Symlinks are never followed, so a recursive sweep stays inside the
/// configured directory tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLogFileStore;

impl LocalLogFileStore {
    /// Creates a local filesystem store.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogFileStore for LocalLogFileStore {
    async fn list_files(
        &self,
        directory: &Path,
        extensions: &BTreeSet<String>,
        recursive: bool,
    ) -> AppResult<Vec<FileRecord>> {
        let mut root_entries = match fs::read_dir(directory).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(
                    directory = %directory.display(),
                    "log directory does not exist, nothing to list"
                );
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(AppError::Enumeration(format!(
                    "failed to list log directory '{}': {error}",
                    directory.display()
                )));
            }
        };

        let mut records = Vec::new();
        let mut subdirectories: Vec<PathBuf> = Vec::new();
        collect_entries(
            &mut root_entries,
            extensions,
            recursive,
            &mut records,
            &mut subdirectories,
        )
        .await;

        while let Some(subdirectory) = subdirectories.pop() {
            let mut entries = match fs::read_dir(&subdirectory).await {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(
                        directory = %subdirectory.display(),
                        error = %error,
                        "skipping unreadable log subdirectory"
                    );
                    continue;
                }
            };

            collect_entries(
                &mut entries,
                extensions,
                recursive,
                &mut records,
                &mut subdirectories,
            )
            .await;
        }

        Ok(records)
    }

    async fn last_modified_utc(&self, path: &Path) -> AppResult<Option<DateTime<Utc>>> {
        match fs::symlink_metadata(path).await {
            Ok(metadata) => metadata
                .modified()
                .map(|modified| Some(DateTime::<Utc>::from(modified)))
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to read modification time of '{}': {error}",
                        path.display()
                    ))
                }),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "failed to read metadata of '{}': {error}",
                path.display()
            ))),
        }
    }

    async fn delete_file(&self, path: &Path) -> AppResult<DeleteOutcome> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "deleted expired log file");
                Ok(DeleteOutcome::Deleted)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(DeleteOutcome::AlreadyMissing),
            Err(error) => Err(AppError::Internal(format!(
                "failed to delete log file '{}': {error}",
                path.display()
            ))),
        }
    }
}

async fn collect_entries(
    entries: &mut fs::ReadDir,
    extensions: &BTreeSet<String>,
    recursive: bool,
    records: &mut Vec<FileRecord>,
    subdirectories: &mut Vec<PathBuf>,
) {
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => return,
            Err(error) => {
                warn!(error = %error, "stopped reading log directory entries early");
                return;
            }
        };

        let path = entry.path();
        // `DirEntry::metadata` does not traverse symlinks.
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(error) => {
                debug!(path = %path.display(), error = %error, "skipping unreadable entry");
                continue;
            }
        };

        if metadata.is_dir() {
            if recursive {
                subdirectories.push(path);
            }
            continue;
        }

        if !metadata.is_file() || !extension_matches(extensions, &path) {
            continue;
        }

        let Ok(modified) = metadata.modified() else {
            debug!(path = %path.display(), "skipping entry without modification time");
            continue;
        };

        records.push(FileRecord {
            path,
            last_modified_utc: DateTime::<Utc>::from(modified),
            size_bytes: metadata.len(),
        });
    }
}
