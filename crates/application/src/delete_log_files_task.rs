use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use logreap_core::{AppError, AppResult};
use logreap_domain::{MaintenanceTaskInfo, MaintenanceTaskInfoInput, RetentionPolicy, TaskTrigger};

use crate::maintenance_ports::{MaintenanceTask, TaskItemFailure, TaskRunOutcome};
use crate::retention_ports::{ProgressSink, SweepSummary};
use crate::retention_service::LogRetentionService;

/// Stable key of the log cleanup task.
pub const DELETE_LOG_FILES_TASK_KEY: &str = "CleanLogFiles";

/// Scheduled task that removes expired log files.
#[derive(Clone)]
pub struct DeleteLogFilesTask {
    info: MaintenanceTaskInfo,
    policy: RetentionPolicy,
    service: LogRetentionService,
}

impl DeleteLogFilesTask {
    /// Creates the task for one retention policy.
    pub fn new(policy: RetentionPolicy, service: LogRetentionService) -> AppResult<Self> {
        let info = MaintenanceTaskInfo::new(MaintenanceTaskInfoInput {
            key: DELETE_LOG_FILES_TASK_KEY.to_owned(),
            name: "Clean Log Directory".to_owned(),
            description: format!(
                "Deletes log files that are more than {} days old.",
                policy.retention_days()
            ),
            category: "Maintenance".to_owned(),
            is_enabled: true,
            is_hidden: false,
            is_logged: true,
        })?;

        Ok(Self {
            info,
            policy,
            service,
        })
    }
}

#[async_trait]
impl MaintenanceTask for DeleteLogFilesTask {
    fn info(&self) -> &MaintenanceTaskInfo {
        &self.info
    }

    fn default_triggers(&self) -> Vec<TaskTrigger> {
        vec![TaskTrigger::daily()]
    }

    async fn execute(
        &self,
        progress: &dyn ProgressSink,
        cancellation: &CancellationToken,
    ) -> AppResult<TaskRunOutcome> {
        let summary = self.service.run(&self.policy, progress, cancellation).await?;
        TaskRunOutcome::try_from(summary)
    }
}

impl TryFrom<SweepSummary> for TaskRunOutcome {
    type Error = AppError;

    fn try_from(summary: SweepSummary) -> AppResult<Self> {
        let details = serde_json::to_value(&summary).map_err(|error| {
            AppError::Internal(format!("failed to serialize sweep summary: {error}"))
        })?;

        Ok(Self {
            run_id: summary.run_id,
            selected: summary.candidates,
            affected: summary.deleted,
            failures: summary
                .failures
                .into_iter()
                .map(|failure| TaskItemFailure {
                    item: failure.path.display().to_string(),
                    error: failure.error,
                })
                .collect(),
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeDelta, Utc};
    use tokio::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    use logreap_core::{AppError, AppResult};
    use logreap_domain::{FileRecord, ProgressPercent, RetentionPolicy, RetentionPolicyInput};

    use super::{DELETE_LOG_FILES_TASK_KEY, DeleteLogFilesTask};
    use crate::maintenance_ports::MaintenanceTask;
    use crate::retention_ports::{DeleteOutcome, LogFileStore};
    use crate::retention_service::LogRetentionService;

    #[derive(Default)]
    struct SingleFileStore {
        file: Mutex<Option<FileRecord>>,
        fail_delete: bool,
    }

    #[async_trait]
    impl LogFileStore for SingleFileStore {
        async fn list_files(
            &self,
            _directory: &Path,
            _extensions: &BTreeSet<String>,
            _recursive: bool,
        ) -> AppResult<Vec<FileRecord>> {
            Ok(self.file.lock().await.iter().cloned().collect())
        }

        async fn last_modified_utc(&self, _path: &Path) -> AppResult<Option<DateTime<Utc>>> {
            Ok(self
                .file
                .lock()
                .await
                .as_ref()
                .map(|record| record.last_modified_utc))
        }

        async fn delete_file(&self, path: &Path) -> AppResult<DeleteOutcome> {
            if self.fail_delete {
                return Err(AppError::Internal(format!(
                    "file '{}' is locked",
                    path.display()
                )));
            }

            Ok(match self.file.lock().await.take() {
                Some(_) => DeleteOutcome::Deleted,
                None => DeleteOutcome::AlreadyMissing,
            })
        }
    }

    fn policy(retention_days: u32) -> RetentionPolicy {
        RetentionPolicy::new(RetentionPolicyInput {
            retention_days,
            file_extensions: vec![".txt".to_owned()],
            directory_path: PathBuf::from("/srv/logs"),
            recursive: true,
        })
        .unwrap_or_else(|_| panic!("policy should be valid"))
    }

    fn task(store: SingleFileStore, retention_days: u32) -> DeleteLogFilesTask {
        let service = LogRetentionService::new(Arc::new(store));
        DeleteLogFilesTask::new(policy(retention_days), service)
            .unwrap_or_else(|_| panic!("task should build"))
    }

    fn expired_file() -> FileRecord {
        FileRecord {
            path: PathBuf::from("/srv/logs/server.txt"),
            last_modified_utc: Utc::now() - TimeDelta::days(45),
            size_bytes: 2048,
        }
    }

    fn ignore_progress(_: ProgressPercent) {}

    #[test]
    fn metadata_interpolates_retention_days() {
        let task = task(SingleFileStore::default(), 14);
        let info = task.info();

        assert_eq!(info.key().as_str(), DELETE_LOG_FILES_TASK_KEY);
        assert_eq!(info.name().as_str(), "Clean Log Directory");
        assert_eq!(
            info.description(),
            "Deletes log files that are more than 14 days old."
        );
        assert_eq!(info.category().as_str(), "Maintenance");
        assert!(info.is_enabled());
        assert!(!info.is_hidden());
        assert!(info.is_logged());
    }

    #[test]
    fn default_trigger_runs_daily() {
        let task = task(SingleFileStore::default(), 3);
        let triggers = task.default_triggers();

        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].period().as_secs(), 86_400);
    }

    #[tokio::test]
    async fn execute_maps_summary_to_outcome() {
        let store = SingleFileStore {
            file: Mutex::new(Some(expired_file())),
            fail_delete: false,
        };
        let task = task(store, 30);

        let outcome = task
            .execute(&ignore_progress, &CancellationToken::new())
            .await
            .unwrap_or_else(|_| panic!("task should run"));

        assert_eq!(outcome.selected, 1);
        assert_eq!(outcome.affected, 1);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.details["bytes_reclaimed"], 2048);
        assert_eq!(outcome.details["dry_run"], false);
    }

    #[tokio::test]
    async fn execute_reports_item_failures() {
        let store = SingleFileStore {
            file: Mutex::new(Some(expired_file())),
            fail_delete: true,
        };
        let task = task(store, 30);

        let outcome = task
            .execute(&ignore_progress, &CancellationToken::new())
            .await
            .unwrap_or_else(|_| panic!("task should run"));

        assert_eq!(outcome.affected, 0);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].item, "/srv/logs/server.txt");
        assert!(outcome.failures[0].error.contains("locked"));
    }

    #[tokio::test]
    async fn execute_propagates_cancellation() {
        let store = SingleFileStore {
            file: Mutex::new(Some(expired_file())),
            fail_delete: false,
        };
        let task = task(store, 30);
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        let result = task.execute(&ignore_progress, &cancellation).await;

        assert!(matches!(result, Err(AppError::Cancelled(_))));
    }
}
