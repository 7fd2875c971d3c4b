//! Application services and ports.

#![forbid(unsafe_code)]

mod delete_log_files_task;
mod maintenance_ports;
mod retention_ports;
mod retention_service;

pub use delete_log_files_task::{DELETE_LOG_FILES_TASK_KEY, DeleteLogFilesTask};
pub use maintenance_ports::{MaintenanceTask, TaskItemFailure, TaskRunOutcome};
pub use retention_ports::{
    DeleteOutcome, FileDeletionFailure, LogFileStore, ProgressSink, SweepSummary,
};
pub use retention_service::LogRetentionService;
