use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use logreap_core::{AppResult, RunId};
use logreap_domain::{MaintenanceTaskInfo, TaskTrigger};

use crate::retention_ports::ProgressSink;

/// One item a task could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskItemFailure {
    /// Item identifier such as a file path.
    pub item: String,
    /// Error message.
    pub error: String,
}

/// Task-agnostic outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRunOutcome {
    /// Correlation identifier of the run.
    pub run_id: RunId,
    /// Items the task selected for processing.
    pub selected: u64,
    /// Items the task changed.
    pub affected: u64,
    /// Items the task failed to process.
    pub failures: Vec<TaskItemFailure>,
    /// Task-specific structured details.
    pub details: Value,
}

/// Capability set implemented by every scheduled maintenance task.
///
/// Schedulers only depend on this trait, never on concrete task types.
#[async_trait]
pub trait MaintenanceTask: Send + Sync {
    /// Returns identity and visibility metadata.
    fn info(&self) -> &MaintenanceTaskInfo;

    /// Returns the recommended triggers.
    fn default_triggers(&self) -> Vec<TaskTrigger>;

    /// Executes one run.
    async fn execute(
        &self,
        progress: &dyn ProgressSink,
        cancellation: &CancellationToken,
    ) -> AppResult<TaskRunOutcome>;
}
