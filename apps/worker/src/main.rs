//! logreap maintenance worker runtime.

#![forbid(unsafe_code)]

mod config;
mod scheduler;

use std::sync::Arc;

use logreap_application::{DeleteLogFilesTask, LogRetentionService, MaintenanceTask};
use logreap_core::{AppError, AppResult};
use logreap_domain::{RetentionPolicy, RetentionPolicyInput, TaskTrigger};
use logreap_infrastructure::LocalLogFileStore;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::WorkerConfig;
use crate::scheduler::ScheduledTask;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::load()?;
    let tasks = build_tasks(&config)?;

    for task in &tasks {
        let metadata = serde_json::to_string(task.info()).map_err(|error| {
            AppError::Internal(format!("failed to serialize task metadata: {error}"))
        })?;
        let trigger_types: Vec<&str> = task
            .default_triggers()
            .iter()
            .map(TaskTrigger::trigger_type)
            .collect();
        info!(
            task = %task.info().key(),
            trigger_types = ?trigger_types,
            metadata = %metadata,
            "maintenance task registered"
        );
    }

    info!(
        log_directory = %config.log_directory.display(),
        retention_days = config.retention_days,
        file_extensions = ?config.file_extensions,
        recursive = config.recursive,
        dry_run = config.dry_run,
        run_once = config.run_once,
        "logreap-worker started"
    );

    let scheduled = tasks
        .into_iter()
        .map(|task| ScheduledTask::new(task, config.interval_override))
        .collect::<AppResult<Vec<_>>>()?;

    let cancellation = CancellationToken::new();
    spawn_shutdown_listener(cancellation.clone());

    if config.run_once {
        scheduler::run_once(&scheduled, &cancellation).await;
    } else {
        scheduler::run_forever(scheduled, &cancellation).await;
    }

    info!("logreap-worker stopped");
    Ok(())
}

fn build_tasks(config: &WorkerConfig) -> AppResult<Vec<Arc<dyn MaintenanceTask>>> {
    let policy = RetentionPolicy::new(RetentionPolicyInput {
        retention_days: config.retention_days,
        file_extensions: config.file_extensions.clone(),
        directory_path: config.log_directory.clone(),
        recursive: config.recursive,
    })?;
    let service =
        LogRetentionService::new(Arc::new(LocalLogFileStore::new())).with_dry_run(config.dry_run);

    let delete_log_files: Arc<dyn MaintenanceTask> =
        Arc::new(DeleteLogFilesTask::new(policy, service)?);

    Ok(vec![delete_log_files])
}

fn spawn_shutdown_listener(cancellation: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown signal received"),
            Err(error) => {
                warn!(error = %error, "failed to listen for shutdown signal");
                return;
            }
        }
        cancellation.cancel();
    });
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
