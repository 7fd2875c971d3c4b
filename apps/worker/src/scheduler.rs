use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use logreap_application::{MaintenanceTask, ProgressSink, TaskRunOutcome};
use logreap_core::{AppError, AppResult};
use logreap_domain::{ProgressPercent, TaskTrigger};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const PROGRESS_LOG_STEP: f64 = 25.0;

/// Maintenance task paired with its cadence.
pub struct ScheduledTask {
    task: Arc<dyn MaintenanceTask>,
    period: Duration,
    next_run_at: Instant,
}

impl ScheduledTask {
    /// Schedules a task to run immediately and then once per `period`.
    ///
    /// The period comes from `trigger_override` when set, otherwise from
    /// the task's first trigger.
    pub fn new(
        task: Arc<dyn MaintenanceTask>,
        trigger_override: Option<TaskTrigger>,
    ) -> AppResult<Self> {
        let trigger = trigger_override
            .or_else(|| task.default_triggers().first().copied())
            .ok_or_else(|| {
                AppError::Validation(format!("task '{}' has no trigger", task.info().key()))
            })?;
        let period = trigger.period();

        debug!(
            task = %task.info().key(),
            trigger_type = trigger.trigger_type(),
            period_seconds = period.as_secs(),
            "maintenance task scheduled"
        );

        Ok(Self {
            task,
            period,
            next_run_at: Instant::now(),
        })
    }

    fn key(&self) -> &str {
        self.task.info().key().as_str()
    }
}

/// Runs every enabled task once, stopping early on cancellation.
pub async fn run_once(tasks: &[ScheduledTask], cancellation: &CancellationToken) {
    for scheduled in tasks {
        if !scheduled.task.info().is_enabled() {
            continue;
        }

        if run_task(scheduled, cancellation).await == RunStatus::Cancelled {
            return;
        }
    }
}

/// Runs enabled tasks on their cadence until cancelled.
pub async fn run_forever(mut tasks: Vec<ScheduledTask>, cancellation: &CancellationToken) {
    tasks.retain(|scheduled| {
        let enabled = scheduled.task.info().is_enabled();
        if !enabled {
            info!(task = %scheduled.key(), "maintenance task disabled, not scheduling");
        }
        enabled
    });

    if tasks.is_empty() {
        warn!("no enabled maintenance tasks, worker exiting");
        return;
    }

    loop {
        let Some(next_index) = tasks
            .iter()
            .enumerate()
            .min_by_key(|(_, scheduled)| scheduled.next_run_at)
            .map(|(index, _)| index)
        else {
            return;
        };

        let next_run_at = tasks[next_index].next_run_at;
        debug!(
            task = %tasks[next_index].key(),
            wait_ms = next_run_at.saturating_duration_since(Instant::now()).as_millis(),
            "waiting for next maintenance run"
        );

        tokio::select! {
            () = cancellation.cancelled() => {
                info!("shutdown requested, scheduler stopping");
                return;
            }
            () = tokio::time::sleep_until(next_run_at) => {}
        }

        let scheduled = &mut tasks[next_index];
        if run_task(scheduled, cancellation).await == RunStatus::Cancelled {
            return;
        }
        scheduled.next_run_at = Instant::now() + scheduled.period;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Finished,
    Cancelled,
}

/// Executes one task, logging its outcome.
///
/// Task failures other than cancellation are logged and count as finished so
/// the next scheduled run still happens.
async fn run_task(scheduled: &ScheduledTask, cancellation: &CancellationToken) -> RunStatus {
    let info = scheduled.task.info();
    let progress = ProgressLogger::new(info.key().as_str());

    info!(task = %info.key(), name = %info.name(), "maintenance task started");

    match scheduled.task.execute(&progress, cancellation).await {
        Ok(outcome) => {
            log_outcome(info.key().as_str(), info.is_logged(), &outcome);
            RunStatus::Finished
        }
        Err(error) if error.is_cancelled() => {
            warn!(task = %info.key(), error = %error, "maintenance task cancelled");
            RunStatus::Cancelled
        }
        Err(error) => {
            warn!(task = %info.key(), error = %error, "maintenance task failed");
            RunStatus::Finished
        }
    }
}

fn log_outcome(key: &str, is_logged: bool, outcome: &TaskRunOutcome) {
    for failure in &outcome.failures {
        warn!(
            task = %key,
            run_id = %outcome.run_id,
            item = %failure.item,
            error = %failure.error,
            "maintenance task could not process item"
        );
    }

    if is_logged {
        info!(
            task = %key,
            run_id = %outcome.run_id,
            selected = outcome.selected,
            affected = outcome.affected,
            failed = outcome.failures.len(),
            details = %outcome.details,
            "maintenance task completed"
        );
    } else {
        debug!(
            task = %key,
            run_id = %outcome.run_id,
            affected = outcome.affected,
            "maintenance task completed"
        );
    }
}

/// Progress sink that logs whenever a new 25 % step is reached.
struct ProgressLogger {
    task_key: String,
    last_step: AtomicU8,
}

impl ProgressLogger {
    fn new(task_key: &str) -> Self {
        Self {
            task_key: task_key.to_owned(),
            last_step: AtomicU8::new(0),
        }
    }
}

impl ProgressSink for ProgressLogger {
    fn report(&self, progress: ProgressPercent) {
        // Truncation is intended: value is within 0..=100.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step = (progress.value() / PROGRESS_LOG_STEP).floor() as u8;

        if self.last_step.fetch_max(step, Ordering::Relaxed) < step {
            info!(task = %self.task_key, progress = %progress, "maintenance task progress");
        }
    }
}
