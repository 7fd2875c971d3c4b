use std::time::Duration;

use logreap_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Seconds in one day, the default cadence for housekeeping tasks.
pub const DAILY_INTERVAL_SECONDS: u64 = 24 * 60 * 60;

/// Recommended execution cadence handed to a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskTrigger {
    /// Run repeatedly with a fixed pause between starts.
    Interval {
        /// Seconds between two runs.
        interval_seconds: u64,
    },
}

impl TaskTrigger {
    /// Creates a validated interval trigger.
    pub fn interval(interval_seconds: u64) -> AppResult<Self> {
        if interval_seconds == 0 {
            return Err(AppError::Validation(
                "trigger interval must be greater than zero".to_owned(),
            ));
        }

        Ok(Self::Interval { interval_seconds })
    }

    /// Returns the once-a-day trigger.
    #[must_use]
    pub fn daily() -> Self {
        Self::Interval {
            interval_seconds: DAILY_INTERVAL_SECONDS,
        }
    }

    /// Returns stable trigger type value.
    #[must_use]
    pub fn trigger_type(&self) -> &'static str {
        match self {
            Self::Interval { .. } => "interval",
        }
    }

    /// Returns the pause between two runs.
    #[must_use]
    pub fn period(&self) -> Duration {
        match self {
            Self::Interval { interval_seconds } => Duration::from_secs(*interval_seconds),
        }
    }
}

/// Identity and visibility metadata of a maintenance task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTaskInfo {
    key: NonEmptyString,
    name: NonEmptyString,
    description: String,
    category: NonEmptyString,
    is_enabled: bool,
    is_hidden: bool,
    is_logged: bool,
}

/// Input payload used to construct validated task metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceTaskInfoInput {
    /// Stable identifier used by schedulers.
    pub key: String,
    /// Operator-facing name.
    pub name: String,
    /// Operator-facing description.
    pub description: String,
    /// Grouping label.
    pub category: String,
    /// Whether the scheduler should run the task.
    pub is_enabled: bool,
    /// Whether the task is hidden from operator listings.
    pub is_hidden: bool,
    /// Whether runs should be recorded in task history.
    pub is_logged: bool,
}

impl MaintenanceTaskInfo {
    /// Creates validated task metadata.
    pub fn new(input: MaintenanceTaskInfoInput) -> AppResult<Self> {
        let MaintenanceTaskInfoInput {
            key,
            name,
            description,
            category,
            is_enabled,
            is_hidden,
            is_logged,
        } = input;

        if key.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "task key '{key}' must not contain whitespace"
            )));
        }

        Ok(Self {
            key: NonEmptyString::new(key)?,
            name: NonEmptyString::new(name)?,
            description: description.trim().to_owned(),
            category: NonEmptyString::new(category)?,
            is_enabled,
            is_hidden,
            is_logged,
        })
    }

    /// Returns the stable task key.
    #[must_use]
    pub fn key(&self) -> &NonEmptyString {
        &self.key
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the task category.
    #[must_use]
    pub fn category(&self) -> &NonEmptyString {
        &self.category
    }

    /// Returns whether the task is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Returns whether the task is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    /// Returns whether task runs are logged.
    #[must_use]
    pub fn is_logged(&self) -> bool {
        self.is_logged
    }
}
