//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod maintenance;
mod progress;
mod retention;

pub use maintenance::{
    DAILY_INTERVAL_SECONDS, MaintenanceTaskInfo, MaintenanceTaskInfoInput, TaskTrigger,
};
pub use progress::ProgressPercent;
pub use retention::{FileRecord, RetentionPolicy, RetentionPolicyInput, extension_matches};
