mod file_store;
mod progress;
mod summary;

pub use file_store::{DeleteOutcome, LogFileStore};
pub use progress::ProgressSink;
pub use summary::{FileDeletionFailure, SweepSummary};
