//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod local_log_file_store;

pub use local_log_file_store::LocalLogFileStore;
