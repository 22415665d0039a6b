// Append-only record store

pub mod framing;
pub mod task_log;

pub use task_log::TaskLog;
