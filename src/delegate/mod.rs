//! Handing off to the task runner

pub mod log;
pub mod task;

pub use log::{open_log, LogSink};
pub use task::{exit_code_of, run_task, TaskInvocation};
