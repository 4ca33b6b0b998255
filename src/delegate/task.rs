//! Task runner invocation

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};

use crate::bootstrap::{BaseEnv, EnvOverlay, PinnedRoot};
use crate::delegate::log::LogSink;
use crate::error::{LaunchError, Result};

/// Everything the task runner is started with
#[derive(Debug)]
pub struct TaskInvocation<'a> {
    /// Program followed by its arguments, e.g. `["invoke", "analytics"]`
    pub command: &'a [String],
    pub root: &'a PinnedRoot,
    pub base: &'a BaseEnv,
    pub overlay: &'a EnvOverlay,
}

impl TaskInvocation<'_> {
    fn build(&self) -> Result<Command> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or(LaunchError::EmptyTaskCommand)?;

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(self.root.path());
        self.base.apply(&mut cmd);
        // A PATH set here is also the one used to look up `program`
        self.overlay.apply(&mut cmd);
        Ok(cmd)
    }
}

/// Exit code for a runner that could not be started, as `sh` reports it
pub const EXIT_NOT_FOUND: i32 = 127;
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Run the task with stdout and stderr both appended to `log`, block until
/// it exits, and return its exit code unchanged.
///
/// A runner that cannot be started is treated the way `sh` treats it: a
/// one-line diagnostic goes to the log and the code is 127 (not found) or
/// 126 (anything else, e.g. not executable).
pub fn run_task(invocation: &TaskInvocation<'_>, log: LogSink) -> Result<i32> {
    let mut cmd = invocation.build()?;
    let (stdout, stderr) = log.stdio_pair()?;
    cmd.stdout(stdout).stderr(stderr);

    let status = match cmd.status() {
        Ok(status) => status,
        Err(e) => {
            let program = &invocation.command[0];
            let code = spawn_failure_code(&e);
            tracing::debug!(%program, error = %e, code, "task runner could not be started");
            log.write_line(&spawn_failure_line(program, &e))?;
            return Ok(code);
        }
    };

    let code = exit_code_of(status);
    tracing::debug!(%status, code, "task runner exited");
    Ok(code)
}

fn spawn_failure_code(error: &io::Error) -> i32 {
    match error.kind() {
        io::ErrorKind::NotFound => EXIT_NOT_FOUND,
        _ => EXIT_NOT_EXECUTABLE,
    }
}

fn spawn_failure_line(program: &str, error: &io::Error) -> String {
    let reason = match error.kind() {
        io::ErrorKind::NotFound => "not found".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        _ => error.to_string(),
    };
    format!("{}: {}: {}", env!("CARGO_PKG_NAME"), program, reason)
}

/// Exit code as a shell would report it: the status code, or `128 + signal`
/// when the process was killed.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}
