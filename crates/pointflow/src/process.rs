use std::{
    path::Path,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use tokio::process::{Child, ChildStdout, Command};
use tracing::debug;

use crate::{error::TaskError, session::TaskConfig};

/// Where the worker process ended up, as observed by the driver task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The process has not been joined yet.
    Running,
    /// Clean exit with status zero; gates the completion notifier.
    Success,
    /// Non-zero exit, or abnormal termination (no exit code on Unix when
    /// the process was killed by a signal).
    Failure(Option<i32>),
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            ExitOutcome::Success
        } else {
            ExitOutcome::Failure(status.code())
        }
    }
}

/// Spawns the worker with stdout piped and the remaining stdio detached.
/// The numeric arguments are forwarded in order. `kill_on_drop` ensures no
/// child outlives its owning driver task.
pub(crate) fn spawn_worker(config: &TaskConfig) -> Result<(Child, ChildStdout), TaskError> {
    let mut command = Command::new(config.binary());
    for argument in config.arguments() {
        command.arg(argument.to_string());
    }
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = spawn_with_retry(&mut command, config.binary())?;
    let stdout = child.stdout.take().ok_or(TaskError::MissingStdout)?;
    debug!(binary = ?config.binary(), "worker process started");
    Ok((child, stdout))
}

/// Joins the child; any termination, however abnormal, resolves to a
/// definite outcome. Ownership keeps this a single-shot operation.
pub(crate) async fn wait_outcome(child: &mut Child) -> Result<ExitOutcome, TaskError> {
    let status = child
        .wait()
        .await
        .map_err(|source| TaskError::Wait { source })?;
    Ok(ExitOutcome::from(status))
}

fn spawn_with_retry(command: &mut Command, binary: &Path) -> Result<Child, TaskError> {
    let mut backoff = Duration::from_millis(2);
    for attempt in 0..5 {
        match command.spawn() {
            Ok(child) => return Ok(child),
            Err(source) => {
                // Freshly written executables can briefly report ETXTBSY
                // while another process still holds the file open.
                let is_busy = matches!(source.kind(), std::io::ErrorKind::ExecutableFileBusy)
                    || source.raw_os_error() == Some(26);
                if is_busy && attempt < 4 {
                    std::thread::sleep(backoff);
                    backoff = std::cmp::min(backoff * 2, Duration::from_millis(50));
                    continue;
                }
                return Err(TaskError::Spawn {
                    binary: binary.to_path_buf(),
                    source,
                });
            }
        }
    }

    unreachable!("spawn_with_retry should return before exhausting retries")
}
