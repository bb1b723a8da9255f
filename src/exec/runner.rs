// src/exec/runner.rs

//! Individual command runner.

use std::fs::OpenOptions;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::errors::{GcalcronError, Result};
use crate::types::StreamTarget;

use super::DispatchedCommand;

/// How a command's process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Non-zero exit code, or `-1` when terminated by a signal.
    Failed(i32),
}

/// Run `dispatched` to completion and log any error with its code.
///
/// This is the body of the per-command worker task.
pub async fn run_and_report(dispatched: DispatchedCommand) {
    let event_id = dispatched.event_id.clone();
    let command = dispatched.command.clone();

    if let Err(err) = run_command(dispatched).await {
        error!(
            code = err.code(),
            event_id = %event_id,
            cmd = %command,
            error = ?err,
            "command could not be run"
        );
    }
}

/// Spawn the command through a shell, wait for it and report its exit.
///
/// - stdin is closed; stdout/stderr follow the resolved `StreamTarget`s.
/// - Logs one `executed` line once the process is started.
/// - A non-zero exit logs exactly one warning; a zero exit logs nothing else
///   above debug level.
///
/// The `Command` holds the redirect file handles; it lives until the end of
/// this function, so the handles are released once the process has exited,
/// whatever the outcome (or as soon as spawning fails).
pub async fn run_command(dispatched: DispatchedCommand) -> Result<CommandOutcome> {
    let DispatchedCommand {
        event_id,
        command,
        stdout,
        stderr,
        shell,
    } = dispatched;

    let mut cmd = shell_command(shell.as_deref(), &command);
    cmd.stdin(Stdio::null())
        .stdout(open_target(&stdout)?)
        .stderr(open_target(&stderr)?);

    let mut child = cmd.spawn().map_err(|source| GcalcronError::SpawnError {
        command: command.clone(),
        source,
    })?;

    info!(event_id = %event_id, cmd = %command, pid = child.id(), "executed");

    let status = child.wait().await?;
    let code = status.code().unwrap_or(-1);

    if status.success() {
        debug!(event_id = %event_id, cmd = %command, "command exited cleanly");
        Ok(CommandOutcome::Success)
    } else {
        warn!(
            event_id = %event_id,
            cmd = %command,
            exit_code = code,
            "'{command}' exited with code {code}"
        );
        Ok(CommandOutcome::Failed(code))
    }
}

/// Build a shell invocation for `command`.
///
/// A configured shell is called as `<shell> -c <command>`; otherwise the
/// platform shell is used.
fn shell_command(shell: Option<&str>, command: &str) -> Command {
    match shell {
        Some(shell) => {
            let mut c = Command::new(shell);
            c.arg("-c").arg(command);
            c
        }
        None if cfg!(windows) => {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        }
        None => {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        }
    }
}

/// Open one redirect target. Files are opened in append mode and created if
/// missing.
fn open_target(target: &StreamTarget) -> Result<Stdio> {
    match target {
        StreamTarget::Inherit => Ok(Stdio::inherit()),
        StreamTarget::AppendFile(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| GcalcronError::RedirectError {
                    path: path.clone(),
                    source,
                })?;
            Ok(Stdio::from(file))
        }
    }
}
