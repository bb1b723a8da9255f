// src/exec/mod.rs

//! Process execution layer.
//!
//! Each dispatched event becomes one detached child process started through
//! a shell with `tokio::process::Command`. The poll loop never waits for it.
//!
//! - [`backend`] provides the `ExecutorBackend` trait the poll loop talks to,
//!   and the production `ProcessExecutorBackend`.
//! - [`executor_loop`] owns the channel-fed loop that spawns one Tokio task
//!   per command.
//! - [`runner`] runs a single command: redirection, spawn, exit reporting.

pub mod backend;
pub mod executor_loop;
pub mod runner;

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::types::StreamTarget;

pub use backend::{ExecutorBackend, ProcessExecutorBackend};
pub use executor_loop::spawn_executor;
pub use runner::{CommandOutcome, run_command};

/// Launch options shared by every command of one `start` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    pub stdout: StreamTarget,
    pub stderr: StreamTarget,
    /// `None` uses the platform shell.
    pub shell: Option<String>,
}

impl ExecOptions {
    /// Resolve redirection targets.
    ///
    /// `output` / `error` come from the command line and win over the
    /// settings defaults, which win over inheriting our own streams.
    pub fn resolve(
        settings: &Settings,
        output: Option<&Path>,
        error: Option<&Path>,
        cwd: &Path,
    ) -> Self {
        Self {
            stdout: StreamTarget::resolve(output, settings.output(), cwd),
            stderr: StreamTarget::resolve(error, settings.error(), cwd),
            shell: settings.shell().map(str::to_string),
        }
    }

    /// Paths that will be appended to, for startup logging.
    pub fn redirect_files(&self) -> Vec<&PathBuf> {
        [&self.stdout, &self.stderr]
            .into_iter()
            .filter_map(|t| match t {
                StreamTarget::AppendFile(p) => Some(p),
                StreamTarget::Inherit => None,
            })
            .collect()
    }
}

/// One command to run on behalf of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedCommand {
    pub event_id: String,
    pub command: String,
    pub stdout: StreamTarget,
    pub stderr: StreamTarget,
    pub shell: Option<String>,
}

impl DispatchedCommand {
    pub fn new(event_id: impl Into<String>, command: impl Into<String>, options: &ExecOptions) -> Self {
        Self {
            event_id: event_id.into(),
            command: command.into(),
            stdout: options.stdout.clone(),
            stderr: options.stderr.clone(),
            shell: options.shell.clone(),
        }
    }
}
