// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The poll loop hands decoded commands to an `ExecutorBackend` instead of
//! spawning processes itself, so tests can record dispatches without running
//! anything.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::errors::{GcalcronError, Result};

use super::DispatchedCommand;
use super::executor_loop::spawn_executor;

/// Trait abstracting how dispatched commands are executed.
///
/// `dispatch` must return as soon as the command is handed off; it never
/// waits for the process to finish.
pub trait ExecutorBackend: Send {
    fn dispatch(
        &mut self,
        command: DispatchedCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production backend: forwards commands to the background executor loop.
pub struct ProcessExecutorBackend {
    tx: mpsc::Sender<DispatchedCommand>,
}

impl ProcessExecutorBackend {
    /// Spawns the background executor loop immediately.
    pub fn new() -> Self {
        let tx = spawn_executor();
        Self { tx }
    }
}

impl Default for ProcessExecutorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutorBackend for ProcessExecutorBackend {
    fn dispatch(
        &mut self,
        command: DispatchedCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.tx.clone();

        Box::pin(async move {
            tx.send(command)
                .await
                .map_err(|_| GcalcronError::ExecutorClosed)
        })
    }
}
