// src/exec/executor_loop.rs

//! Background loop that turns dispatched commands into running processes.

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::DispatchedCommand;
use super::runner::run_and_report;

/// Spawn the background executor loop.
///
/// Every received command runs in its own Tokio task which owns the child
/// process and its redirect files until the process exits. Nothing is
/// cancelled or timed out; the loop only ends when all senders are dropped.
pub fn spawn_executor() -> mpsc::Sender<DispatchedCommand> {
    let (tx, mut rx) = mpsc::channel::<DispatchedCommand>(32);

    tokio::spawn(async move {
        info!("executor loop started");

        while let Some(command) = rx.recv().await {
            debug!(event_id = %command.event_id, "handing command to worker task");
            tokio::spawn(run_and_report(command));
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}
