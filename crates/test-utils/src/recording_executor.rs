use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use gcalcron::errors::{GcalcronError, Result};
use gcalcron::exec::{DispatchedCommand, ExecutorBackend};

/// An executor backend that:
/// - records every dispatched command instead of running it
/// - can be switched to reject dispatches, like a closed executor loop.
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    dispatched: Arc<Mutex<Vec<DispatchedCommand>>>,
    closed: Arc<Mutex<bool>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<DispatchedCommand> {
        self.dispatched.lock().unwrap().clone()
    }

    /// Event ids in dispatch order.
    pub fn dispatched_ids(&self) -> Vec<String> {
        self.dispatched
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.event_id.clone())
            .collect()
    }

    pub fn close(&self) {
        *self.closed.lock().unwrap() = true;
    }
}

impl ExecutorBackend for RecordingExecutor {
    fn dispatch(
        &mut self,
        command: DispatchedCommand,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let dispatched = Arc::clone(&self.dispatched);
        let closed = Arc::clone(&self.closed);

        Box::pin(async move {
            if *closed.lock().unwrap() {
                return Err(GcalcronError::ExecutorClosed);
            }
            dispatched.lock().unwrap().push(command);
            Ok(())
        })
    }
}
