// src/engine/tracker.rs

use std::collections::HashSet;

use tracing::trace;

/// Identifiers of events currently being processed.
///
/// An id enters right before its title is patched and leaves once the event
/// has been handed off or has failed. The set lives only in memory.
#[derive(Debug, Default)]
pub struct InFlightTracker {
    ids: HashSet<String>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self {
            ids: HashSet::new(),
        }
    }

    /// Insert `id`. Returns `false` if it was already present.
    pub fn add(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        trace!(event_id = id, "marked in-flight");
        self.ids.insert(id.to_string())
    }

    /// Remove `id`. Removing an unknown id is a no-op and returns `false`.
    pub fn remove(&mut self, id: &str) -> bool {
        let removed = self.ids.remove(id);
        if removed {
            trace!(event_id = id, "cleared in-flight");
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
