use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use gcalcron::calendar::{CalendarEvent, CalendarGateway, GatewayFuture, PollWindow};
use gcalcron::errors::GcalcronError;
use gcalcron::types::ListOrder;

/// In-memory calendar implementing `CalendarGateway`.
///
/// - `list_events` returns every stored event intersecting the window and
///   records the window.
/// - `patch_title` renames the stored event and records the call.
/// - Failures can be injected for the next N list calls or for patches of
///   specific ids.
///
/// Clones share state, so a test can keep a handle after moving one into a
/// `PollDispatcher`.
#[derive(Clone, Default)]
pub struct FakeCalendarGateway {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    events: Vec<CalendarEvent>,
    list_calls: Vec<PollWindow>,
    patches: Vec<(String, String)>,
    failing_lists: usize,
    failing_patches: HashSet<String>,
}

impl FakeCalendarGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        let gateway = Self::new();
        gateway.state.lock().unwrap().events = events;
        gateway
    }

    pub fn insert(&self, event: CalendarEvent) {
        self.state.lock().unwrap().events.push(event);
    }

    /// Make the next `n` list calls fail.
    pub fn fail_next_lists(&self, n: usize) {
        self.state.lock().unwrap().failing_lists = n;
    }

    /// Make every patch of `id` fail until [`Self::allow_patches_for`].
    pub fn fail_patches_for(&self, id: &str) {
        self.state.lock().unwrap().failing_patches.insert(id.to_string());
    }

    pub fn allow_patches_for(&self, id: &str) {
        self.state.lock().unwrap().failing_patches.remove(id);
    }

    /// Windows passed to `list_events`, including failed calls.
    pub fn list_calls(&self) -> Vec<PollWindow> {
        self.state.lock().unwrap().list_calls.clone()
    }

    /// `(event_id, new_title)` for every patch attempt.
    pub fn patches(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().patches.clone()
    }

    pub fn title_of(&self, id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .events
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.title.clone())
    }
}

impl CalendarGateway for FakeCalendarGateway {
    fn list_events<'a>(
        &'a self,
        window: &'a PollWindow,
        calendar_id: &'a str,
        _order: ListOrder,
    ) -> GatewayFuture<'a, Vec<CalendarEvent>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.list_calls.push(*window);

            if state.failing_lists > 0 {
                state.failing_lists -= 1;
                return Err(GcalcronError::FetchError {
                    calendar_id: calendar_id.to_string(),
                    source: "simulated list failure".into(),
                });
            }

            Ok(state
                .events
                .iter()
                .filter(|e| window.intersects(e.start, e.end))
                .cloned()
                .collect())
        })
    }

    fn patch_title<'a>(
        &'a self,
        _calendar_id: &'a str,
        event_id: &'a str,
        new_title: &'a str,
    ) -> GatewayFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state
                .patches
                .push((event_id.to_string(), new_title.to_string()));

            if state.failing_patches.contains(event_id) {
                return Err(GcalcronError::PatchError {
                    event_id: event_id.to_string(),
                    source: "simulated patch failure".into(),
                });
            }

            for event in state.events.iter_mut().filter(|e| e.id == event_id) {
                event.title = new_title.to_string();
            }
            Ok(())
        })
    }
}
