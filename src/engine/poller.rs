// src/engine/poller.rs

//! The poll-dispatch loop body: one call to [`PollDispatcher::tick`] per
//! scheduled occurrence.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::calendar::{CalendarEvent, CalendarGateway, PollWindow};
use crate::config::Settings;
use crate::errors::{GcalcronError, Result};
use crate::exec::{DispatchedCommand, ExecOptions, ExecutorBackend};
use crate::protocol;
use crate::types::ListOrder;

use super::tracker::InFlightTracker;

/// Result of checking one listed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualification {
    /// Title does not carry the execute marker.
    NotExecutable,
    /// A previous attempt for this id has not resolved yet.
    InFlight,
    /// Process it.
    Ready,
}

/// Decide whether `event` should be processed right now.
pub fn qualify(event: &CalendarEvent, tracker: &InFlightTracker) -> Qualification {
    if !protocol::is_executable(&event.title) {
        Qualification::NotExecutable
    } else if tracker.contains(&event.id) {
        Qualification::InFlight
    } else {
        Qualification::Ready
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub window: PollWindow,
    /// Events returned by the gateway (0 when the fetch failed).
    pub fetched: usize,
    /// Ids whose command was handed to the executor.
    pub dispatched: Vec<String>,
    /// Events ignored: not executable, in-flight or listed twice.
    pub skipped: usize,
    /// Ids whose processing failed (decode, patch or dispatch).
    pub failed: Vec<String>,
    pub fetch_failed: bool,
    /// Whether `last_poll_end` moved to the end of `window`.
    pub advanced: bool,
}

impl TickReport {
    fn new(window: PollWindow) -> Self {
        Self {
            window,
            fetched: 0,
            dispatched: Vec::new(),
            skipped: 0,
            failed: Vec::new(),
            fetch_failed: false,
            advanced: false,
        }
    }
}

/// Poll-dispatch loop state: the window start and the in-flight set, plus
/// the collaborators each tick talks to.
///
/// `tick` takes `&mut self`, so two ticks can never run at the same time.
pub struct PollDispatcher<G: CalendarGateway, E: ExecutorBackend> {
    gateway: G,
    executor: E,
    calendar_id: String,
    list_order: ListOrder,
    exec_options: ExecOptions,
    tracker: InFlightTracker,
    last_poll_end: DateTime<Utc>,
}

impl<G: CalendarGateway, E: ExecutorBackend> PollDispatcher<G, E> {
    /// `started_at` is the start of the first window.
    pub fn new(
        gateway: G,
        executor: E,
        settings: &Settings,
        exec_options: ExecOptions,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            gateway,
            executor,
            calendar_id: settings.calendar_id().to_string(),
            list_order: settings.list_order(),
            exec_options,
            tracker: InFlightTracker::new(),
            last_poll_end: started_at,
        }
    }

    pub fn last_poll_end(&self) -> DateTime<Utc> {
        self.last_poll_end
    }

    pub fn tracker(&self) -> &InFlightTracker {
        &self.tracker
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Window a tick at `now` would query.
    pub fn next_window(&self, now: DateTime<Utc>) -> PollWindow {
        PollWindow::new(self.last_poll_end, now)
    }

    pub async fn tick(&mut self) -> TickReport {
        self.tick_at(Utc::now()).await
    }

    /// Run one poll cycle with `now` as the window end.
    ///
    /// The window start only moves to `now` when the fetch and every patch
    /// succeeded; otherwise the next tick queries from the same start again.
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> TickReport {
        let window = self.next_window(now);
        let mut report = TickReport::new(window);

        let events = match self
            .gateway
            .list_events(&window, &self.calendar_id, self.list_order)
            .await
        {
            Ok(events) => events,
            Err(err) => {
                error!(
                    code = err.code(),
                    window = %window,
                    error = ?err,
                    "fetching events failed; window kept for next tick"
                );
                report.fetch_failed = true;
                return report;
            }
        };
        report.fetched = events.len();

        let mut seen_this_tick: HashSet<&str> = HashSet::new();
        let mut patch_failed = false;

        for event in &events {
            match qualify(event, &self.tracker) {
                Qualification::NotExecutable => {
                    report.skipped += 1;
                    continue;
                }
                Qualification::InFlight => {
                    debug!(event_id = %event.id, "event already in flight; skipping");
                    report.skipped += 1;
                    continue;
                }
                Qualification::Ready => {}
            }

            if !seen_this_tick.insert(event.id.as_str()) {
                debug!(event_id = %event.id, "event listed twice in one window; skipping");
                report.skipped += 1;
                continue;
            }

            self.tracker.add(&event.id);
            let result = self.process_event(event).await;
            self.tracker.remove(&event.id);

            match result {
                Ok(()) => report.dispatched.push(event.id.clone()),
                Err(err) => {
                    log_event_error(event, &err);
                    if matches!(err, GcalcronError::PatchError { .. }) {
                        patch_failed = true;
                    }
                    report.failed.push(event.id.clone());
                }
            }
        }

        if patch_failed {
            warn!(window = %window, "some events could not be marked; window kept for next tick");
        } else {
            self.last_poll_end = now;
            report.advanced = true;
        }

        if report.dispatched.is_empty() && report.failed.is_empty() {
            debug!(
                window = %window,
                fetched = report.fetched,
                skipped = report.skipped,
                "tick finished"
            );
        } else {
            info!(
                window = %window,
                fetched = report.fetched,
                dispatched = report.dispatched.len(),
                failed = report.failed.len(),
                skipped = report.skipped,
                advanced = report.advanced,
                "tick finished"
            );
        }

        report
    }

    /// Decode, mark as executed, then hand the command to the executor.
    async fn process_event(&mut self, event: &CalendarEvent) -> Result<()> {
        let decoded = protocol::decode(&event.id, &event.title, event.body.as_deref())?;

        self.gateway
            .patch_title(&self.calendar_id, &event.id, &decoded.executed_title)
            .await?;
        debug!(event_id = %event.id, title = %decoded.executed_title, "event marked as executed");

        let command = DispatchedCommand::new(&event.id, decoded.command, &self.exec_options);
        self.executor.dispatch(command).await
    }
}

fn log_event_error(event: &CalendarEvent, err: &GcalcronError) {
    match err {
        GcalcronError::EmptyCommand { .. } => warn!(
            code = err.code(),
            event_id = %event.id,
            title = %event.title,
            "event has no command; leaving it untouched"
        ),
        _ => error!(
            code = err.code(),
            event_id = %event.id,
            error = ?err,
            "processing event failed"
        ),
    }
}
