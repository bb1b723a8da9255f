// src/calendar/mod.rs

//! Calendar Gateway: the adapter between the poll loop and the remote
//! calendar service.
//!
//! The poll loop only ever talks to a [`CalendarGateway`]. Production uses
//! [`GoogleCalendarGateway`]; tests plug in an in-memory fake.

pub mod auth;
pub mod google;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::types::ListOrder;

pub use google::GoogleCalendarGateway;

/// Transient copy of a calendar event as returned by a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Unique per calendar.
    pub id: String,
    /// Display title ("summary" in Google Calendar terms).
    pub title: String,
    /// Optional free-text body ("description").
    pub body: Option<String>,
    /// Only used to decide window membership; `None` for all-day events.
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Half-open query interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PollWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether an event spanning `[start, end)` intersects this window.
    ///
    /// Missing bounds are treated as unbounded on that side.
    pub fn intersects(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
        let starts_before_window_end = start.is_none_or(|s| s < self.end);
        let ends_after_window_start = end.is_none_or(|e| e > self.start);
        starts_before_window_end && ends_after_window_start
    }
}

impl fmt::Display for PollWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Boxed future returned by gateway operations.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Operations the poll loop needs from a calendar service.
///
/// Both calls are asynchronous and fallible; failures surface as
/// `FetchError` / `PatchError`.
pub trait CalendarGateway: Send + Sync {
    /// List events whose time range intersects `window`.
    fn list_events<'a>(
        &'a self,
        window: &'a PollWindow,
        calendar_id: &'a str,
        order: ListOrder,
    ) -> GatewayFuture<'a, Vec<CalendarEvent>>;

    /// Replace the title of a single event.
    fn patch_title<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        new_title: &'a str,
    ) -> GatewayFuture<'a, ()>;
}
