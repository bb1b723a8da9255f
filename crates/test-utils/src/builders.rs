#![allow(dead_code)]

use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use gcalcron::calendar::CalendarEvent;
use gcalcron::config::{RawSettings, Settings, build_settings};

/// Fixed reference instant so window arithmetic in tests is readable.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// `t0()` shifted by `secs` seconds.
pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

/// Settings with defaults rooted in a fake home directory.
pub fn test_settings() -> Settings {
    Settings::defaults_in(Path::new("/home/tester"))
}

/// Defaults overlaid with `raw`, relative paths resolved against `cwd`.
pub fn settings_with(raw: RawSettings, cwd: &Path) -> Settings {
    build_settings(test_settings(), raw, cwd).expect("Failed to build valid settings")
}

/// Builder for `CalendarEvent` to simplify test setup.
pub struct CalendarEventBuilder {
    event: CalendarEvent,
}

impl CalendarEventBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            event: CalendarEvent {
                id: id.to_string(),
                title: String::new(),
                body: None,
                start: None,
                end: None,
            },
        }
    }

    /// Shortcut for an `Execute:` event running `cmd`.
    pub fn execute(id: &str, cmd: &str) -> Self {
        Self::new(id).title(&format!("Execute: {cmd}"))
    }

    pub fn title(mut self, title: &str) -> Self {
        self.event.title = title.to_string();
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.event.body = Some(body.to_string());
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.event.start = Some(start);
        self.event.end = Some(end);
        self
    }

    pub fn build(self) -> CalendarEvent {
        self.event
    }
}
