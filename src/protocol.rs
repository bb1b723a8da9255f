// src/protocol.rs

//! Event protocol: how a calendar event encodes a command.
//!
//! An event is executable when its title starts with [`EXECUTE_MARKER`].
//! The command is the event body when it has content, otherwise the rest of
//! the title. Once dispatched, the title is rewritten to start with
//! [`EXECUTED_MARKER`] so later polls no longer qualify it.

use crate::errors::{GcalcronError, Result};

/// Title prefix marking an event as a command to run.
pub const EXECUTE_MARKER: &str = "Execute:";

/// Title prefix written back once the command was dispatched.
pub const EXECUTED_MARKER: &str = "[Executed]";

/// Command and replacement title extracted from one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    pub command: String,
    pub executed_title: String,
}

pub fn is_executable(title: &str) -> bool {
    title.starts_with(EXECUTE_MARKER)
}

/// Title text after the marker and its separating whitespace.
///
/// Returns `None` when the title does not carry the marker.
pub fn title_remainder(title: &str) -> Option<&str> {
    title
        .strip_prefix(EXECUTE_MARKER)
        .map(|rest| rest.trim_start())
}

/// Title the event is renamed to after dispatch.
pub fn executed_title(remainder: &str) -> String {
    if remainder.is_empty() {
        EXECUTED_MARKER.to_string()
    } else {
        format!("{EXECUTED_MARKER} {remainder}")
    }
}

/// Decode an executable event.
///
/// - A body containing any non-whitespace character is used verbatim.
/// - Otherwise the title remainder is the command.
/// - An empty command is rejected with `EmptyCommand`.
///
/// Callers check [`is_executable`] first; a title without the marker has an
/// empty remainder.
pub fn decode(event_id: &str, title: &str, body: Option<&str>) -> Result<DecodedEvent> {
    let remainder = title_remainder(title).unwrap_or_default();

    let command = match body {
        Some(b) if !b.trim().is_empty() => b,
        _ => remainder,
    };

    if command.trim().is_empty() {
        return Err(GcalcronError::EmptyCommand {
            event_id: event_id.to_string(),
        });
    }

    Ok(DecodedEvent {
        command: command.to_string(),
        executed_title: executed_title(remainder),
    })
}
