// src/engine/mod.rs

//! Orchestration engine for gcalcron.
//!
//! - [`schedule`] is the tick source: a cron expression driving a handler.
//! - [`poller`] is the per-tick poll-dispatch cycle.
//! - [`tracker`] holds the in-flight event ids shared across ticks.

pub mod poller;
pub mod schedule;
pub mod tracker;

pub use poller::{PollDispatcher, Qualification, TickReport, qualify};
pub use schedule::{CronSchedule, TickHandler, run_schedule};
pub use tracker::InFlightTracker;
