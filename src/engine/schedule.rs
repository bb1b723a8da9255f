// src/engine/schedule.rs

//! Tick source: a cron expression evaluated in local time.
//!
//! [`run_schedule`] sleeps until each fire time and awaits the handler before
//! computing the next one, so ticks never overlap. Occurrences that pass
//! while a tick is still running are skipped, not queued.

use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tracing::{debug, info};

use crate::calendar::CalendarGateway;
use crate::errors::{GcalcronError, Result};
use crate::exec::ExecutorBackend;

use super::poller::PollDispatcher;

/// Parsed cron expression with six (sec min hour day month weekday) or seven
/// (plus year) fields.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expr: String,
    schedule: cron::Schedule,
}

impl CronSchedule {
    pub fn parse(expr: &str) -> Result<Self> {
        let fields = expr.split_whitespace().count();
        if !(6..=7).contains(&fields) {
            return Err(GcalcronError::InvalidCron {
                expr: expr.to_string(),
                reason: format!(
                    "expected 6 fields (sec min hour day month weekday), optionally followed by a year; got {fields}"
                ),
            });
        }

        let schedule = cron::Schedule::from_str(expr).map_err(|e| GcalcronError::InvalidCron {
            expr: expr.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            expr: expr.to_string(),
            schedule,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }

    /// First occurrence strictly after `after`.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(after).next()
    }

    /// Up to `n` occurrences strictly after `after`.
    pub fn upcoming<Tz: TimeZone>(&self, after: &DateTime<Tz>, n: usize) -> Vec<DateTime<Tz>> {
        self.schedule.after(after).take(n).collect()
    }

    /// Human readable summary for startup logs.
    pub fn describe(&self, now: &DateTime<Local>) -> String {
        match self.next_after(now) {
            Some(next) => format!(
                "'{}' (next run at {})",
                self.expr,
                next.format("%Y-%m-%d %H:%M:%S %:z")
            ),
            None => format!("'{}' (no upcoming runs)", self.expr),
        }
    }
}

/// Work performed on every scheduled occurrence.
pub trait TickHandler: Send {
    fn on_tick(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

impl<G: CalendarGateway, E: ExecutorBackend> TickHandler for PollDispatcher<G, E> {
    fn on_tick(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.tick().await;
        })
    }
}

/// Drive `handler` on every occurrence of `schedule` until `shutdown`
/// resolves or the schedule runs out.
///
/// Shutdown is only observed between ticks; a running tick is allowed to
/// finish.
pub async fn run_schedule<H, S>(schedule: &CronSchedule, handler: &mut H, shutdown: S) -> Result<()>
where
    H: TickHandler + ?Sized,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut last_fired: Option<DateTime<Local>> = None;

    loop {
        let now = Local::now();
        // Never fire the same occurrence twice, even if the wall clock lags
        // behind the timer.
        let from = match last_fired {
            Some(last) if last > now => last,
            _ => now,
        };

        let Some(next) = schedule.next_after(&from) else {
            info!(cron = %schedule.expression(), "schedule has no further occurrences; stopping");
            return Ok(());
        };

        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        debug!(next = %next, wait_ms = wait.as_millis() as u64, "waiting for next tick");

        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested; stopping schedule");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {}
        }

        last_fired = Some(next);
        debug!(occurrence = %next, "tick");
        handler.on_tick().await;
    }
}
