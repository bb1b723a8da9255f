// src/lib.rs

pub mod calendar;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod protocol;
pub mod types;

use std::path::Path;

use chrono::{Local, Utc};
use tracing::{debug, info, warn};

use crate::calendar::GoogleCalendarGateway;
use crate::cli::{CliArgs, Command};
use crate::config::{Settings, load_settings};
use crate::engine::{CronSchedule, PollDispatcher, run_schedule};
use crate::errors::Result;
use crate::exec::{ExecOptions, ProcessExecutorBackend};

/// High-level entry point used by `main.rs`.
///
/// Settings are built once here and passed down; nothing mutates them later.
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match args.command {
        Command::Start { cron, output, error } => {
            start(&settings, &cron, output.as_deref(), error.as_deref()).await
        }
        Command::Authorize => calendar::auth::authorize(&settings).await,
        Command::Check { cron } => check(&settings, &cron),
    }
}

/// Run the service until Ctrl-C.
///
/// This wires together:
/// - the cron tick source
/// - the Google Calendar gateway (fatal if credentials are unusable)
/// - the process executor
/// - the poll-dispatch loop
pub async fn start(
    settings: &Settings,
    cron_expr: &str,
    output: Option<&Path>,
    error: Option<&Path>,
) -> Result<()> {
    let schedule = CronSchedule::parse(cron_expr)?;

    let cwd = std::env::current_dir()?;
    let exec_options = ExecOptions::resolve(settings, output, error, &cwd);
    debug!(redirects = ?exec_options.redirect_files(), "command redirection resolved");

    let gateway = GoogleCalendarGateway::connect(settings).await?;
    let executor = ProcessExecutorBackend::new();

    info!(
        "process started checking your calendar: {}",
        schedule.describe(&Local::now())
    );

    let mut dispatcher = PollDispatcher::new(gateway, executor, settings, exec_options, Utc::now());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    };

    run_schedule(&schedule, &mut dispatcher, shutdown).await
}

/// Validate settings and the cron pattern without touching the calendar.
fn check(settings: &Settings, cron_expr: &str) -> Result<()> {
    let schedule = CronSchedule::parse(cron_expr)?;
    let now = Local::now();

    println!("gcalcron check");
    println!("  credentials_path = {}", settings.credentials_path().display());
    println!("  token_path = {}", settings.token_path().display());
    println!("  calendar_id = {}", settings.calendar_id());
    println!("  list_order = {}", settings.list_order());
    println!("  shell = {}", settings.shell().unwrap_or("(platform default)"));
    if let Some(output) = settings.output() {
        println!("  output = {}", output.display());
    }
    if let Some(error) = settings.error() {
        println!("  error = {}", error.display());
    }
    println!();

    println!("next runs of '{}':", schedule.expression());
    for at in schedule.upcoming(&now, 5) {
        println!("  - {}", at.format("%Y-%m-%d %H:%M:%S %:z"));
    }

    debug!("check complete (no calendar access)");
    Ok(())
}

/// Select `ring` as the process-wide rustls provider.
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}
