// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `gcalcron`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gcalcron",
    version,
    about = "Run shell commands scheduled as Google Calendar events.",
    long_about = None
)]
pub struct CliArgs {
    /// TOML file overriding the built-in settings.
    #[arg(short = 'C', long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GCALCRON_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Periodically check the calendar and run events titled "Execute: ...".
    Start {
        /// Cron pattern with six fields: sec min hour day month weekday.
        #[arg(value_name = "CRON")]
        cron: String,

        /// Append command stdout to this file.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Append command stderr to this file.
        #[arg(short, long, value_name = "FILE")]
        error: Option<PathBuf>,
    },

    /// Run the OAuth consent flow and store the token.
    ///
    /// Requires the client secret at `credentials_path`.
    Authorize,

    /// Validate settings and the cron pattern, show upcoming runs, and exit.
    Check {
        #[arg(value_name = "CRON")]
        cron: String,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
