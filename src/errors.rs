// src/errors.rs

//! Crate-wide error type.
//!
//! Every variant carries a stable identifying code (see
//! [`GcalcronError::code`]) which is attached to the log line wherever the
//! error is finally handled.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error used for collaborator failures (calendar API, OAuth).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum GcalcronError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },

    #[error("Authentication error: {message}")]
    AuthError {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Failed to list events of calendar '{calendar_id}'")]
    FetchError {
        calendar_id: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to mark event '{event_id}' as executed")]
    PatchError {
        event_id: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to spawn '{command}'")]
    SpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open redirect target {path:?}")]
    RedirectError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Event '{event_id}' carries no command")]
    EmptyCommand { event_id: String },

    #[error("Executor loop is no longer accepting commands")]
    ExecutorClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GcalcronError {
    /// Stable identifier used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            GcalcronError::ConfigError(_) => "E_CONFIG",
            GcalcronError::IoError(_) => "E_IO",
            GcalcronError::TomlError(_) => "E_TOML",
            GcalcronError::InvalidCron { .. } => "E_CRON",
            GcalcronError::AuthError { .. } => "E_AUTH",
            GcalcronError::FetchError { .. } => "E_FETCH",
            GcalcronError::PatchError { .. } => "E_PATCH",
            GcalcronError::SpawnError { .. } => "E_SPAWN",
            GcalcronError::RedirectError { .. } => "E_REDIRECT",
            GcalcronError::EmptyCommand { .. } => "E_EMPTY_CMD",
            GcalcronError::ExecutorClosed => "E_EXECUTOR",
            GcalcronError::Other(_) => "E_OTHER",
        }
    }

    /// Errors that must abort the program before the first tick.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GcalcronError::ConfigError(_)
                | GcalcronError::TomlError(_)
                | GcalcronError::InvalidCron { .. }
                | GcalcronError::AuthError { .. }
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GcalcronError>;
