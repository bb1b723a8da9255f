// src/config/validate.rs

use crate::config::model::Settings;
use crate::errors::{GcalcronError, Result};

pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_calendar(settings)?;
    validate_shell(settings)?;
    validate_redirects(settings)?;
    Ok(())
}

fn validate_calendar(settings: &Settings) -> Result<()> {
    if settings.calendar_id().trim().is_empty() {
        return Err(GcalcronError::ConfigError(
            "calendar_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_shell(settings: &Settings) -> Result<()> {
    if let Some(shell) = settings.shell() {
        if shell.trim().is_empty() {
            return Err(GcalcronError::ConfigError(
                "shell must not be empty when set".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_redirects(settings: &Settings) -> Result<()> {
    for (key, path) in [("output", settings.output()), ("error", settings.error())] {
        if let Some(path) = path {
            if path.is_dir() {
                return Err(GcalcronError::ConfigError(format!(
                    "{key} = {:?} is a directory, expected a file",
                    path
                )));
            }
        }
    }
    Ok(())
}
