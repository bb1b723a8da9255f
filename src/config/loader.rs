// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSettings, Settings};
use crate::config::validate::validate_settings;
use crate::errors::Result;
use crate::types::absolutize;

/// Read an override file into a `RawSettings`.
///
/// This only performs TOML deserialization; layering and validation happen
/// in [`load_settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawSettings = toml::from_str(&contents)?;

    Ok(raw)
}

/// Layer `raw` over `base` and validate the result.
pub fn build_settings(base: Settings, raw: RawSettings, cwd: &Path) -> Result<Settings> {
    let settings = raw.overlay(base, cwd);
    validate_settings(&settings)?;
    Ok(settings)
}

/// Build the process settings: compiled-in defaults, overlaid with the
/// optional override file given via `-C/--config`.
///
/// This is the only place settings are constructed in production.
pub fn load_settings(override_path: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let base = Settings::defaults_in(&home_dir());

    let raw = match override_path {
        Some(path) => {
            let path = absolutize(path, &cwd);
            debug!(path = %path.display(), "loading settings override");
            load_from_path(&path)?
        }
        None => RawSettings::default(),
    };

    build_settings(base, raw, &cwd)
}

/// The user's home directory, or `.` if it cannot be determined.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
