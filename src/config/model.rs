// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{ListOrder, absolutize};

/// OAuth scope requested for both reading and renaming events.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Effective runtime settings.
///
/// Built exactly once at startup (defaults, then an optional override file)
/// and never mutated afterwards. Components receive a clone or a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    credentials_path: PathBuf,
    token_path: PathBuf,
    calendar_id: String,
    list_order: ListOrder,
    shell: Option<String>,
    output: Option<PathBuf>,
    error: Option<PathBuf>,
}

impl Settings {
    /// Compiled-in defaults, with credential files living in `home`.
    pub fn defaults_in(home: &Path) -> Self {
        Self {
            credentials_path: home.join("client_secret.json"),
            token_path: home.join("calendar_api_token.json"),
            calendar_id: "primary".to_string(),
            list_order: ListOrder::StartTime,
            shell: None,
            output: None,
            error: None,
        }
    }

    /// OAuth client secret (the "installed application" JSON).
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// File the OAuth token cache is persisted to.
    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    pub fn list_order(&self) -> ListOrder {
        self.list_order
    }

    /// Shell used to run commands; `None` means the platform shell.
    pub fn shell(&self) -> Option<&str> {
        self.shell.as_deref()
    }

    /// Process-wide default stdout target for commands.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Process-wide default stderr target for commands.
    pub fn error(&self) -> Option<&Path> {
        self.error.as_deref()
    }
}

/// Override file as read from TOML.
///
/// Every key is optional; present keys replace the matching default.
///
/// ```toml
/// calendar_id = "team@group.calendar.google.com"
/// list_order = "updated"
/// shell = "/bin/bash"
/// output = "logs/commands.out"
/// error = "logs/commands.err"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    #[serde(default)]
    pub token_path: Option<PathBuf>,

    #[serde(default)]
    pub calendar_id: Option<String>,

    #[serde(default)]
    pub list_order: Option<ListOrder>,

    #[serde(default)]
    pub shell: Option<String>,

    /// Default stdout file for every command.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Default stderr file for every command.
    #[serde(default)]
    pub error: Option<PathBuf>,
}

impl RawSettings {
    /// Apply every present field on top of `base`.
    ///
    /// Relative paths are resolved against `cwd`.
    pub fn overlay(self, base: Settings, cwd: &Path) -> Settings {
        let path = |p: PathBuf| absolutize(&p, cwd);
        Settings {
            credentials_path: self
                .credentials_path
                .map(path)
                .unwrap_or(base.credentials_path),
            token_path: self.token_path.map(path).unwrap_or(base.token_path),
            calendar_id: self.calendar_id.unwrap_or(base.calendar_id),
            list_order: self.list_order.unwrap_or(base.list_order),
            shell: self.shell.or(base.shell),
            output: self.output.map(path).or(base.output),
            error: self.error.map(path).or(base.error),
        }
    }
}
