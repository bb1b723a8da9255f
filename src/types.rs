use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// Field the calendar list query is ordered by.
///
/// Ordering is advisory: every qualifying event in the window is processed
/// regardless of the order it arrives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ListOrder {
    #[serde(rename = "startTime")]
    StartTime,
    #[serde(rename = "updated")]
    Updated,
}

impl ListOrder {
    /// Value expected by the Calendar API `orderBy` parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ListOrder::StartTime => "startTime",
            ListOrder::Updated => "updated",
        }
    }
}

impl Default for ListOrder {
    fn default() -> Self {
        ListOrder::StartTime
    }
}

impl fmt::Display for ListOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for ListOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "startTime" => Ok(ListOrder::StartTime),
            "updated" => Ok(ListOrder::Updated),
            other => Err(format!(
                "invalid list_order: {other} (expected \"startTime\" or \"updated\")"
            )),
        }
    }
}

/// Where a spawned command's stdout or stderr goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamTarget {
    /// Share the parent's stream.
    Inherit,
    /// Append to the file at this (absolute) path, creating it if needed.
    AppendFile(PathBuf),
}

impl Default for StreamTarget {
    fn default() -> Self {
        StreamTarget::Inherit
    }
}

impl StreamTarget {
    /// Pick the effective target for one stream.
    ///
    /// A per-invocation path wins over the process-wide default path, which
    /// wins over inheriting the parent's stream. Relative paths are resolved
    /// against `cwd`.
    pub fn resolve(per_invocation: Option<&Path>, process_default: Option<&Path>, cwd: &Path) -> Self {
        match per_invocation.or(process_default) {
            Some(path) => StreamTarget::AppendFile(absolutize(path, cwd)),
            None => StreamTarget::Inherit,
        }
    }
}

/// Join `path` onto `cwd` unless it is already absolute.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
