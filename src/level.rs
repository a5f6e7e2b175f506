//! Severity levels.
//!
//! Levels are totally ordered by their numeric rank. A lower rank is more
//! severe: `Error` (0) outranks everything, `Info` (3) is the chattiest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity rank of a log entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Failures. Never suppressed.
    Error = 0,
    /// Recoverable problems.
    #[default]
    Warning = 1,
    /// Plain log output (the host's standard channel).
    Log = 2,
    /// Verbose informational chatter.
    Info = 3,
}

impl Level {
    /// Numeric rank; lower means more severe.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Upper-case name used in the record's level tag.
    pub fn name(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warning => "WARNING",
            Level::Log => "LOG",
            Level::Info => "INFO",
        }
    }

    /// Display name for settings UIs and the persisted setting.
    pub fn display_name(self) -> &'static str {
        match self {
            Level::Error => "Error",
            Level::Warning => "Warning",
            Level::Log => "Log",
            Level::Info => "Info",
        }
    }

    /// All levels, most severe first.
    pub fn all() -> &'static [Level] {
        &[Level::Error, Level::Warning, Level::Log, Level::Info]
    }

    /// Look up a level by its numeric rank.
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::all().iter().copied().find(|l| l.rank() == rank)
    }

    /// Whether a record at `self` passes a threshold of `threshold`.
    pub fn within(self, threshold: Level) -> bool {
        self.rank() <= threshold.rank()
    }

    /// Convert to a `log::LevelFilter` of equivalent verbosity.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Level::Error => log::LevelFilter::Error,
            Level::Warning => log::LevelFilter::Warn,
            Level::Log => log::LevelFilter::Info,
            Level::Info => log::LevelFilter::Trace,
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Log,
            log::Level::Debug | log::Level::Trace => Level::Info,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a string names no known level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    /// Accepts a level name in any case (`warn` is an alias for `Warning`)
    /// or its numeric rank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rank) = trimmed.parse::<u8>() {
            return Level::from_rank(rank).ok_or_else(|| ParseLevelError(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warning" | "warn" => Ok(Level::Warning),
            "log" => Ok(Level::Log),
            "info" => Ok(Level::Info),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
