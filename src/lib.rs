//! Leveled, category-tagged logging facility.
//!
//! Records are gated by two thresholds (an errors-only suppression flag and a
//! persisted, runtime-adjustable verbosity), tagged with a category inferred
//! from the caller, decorated for the output surface, enriched by pre-log
//! hooks, and routed to one of three sink channels.
//!
//! ```text
//! [12:01:02.345] [WARNING] [VSDK Net] connection lost
//! ```
//!
//! The free functions in this module log through a process-wide [`Logger`],
//! installed with [`init`] or created on first use from
//! [`LoggerConfig::from_env`].
//!
//! ```rust,no_run
//! use vsdk_log::{Logger, LoggerConfig};
//!
//! vsdk_log::init(Logger::from_config(&LoggerConfig::from_env())).ok();
//! vsdk_log::warn_in("Net", "connection lost");
//! vsdk_log::vsdk_info!("loaded {} assets", 12);
//! ```

use std::fmt;
use std::sync::OnceLock;

pub mod bridge;
pub mod category;
pub mod config;
pub mod error;
pub mod exception;
pub mod hooks;
pub mod level;
pub mod logger;
mod macros;
pub mod policy;
pub mod record;
mod reentry;
pub mod settings;
pub mod sink;
pub mod stack_trace;
pub mod surface;

pub use bridge::{LogBridge, init_log_bridge};
pub use category::{CallSite, ENTRY_POINT_DEPTH, NO_STACKTRACE, resolve_category};
pub use config::LoggerConfig;
pub use error::LogError;
pub use exception::Exception;
pub use hooks::{HookId, HookRegistry};
pub use level::{Level, ParseLevelError};
pub use logger::Logger;
pub use policy::{DEFAULT_VERBOSITY, LevelPolicy, VerbositySetting};
pub use record::{DEFAULT_PREFIX, LogRecord, RecordBuilder};
pub use settings::{MemorySettings, SettingsStore, VERBOSITY_KEY, YamlSettingsStore};
pub use sink::{CaptureSink, Channel, ConsoleSink, LogSink};
pub use stack_trace::StackTraceFormatter;
pub use surface::SurfaceCapabilities;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide logger.
///
/// Fails with [`LogError::AlreadyInitialized`] if a logger was already
/// installed, or created implicitly by an earlier log call.
pub fn init(logger: Logger) -> Result<&'static Logger, LogError> {
    let mut installed = false;
    let global = LOGGER.get_or_init(|| {
        installed = true;
        logger
    });
    if installed {
        Ok(global)
    } else {
        Err(LogError::AlreadyInitialized)
    }
}

/// The process-wide logger, created from the environment on first use.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::from_config(&LoggerConfig::from_env()))
}

/// Log at [`Level::Info`] through the global logger.
#[track_caller]
pub fn info(message: impl fmt::Display) {
    logger().info(message);
}

/// Log at [`Level::Info`] under `category` through the global logger.
#[track_caller]
pub fn info_in(category: &str, message: impl fmt::Display) {
    logger().info_in(category, message);
}

/// Log at [`Level::Log`] through the global logger.
#[track_caller]
pub fn debug(message: impl fmt::Display) {
    logger().debug(message);
}

/// Log at [`Level::Log`] under `category` through the global logger.
#[track_caller]
pub fn debug_in(category: &str, message: impl fmt::Display) {
    logger().debug_in(category, message);
}

/// Log at [`Level::Warning`] through the global logger.
#[track_caller]
pub fn warn(message: impl fmt::Display) {
    logger().warn(message);
}

/// Log at [`Level::Warning`] under `category` through the global logger.
#[track_caller]
pub fn warn_in(category: &str, message: impl fmt::Display) {
    logger().warn_in(category, message);
}

/// Log at [`Level::Warning`] with an attached error through the global
/// logger.
#[track_caller]
pub fn warn_with(category: &str, message: impl fmt::Display, exception: impl Into<Exception>) {
    logger().warn_with(category, message, exception);
}

/// Log at [`Level::Error`] through the global logger.
#[track_caller]
pub fn error(message: impl fmt::Display) {
    logger().error(message);
}

/// Log at [`Level::Error`] under `category` through the global logger.
#[track_caller]
pub fn error_in(category: &str, message: impl fmt::Display) {
    logger().error_in(category, message);
}

/// Log at [`Level::Error`] with an attached error through the global logger.
#[track_caller]
pub fn error_with(category: &str, message: impl fmt::Display, exception: impl Into<Exception>) {
    logger().error_with(category, message, exception);
}

/// Unifying entry point on the global logger.
#[track_caller]
pub fn log(
    level: Level,
    category: &str,
    message: Option<&dyn fmt::Display>,
    exception: Option<&Exception>,
) {
    logger().log(level, category, message, exception);
}
