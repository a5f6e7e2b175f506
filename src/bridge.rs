//! Bridge from the `log` crate facade.
//!
//! Installing [`LogBridge`] routes every `log::info!()`, `log::warn!()` etc.
//! in the process through a [`Logger`], so dependencies that log through
//! the facade share the same thresholds, hooks and sink.
//!
//! Level mapping: `Error` → Error, `Warn` → Warning, `Info` → Log,
//! `Debug`/`Trace` → Info.
//!
//! A record's category is its `target` when one was set explicitly
//! (`log::warn!(target: "Net", ...)`), otherwise it is inferred from the
//! module path. Records emitted while the same thread is already inside the
//! logger (from a pre-log hook, or while the persisted verbosity loads) are
//! dropped.

use std::fmt;

use crate::category::CallSite;
use crate::error::LogError;
use crate::level::Level;
use crate::logger::Logger;
use crate::reentry;

/// `log::Log` implementation forwarding to a [`Logger`].
#[derive(Debug, Clone, Copy)]
pub struct LogBridge {
    logger: &'static Logger,
}

impl LogBridge {
    /// Bridge forwarding to `logger`.
    pub fn new(logger: &'static Logger) -> Self {
        Self { logger }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        !reentry::is_active() && self.logger.should_emit(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let module = record.module_path();
        let target = record.target();
        // `log` defaults the target to the module path.
        let category = if module == Some(target) { "" } else { target };

        let call_site = CallSite {
            module: module.or(Some(target)),
            file: record.file(),
            line: record.line(),
        };
        self.logger.log_at(
            Level::from(record.level()),
            category,
            Some(record.args() as &dyn fmt::Display),
            None,
            &call_site,
        );
    }

    fn flush(&self) {}
}

/// Install a [`LogBridge`] to the global logger as the `log` crate's logger.
///
/// `max_level` is the facade's static ceiling; the logger's own thresholds
/// still apply below it.
pub fn init_log_bridge(max_level: log::LevelFilter) -> Result<(), LogError> {
    install(crate::logger(), max_level)
}

/// Install a [`LogBridge`] to `logger` as the `log` crate's logger.
pub fn install(logger: &'static Logger, max_level: log::LevelFilter) -> Result<(), LogError> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))?;
    log::set_max_level(max_level);
    Ok(())
}
