//! Output channels.
//!
//! [`LogSink`] is the seam to whatever finally displays a record. Routing is
//! three-way: errors, warnings, and everything else.

use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::Mutex;

use crate::level::Level;

/// Severity-specific output channel of a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Error output.
    Error,
    /// Warning output.
    Warning,
    /// Standard output for `Log` and `Info` records.
    Standard,
}

impl Channel {
    /// Channel that records at `level` are routed to.
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Error => Channel::Error,
            Level::Warning => Channel::Warning,
            Level::Log | Level::Info => Channel::Standard,
        }
    }
}

/// Destination for finished records.
pub trait LogSink: Send + Sync {
    /// Write one finished record to `channel`.
    fn write(&self, channel: Channel, message: &str);
}

/// Route `message` to the channel for `level`.
///
/// A panicking sink is contained here; the caller of the log entry point
/// never observes it.
pub fn dispatch(sink: &dyn LogSink, level: Level, message: &str) {
    let channel = Channel::for_level(level);
    if panic::catch_unwind(AssertUnwindSafe(|| sink.write(channel, message))).is_err() {
        // Never routed back through the logger.
        let _ = writeln!(std::io::stderr(), "vsdk-log: sink panicked writing to {channel:?}");
    }
}

/// Writes standard records to stdout and warnings/errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, channel: Channel, message: &str) {
        // Write failures (closed pipe, full disk) are dropped.
        match channel {
            Channel::Standard => {
                let mut out = std::io::stdout().lock();
                let _ = writeln!(out, "{message}");
            }
            Channel::Warning | Channel::Error => {
                let mut err = std::io::stderr().lock();
                let _ = writeln!(err, "{message}");
            }
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct CaptureSink {
    records: Mutex<Vec<(Channel, String)>>,
}

impl CaptureSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record written so far.
    pub fn records(&self) -> Vec<(Channel, String)> {
        self.records.lock().clone()
    }

    /// Remove and return every record written so far.
    pub fn take(&self) -> Vec<(Channel, String)> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Number of records written.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for CaptureSink {
    fn write(&self, channel: Channel, message: &str) {
        self.records.lock().push((channel, message.to_string()));
    }
}
