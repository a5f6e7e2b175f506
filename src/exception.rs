//! Errors attached to a log call.
//!
//! [`Exception`] snapshots an error at the call site: its message, its
//! `source()` chain, and a raw stack trace when one was captured. The
//! logger appends it to the record after the pre-log hooks have run, with
//! the stack trace passed through the
//! [`StackTraceFormatter`](crate::stack_trace::StackTraceFormatter).

use std::backtrace::BacktraceStatus;
use std::error::Error;
use std::fmt;

/// Snapshot of an error attached to a log call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Exception {
    message: String,
    causes: Vec<String>,
    stack_trace: Option<String>,
}

impl Exception {
    /// Exception with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Snapshot `err` and its `source()` chain.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            causes,
            stack_trace: None,
        }
    }

    /// Attach a raw stack trace.
    pub fn with_stack_trace(mut self, trace: impl Into<String>) -> Self {
        let trace = trace.into();
        self.stack_trace = (!trace.trim().is_empty()).then_some(trace);
        self
    }

    /// Top-level message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Messages of the `source()` chain, outermost first.
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    /// Raw stack trace, if one was captured.
    pub fn stack_trace(&self) -> Option<&str> {
        self.stack_trace.as_deref()
    }

    /// Text block appended to a record; `format_trace` rewrites the stack
    /// trace before it is appended.
    pub(crate) fn render(&self, format_trace: impl FnOnce(&str) -> String) -> String {
        let mut block = self.message.clone();
        for cause in &self.causes {
            block.push_str("\nCaused by: ");
            block.push_str(cause);
        }
        if let Some(trace) = &self.stack_trace {
            block.push('\n');
            block.push_str(&format_trace(trace));
        }
        block
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&anyhow::Error> for Exception {
    /// Captures the backtrace when `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`
    /// enabled one.
    fn from(err: &anyhow::Error) -> Self {
        let mut causes: Vec<String> = err.chain().skip(1).map(|c| c.to_string()).collect();
        causes.dedup();
        let exception = Self {
            message: err.to_string(),
            causes,
            stack_trace: None,
        };
        let backtrace = err.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            exception.with_stack_trace(backtrace.to_string())
        } else {
            exception
        }
    }
}

impl From<anyhow::Error> for Exception {
    fn from(err: anyhow::Error) -> Self {
        Self::from(&err)
    }
}

impl From<&Exception> for Exception {
    fn from(exception: &Exception) -> Self {
        exception.clone()
    }
}

impl From<std::io::Error> for Exception {
    fn from(err: std::io::Error) -> Self {
        Self::from_error(&err)
    }
}

impl From<&str> for Exception {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Exception {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Context;

    #[derive(Debug, thiserror::Error)]
    #[error("outer failure")]
    struct Outer {
        #[source]
        inner: std::io::Error,
    }

    #[test]
    fn test_from_error_collects_sources() {
        let err = Outer {
            inner: std::io::Error::other("disk gone"),
        };
        let exception = Exception::from_error(&err);
        assert_eq!(exception.message(), "outer failure");
        assert_eq!(exception.causes(), ["disk gone".to_string()]);
        assert_eq!(exception.stack_trace(), None);
    }

    #[test]
    fn test_from_anyhow_context_chain() {
        let result: anyhow::Result<()> =
            Err(std::io::Error::other("refused")).context("connecting to relay");
        let exception = Exception::from(result.unwrap_err());
        assert_eq!(exception.message(), "connecting to relay");
        assert_eq!(exception.causes(), ["refused".to_string()]);
    }

    #[test]
    fn test_render_block() {
        let exception = Exception::new("boom").with_stack_trace("  at A.B in x:1");
        let block = exception.render(|t| t.to_uppercase());
        assert_eq!(block, "boom\n  AT A.B IN X:1");
    }

    #[test]
    fn test_render_with_causes() {
        let err = Outer {
            inner: std::io::Error::other("disk gone"),
        };
        let block = Exception::from_error(&err).render(str::to_string);
        assert_eq!(block, "outer failure\nCaused by: disk gone");
    }

    #[test]
    fn test_blank_stack_trace_is_dropped() {
        let exception = Exception::new("x").with_stack_trace("   \n");
        assert_eq!(exception.stack_trace(), None);
    }
}
