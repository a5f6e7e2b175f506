//! Formatting macros on the global logger.
//!
//! The macros capture `module_path!()`, `file!()` and `line!()` at the call
//! site, so the inferred category is the calling module's last path segment.
//! Formatting is skipped entirely when the level is filtered out.
//!
//! ```rust,no_run
//! vsdk_log::vsdk_warn!("retrying in {}s", 5);
//! vsdk_log::vsdk_error!(category: "Net", "socket closed: {}", "EOF");
//! ```

/// Log at an explicit level, with an optional `category: "..."` prefix.
#[macro_export]
macro_rules! vsdk_log {
    ($level:expr, category: $category:expr, $($arg:tt)+) => {{
        let logger = $crate::logger();
        let level: $crate::Level = $level;
        if logger.should_emit(level) {
            logger.log_at(
                level,
                $category,
                Some(&format_args!($($arg)+) as &dyn ::std::fmt::Display),
                None,
                &$crate::CallSite::here(module_path!(), file!(), line!()),
            );
        }
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::vsdk_log!($level, category: "", $($arg)+)
    };
}

/// Log at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! vsdk_info {
    ($($arg:tt)+) => {
        $crate::vsdk_log!($crate::Level::Info, $($arg)+)
    };
}

/// Log at [`Level::Log`](crate::Level::Log).
#[macro_export]
macro_rules! vsdk_debug {
    ($($arg:tt)+) => {
        $crate::vsdk_log!($crate::Level::Log, $($arg)+)
    };
}

/// Log at [`Level::Warning`](crate::Level::Warning).
#[macro_export]
macro_rules! vsdk_warn {
    ($($arg:tt)+) => {
        $crate::vsdk_log!($crate::Level::Warning, $($arg)+)
    };
}

/// Log at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! vsdk_error {
    ($($arg:tt)+) => {
        $crate::vsdk_log!($crate::Level::Error, $($arg)+)
    };
}
