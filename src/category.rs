//! Category inference from the caller's location.
//!
//! Public entry points capture their caller with `#[track_caller]`, so the
//! location recorded in a [`CallSite`] is the external code that called the
//! logger, never the logger itself. The same call site feeds both the
//! inferred category and the clickable source link on the category tag.
//!
//! # Call-chain invariant
//!
//! Every function between a public entry point and [`CallSite::caller`] must
//! be annotated `#[track_caller]`. A single missing annotation makes the
//! captured location point inside this crate. [`ENTRY_POINT_DEPTH`] records
//! the longest such chain and is checked by the call-site regression tests.

use std::panic::Location;
use std::path::Path;

/// Returned when no category can be derived from the call site.
pub const NO_STACKTRACE: &str = "NoStacktrace";

/// Number of `#[track_caller]` layers between the outermost public entry
/// point (the global `vsdk_log::warn` family) and [`CallSite::caller`]:
/// free function → `Logger` shorthand → `CallSite::caller`.
pub const ENTRY_POINT_DEPTH: usize = 3;

/// Source location of the external code that issued a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallSite<'a> {
    /// Module path (`my_crate::net::socket`), when known.
    pub module: Option<&'a str>,
    /// Source file as reported by the compiler.
    pub file: Option<&'a str>,
    /// 1-based line number.
    pub line: Option<u32>,
}

impl CallSite<'static> {
    /// The location that called the current `#[track_caller]` chain.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            module: None,
            file: Some(location.file()),
            line: Some(location.line()),
        }
    }

    /// Call site expanded by the logging macros.
    pub const fn here(module: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            module: Some(module),
            file: Some(file),
            line: Some(line),
        }
    }
}

impl<'a> CallSite<'a> {
    /// A call site with no information.
    pub const fn unknown() -> Self {
        Self {
            module: None,
            file: None,
            line: None,
        }
    }

    /// Short name of the construct that issued the call.
    ///
    /// Prefers the last segment of the module path, then the file stem
    /// (`mod.rs`, `lib.rs` and `main.rs` resolve to their directory name).
    pub fn short_name(&self) -> Option<&'a str> {
        if let Some(module) = self.module
            && let Some(last) = module.rsplit("::").next()
            && !last.is_empty()
        {
            return Some(last);
        }

        let path = Path::new(self.file?);
        let stem = path.file_stem()?.to_str()?;
        if matches!(stem, "mod" | "lib" | "main") {
            let parent = path.parent()?.file_name()?.to_str()?;
            // `src/lib.rs` says nothing more useful than the stem.
            if parent != "src" {
                return Some(parent);
            }
        }
        (!stem.is_empty()).then_some(stem)
    }
}

/// Resolve the category for a record.
///
/// An explicit, non-empty category is returned unchanged. Otherwise the
/// caller's short name is used, or [`NO_STACKTRACE`] when the call site
/// carries nothing usable.
pub fn resolve_category(explicit: &str, call_site: &CallSite<'_>) -> String {
    if !explicit.is_empty() {
        return explicit.to_string();
    }
    call_site
        .short_name()
        .map(str::to_string)
        .unwrap_or_else(|| NO_STACKTRACE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_category_wins() {
        let site = CallSite::here("app::net", "src/net.rs", 3);
        assert_eq!(resolve_category("Foo", &site), "Foo");
    }

    #[test]
    fn test_module_path_last_segment() {
        let site = CallSite::here("app::net::socket", "src/net/socket.rs", 3);
        assert_eq!(resolve_category("", &site), "socket");
    }

    #[test]
    fn test_file_stem_when_no_module() {
        let site = CallSite {
            module: None,
            file: Some("src/net/connection.rs"),
            line: Some(1),
        };
        assert_eq!(resolve_category("", &site), "connection");
    }

    #[test]
    fn test_mod_rs_uses_directory() {
        let site = CallSite {
            module: None,
            file: Some("src/renderer/mod.rs"),
            line: Some(1),
        };
        assert_eq!(resolve_category("", &site), "renderer");
    }

    #[test]
    fn test_top_level_lib_rs_keeps_stem() {
        let site = CallSite {
            module: None,
            file: Some("src/lib.rs"),
            line: Some(1),
        };
        assert_eq!(resolve_category("", &site), "lib");
    }

    #[test]
    fn test_unknown_site_is_sentinel() {
        assert_eq!(resolve_category("", &CallSite::unknown()), NO_STACKTRACE);
    }

    #[track_caller]
    fn wrapped() -> CallSite<'static> {
        CallSite::caller()
    }

    #[test]
    fn test_caller_reports_external_line() {
        let expected = line!() + 1;
        let site = wrapped();
        assert_eq!(site.line, Some(expected));
        assert_eq!(resolve_category("", &site), "category");
    }
}
