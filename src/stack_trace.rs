//! Stack trace reformatting.
//!
//! Two frame shapes are recognised:
//! - `at <method> in <path>:<line>`
//! - `at <path>:<line>:<column>` (the location line of a Rust std backtrace)
//!
//! A recognised fragment whose file exists on disk is rewritten with the
//! project root stripped from its path, a bold line number, and a
//! `file://` link when the surface supports one. Everything else, including
//! fragments pointing at files that do not exist, is left byte-for-byte
//! unchanged.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::surface::{self, SurfaceCapabilities};

fn method_frame_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"at (?P<method>\S.*?) in (?P<path>\S.*?):(?P<line>\d+)")
            .expect("method_frame_regex: pattern is valid and should always compile")
    })
}

fn location_frame_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<indent>\s*)at (?P<path>\S+):(?P<line>\d+):(?P<column>\d+)\s*$")
            .expect("location_frame_regex: pattern is valid and should always compile")
    })
}

/// Rewrites raw stack traces into annotated references.
#[derive(Debug, Clone)]
pub struct StackTraceFormatter {
    capabilities: SurfaceCapabilities,
    project_root: PathBuf,
}

impl StackTraceFormatter {
    /// Formatter stripping `project_root` from frame paths.
    pub fn new(capabilities: SurfaceCapabilities, project_root: impl Into<PathBuf>) -> Self {
        Self {
            capabilities,
            project_root: project_root.into(),
        }
    }

    /// Root stripped from frame paths and used to resolve relative ones.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Reformat every recognised frame in `raw`, line by line.
    pub fn format(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for (i, line) in raw.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_line(line));
        }
        out
    }

    fn format_line(&self, line: &str) -> String {
        if let Some(caps) = location_frame_regex().captures(line) {
            return self
                .annotate_location(&caps)
                .unwrap_or_else(|| line.to_string());
        }
        method_frame_regex()
            .replace_all(line, |caps: &Captures<'_>| {
                self.annotate_method(caps)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn annotate_method(&self, caps: &Captures<'_>) -> Option<String> {
        let reference = self.reference(&caps["path"], &caps["line"], None)?;
        Some(format!("at {} in {reference}", &caps["method"]))
    }

    fn annotate_location(&self, caps: &Captures<'_>) -> Option<String> {
        let reference = self.reference(&caps["path"], &caps["line"], Some(&caps["column"]))?;
        Some(format!("{}at {reference}", &caps["indent"]))
    }

    /// Annotated `path:line[:column]`, or `None` when the file is missing.
    fn reference(&self, raw_path: &str, line: &str, column: Option<&str>) -> Option<String> {
        let resolved = self.resolve(raw_path);
        if !file_exists(&resolved) {
            return None;
        }

        let short = self.shorten(raw_path);
        let line_display = if self.capabilities.supports_color {
            surface::bold(line)
        } else {
            line.to_string()
        };
        let text = match column {
            Some(column) => format!("{short}:{line_display}:{column}"),
            None => format!("{short}:{line_display}"),
        };

        if self.capabilities.supports_clickable_links {
            let uri = surface::file_uri(&resolved, line.parse().ok());
            Some(surface::hyperlink(&text, &uri))
        } else {
            Some(text)
        }
    }

    /// Strip the project root (and the separator after it) from `path`.
    fn shorten<'a>(&self, path: &'a str) -> &'a str {
        let root = self.project_root.to_string_lossy();
        if root.is_empty() {
            return path;
        }
        match path.strip_prefix(root.as_ref()) {
            Some(rest) if rest.starts_with(['/', '\\']) => &rest[1..],
            Some(rest) if root.ends_with(['/', '\\']) => rest,
            _ => path,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Best-effort existence probe; an I/O error counts as missing.
fn file_exists(path: &Path) -> bool {
    match path.try_exists() {
        Ok(exists) => exists && path.is_file(),
        Err(e) => {
            log::debug!("Could not probe {path:?}: {e}");
            false
        }
    }
}
