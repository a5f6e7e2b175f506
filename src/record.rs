//! Record assembly.
//!
//! A record is composed of, in order:
//! 1. `[HH:MM:SS.mmm] ` unless the surface prefixes timestamps itself
//! 2. `[LEVEL]`, colored by severity when the surface supports color
//! 3. `[<prefix> <category>]`, linked to the caller's source when supported
//! 4. the message body

use std::fmt::{self, Write as _};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::category::CallSite;
use crate::level::Level;
use crate::surface::{self, Color, SurfaceCapabilities};

/// Product identifier used in the category tag.
pub const DEFAULT_PREFIX: &str = "VSDK";

/// In-progress text of a single log call.
///
/// Built once per call and handed to pre-log hooks before dispatch. Hooks
/// may append to or rewrite the text through [`LogRecord::text_mut`] or the
/// [`fmt::Write`] impl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    level: Level,
    category: String,
    text: String,
}

impl LogRecord {
    /// Empty record for `level` and the resolved `category`.
    pub fn new(level: Level, category: impl Into<String>) -> Self {
        Self {
            level,
            category: category.into(),
            text: String::new(),
        }
    }

    /// Level of the call that produced this record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Resolved category (explicit or inferred).
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Current text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Mutable access to the text.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Append a string.
    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consume the record, returning the final text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Write for LogRecord {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Composes the base text of a record for one output surface.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    prefix: String,
    capabilities: SurfaceCapabilities,
    project_root: PathBuf,
}

impl RecordBuilder {
    /// Builder for a surface with `capabilities`. Relative caller paths are
    /// resolved against `project_root` for source links.
    pub fn new(
        prefix: impl Into<String>,
        capabilities: SurfaceCapabilities,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            capabilities,
            project_root: project_root.into(),
        }
    }

    /// Product prefix shown in the category tag.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Capabilities this builder decorates for.
    pub fn capabilities(&self) -> SurfaceCapabilities {
        self.capabilities
    }

    /// Build the base record: timestamp, level tag, category tag and message.
    pub fn build(
        &self,
        level: Level,
        category: &str,
        message: Option<&dyn fmt::Display>,
        call_site: &CallSite<'_>,
    ) -> LogRecord {
        let mut record = LogRecord::new(level, category);

        if !self.capabilities.supports_timestamp_prefix {
            let now = chrono::Local::now();
            record.push_str(&format!("[{}] ", now.format("%H:%M:%S%.3f")));
        }

        record.push_str(&self.level_tag(level));
        record.push_str(&self.category_tag(category, call_site));
        record.push_str(" ");

        if let Some(message) = message {
            record.push_str(&stringify(message));
        }

        record
    }

    fn level_tag(&self, level: Level) -> String {
        let tag = format!("[{}]", level.name());
        if !self.capabilities.supports_color {
            return tag;
        }
        let color = match level {
            Level::Error => Color::Red,
            Level::Warning => Color::Yellow,
            Level::Log | Level::Info => Color::Green,
        };
        surface::paint(&tag, color)
    }

    fn category_tag(&self, category: &str, call_site: &CallSite<'_>) -> String {
        let tag = if category.is_empty() {
            format!(" [{}]", self.prefix)
        } else {
            format!(" [{} {}]", self.prefix, category)
        };
        if !self.capabilities.supports_clickable_links {
            return tag;
        }
        match call_site.file {
            Some(file) => {
                let path = self.resolve(Path::new(file));
                let uri = surface::file_uri(&path, call_site.line);
                format!(" {}", surface::hyperlink(tag.trim_start(), &uri))
            }
            None => tag,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Render a message without letting a faulty `Display` impl escape.
///
/// A `Display` error keeps whatever was written before it; a panic yields
/// an empty body.
fn stringify(message: &dyn fmt::Display) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let mut out = String::new();
        let _ = write!(out, "{message}");
        out
    }))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fmt::Write as _;

    fn plain() -> RecordBuilder {
        RecordBuilder::new(DEFAULT_PREFIX, SurfaceCapabilities::plain(), "/work")
    }

    fn host_stamped() -> RecordBuilder {
        RecordBuilder::new(
            DEFAULT_PREFIX,
            SurfaceCapabilities {
                supports_timestamp_prefix: true,
                ..SurfaceCapabilities::plain()
            },
            "/work",
        )
    }

    #[test]
    fn test_plain_record_layout() {
        let record = host_stamped().build(
            Level::Warning,
            "Net",
            Some(&"connection lost"),
            &CallSite::unknown(),
        );
        assert_eq!(record.as_str(), "[WARNING] [VSDK Net] connection lost");
        assert_eq!(record.level(), Level::Warning);
        assert_eq!(record.category(), "Net");
    }

    #[test]
    fn test_empty_category_omits_token() {
        let record = host_stamped().build(Level::Log, "", Some(&"hi"), &CallSite::unknown());
        assert_eq!(record.as_str(), "[LOG] [VSDK] hi");
    }

    #[test]
    fn test_timestamp_prefix_when_surface_lacks_one() {
        let record = plain().build(Level::Info, "A", Some(&"x"), &CallSite::unknown());
        let text = record.as_str();
        assert!(text.starts_with('['));
        // "[HH:MM:SS.mmm] " is 15 bytes.
        assert_eq!(&text[13..15], "] ");
        assert!(text[15..].starts_with("[INFO] [VSDK A] x"));
    }

    #[test]
    fn test_absent_message_is_empty_body() {
        let record = host_stamped().build(Level::Error, "A", None, &CallSite::unknown());
        assert_eq!(record.as_str(), "[ERROR] [VSDK A] ");
    }

    #[test]
    fn test_every_level_tag_is_present() {
        for level in Level::all() {
            let record = plain().build(*level, "Cat", Some(&"m"), &CallSite::unknown());
            assert!(record.as_str().contains(&format!("[{}]", level.name())));
            assert!(record.as_str().contains("VSDK"));
        }
    }

    #[test]
    fn test_color_decoration() {
        let builder = RecordBuilder::new(
            DEFAULT_PREFIX,
            SurfaceCapabilities {
                supports_color: true,
                supports_timestamp_prefix: true,
                supports_clickable_links: false,
            },
            "/work",
        );
        let error = builder.build(Level::Error, "A", Some(&"m"), &CallSite::unknown());
        assert!(error.as_str().starts_with("\x1b[31m[ERROR]\x1b[0m"));
        let warning = builder.build(Level::Warning, "A", Some(&"m"), &CallSite::unknown());
        assert!(warning.as_str().starts_with("\x1b[33m[WARNING]\x1b[0m"));
        let info = builder.build(Level::Info, "A", Some(&"m"), &CallSite::unknown());
        assert!(info.as_str().starts_with("\x1b[32m[INFO]\x1b[0m"));
    }

    #[test]
    fn test_category_link_uses_call_site() {
        let builder = RecordBuilder::new(
            DEFAULT_PREFIX,
            SurfaceCapabilities {
                supports_timestamp_prefix: true,
                ..SurfaceCapabilities::rich()
            },
            "/work",
        );
        let site = CallSite::here("app::net", "src/net.rs", 12);
        let record = builder.build(Level::Log, "net", Some(&"m"), &site);
        assert!(record.as_str().contains("\x1b]8;;file:///work/src/net.rs#12\x1b\\[VSDK net]"));
    }

    #[test]
    fn test_category_link_omitted_without_location() {
        let builder = RecordBuilder::new(
            DEFAULT_PREFIX,
            SurfaceCapabilities {
                supports_timestamp_prefix: true,
                supports_clickable_links: true,
                supports_color: false,
            },
            "/work",
        );
        let record = builder.build(Level::Log, "net", Some(&"m"), &CallSite::unknown());
        assert_eq!(record.as_str(), "[LOG] [VSDK net] m");
    }

    struct FailingDisplay;

    impl fmt::Display for FailingDisplay {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("partial")?;
            Err(fmt::Error)
        }
    }

    struct PanickingDisplay;

    impl fmt::Display for PanickingDisplay {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("display exploded");
        }
    }

    #[test]
    fn test_failing_display_keeps_partial_text() {
        let record = host_stamped().build(
            Level::Log,
            "A",
            Some(&FailingDisplay),
            &CallSite::unknown(),
        );
        assert_eq!(record.as_str(), "[LOG] [VSDK A] partial");
    }

    #[test]
    fn test_panicking_display_yields_empty_body() {
        let record = host_stamped().build(
            Level::Log,
            "A",
            Some(&PanickingDisplay),
            &CallSite::unknown(),
        );
        assert_eq!(record.as_str(), "[LOG] [VSDK A] ");
    }

    #[test]
    fn test_record_is_fmt_write() {
        let mut record = LogRecord::new(Level::Log, "A");
        write!(record, "{}-{}", 1, 2).unwrap();
        assert_eq!(record.to_string(), "1-2");
        assert_eq!(record.len(), 3);
        assert!(!record.is_empty());
        assert_eq!(record.into_string(), "1-2");
    }
}
