//! Output-surface capabilities and text decorations.
//!
//! The host decides once at start-up what the output surface can render.
//! Decorations degrade to plain text when a capability is missing:
//! - color: ANSI SGR sequences
//! - clickable links: OSC 8 hyperlinks
//! - timestamps: some hosts prefix every line themselves

use std::io::IsTerminal;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Terminal programs known to render OSC 8 hyperlinks.
const HYPERLINK_TERMINALS: &[&str] = &[
    "iTerm.app",
    "WezTerm",
    "vscode",
    "par-term",
    "ghostty",
    "kitty",
    "Hyper",
];

/// What the output surface can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SurfaceCapabilities {
    /// Surface renders ANSI colors and bold text.
    pub supports_color: bool,
    /// Surface already prefixes every line with a timestamp.
    pub supports_timestamp_prefix: bool,
    /// Surface renders OSC 8 hyperlinks.
    pub supports_clickable_links: bool,
}

impl SurfaceCapabilities {
    /// Plain text with no decorations; the record carries its own timestamp.
    pub const fn plain() -> Self {
        Self {
            supports_color: false,
            supports_timestamp_prefix: false,
            supports_clickable_links: false,
        }
    }

    /// Colors and hyperlinks; the record carries its own timestamp.
    pub const fn rich() -> Self {
        Self {
            supports_color: true,
            supports_timestamp_prefix: false,
            supports_clickable_links: true,
        }
    }

    /// Detect capabilities of the process's stdout.
    ///
    /// - color: stdout is a terminal and `NO_COLOR` is unset
    /// - timestamp prefix: `VSDK_LOG_HOST_TIMESTAMPS` is truthy
    /// - clickable links: `VSDK_LOG_HYPERLINKS` is truthy, or color is on and
    ///   `TERM_PROGRAM` names a terminal known to render OSC 8
    pub fn detect() -> Self {
        let supports_color =
            std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

        let supports_timestamp_prefix = env_flag("VSDK_LOG_HOST_TIMESTAMPS").unwrap_or(false);

        let supports_clickable_links = env_flag("VSDK_LOG_HYPERLINKS").unwrap_or_else(|| {
            supports_color
                && std::env::var("TERM_PROGRAM")
                    .map(|p| HYPERLINK_TERMINALS.contains(&p.as_str()))
                    .unwrap_or(false)
        });

        Self {
            supports_color,
            supports_timestamp_prefix,
            supports_clickable_links,
        }
    }
}

/// Parse a boolean environment flag (`1`/`true`/`yes`/`on` and their
/// negations). Unset or unrecognised values yield `None`.
pub(crate) fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Foreground colors used for level tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Green,
}

impl Color {
    fn sgr(self) -> &'static str {
        match self {
            Color::Red => "31",
            Color::Yellow => "33",
            Color::Green => "32",
        }
    }
}

/// Wrap `text` in an ANSI foreground color.
pub fn paint(text: &str, color: Color) -> String {
    format!("\x1b[{}m{text}\x1b[0m", color.sgr())
}

/// Wrap `text` in ANSI bold.
pub fn bold(text: &str) -> String {
    format!("\x1b[1m{text}\x1b[22m")
}

/// Wrap `text` in an OSC 8 hyperlink to `uri`.
pub fn hyperlink(text: &str, uri: &str) -> String {
    format!("\x1b]8;;{uri}\x1b\\{text}\x1b]8;;\x1b\\")
}

/// `file://` URI for a source location. The line is carried in the fragment.
pub fn file_uri(path: &Path, line: Option<u32>) -> String {
    let mut uri = format!("file://{}", path.display());
    if let Some(line) = line {
        uri.push_str(&format!("#{line}"));
    }
    uri
}
