//! Typed error variants for vsdk-log.
//!
//! Errors only surface from configuration and settings operations. Nothing on
//! the logging path returns them: a failed settings read falls back to the
//! default verbosity and a failed hook is isolated.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading configuration or persisting settings.
#[derive(Debug, Error)]
pub enum LogError {
    /// The settings file could not be read or written.
    #[error("Settings I/O error at '{}': {source}", path.display())]
    SettingsIo {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file contained invalid YAML, or the settings could not be
    /// serialized.
    #[error("Settings YAML error at '{}': {source}", path.display())]
    SettingsParse {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The logger configuration file could not be read.
    #[error("Config I/O error at '{}': {source}", path.display())]
    ConfigIo {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The logger configuration file contained invalid YAML.
    #[error("Config YAML error at '{}': {source}", path.display())]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// [`crate::init`] was called after the global logger was already set.
    #[error("Global logger is already initialized")]
    AlreadyInitialized,

    /// Another `log` implementation is already installed.
    #[error("Could not install log bridge: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}
