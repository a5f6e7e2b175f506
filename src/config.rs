//! Logger configuration.
//!
//! Resolution order, lowest to highest precedence:
//! 1. [`LoggerConfig::default`]
//! 2. a YAML file loaded with [`LoggerConfig::load`]
//! 3. environment variables applied by [`LoggerConfig::apply_env`]
//!
//! The `errors-only` cargo feature forces `suppress_non_errors` on regardless
//! of the layers above.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::record::DEFAULT_PREFIX;
use crate::settings::{VERBOSITY_KEY, YamlSettingsStore};
use crate::surface::{SurfaceCapabilities, env_flag};

/// Environment variable forcing errors-only output.
pub const ENV_ERRORS_ONLY: &str = "VSDK_LOG_ERRORS_ONLY";
/// Environment variable enabling or disabling the runtime verbosity threshold.
pub const ENV_RUNTIME_VERBOSITY: &str = "VSDK_LOG_RUNTIME_VERBOSITY";
/// Environment variable overriding the category prefix.
pub const ENV_PREFIX: &str = "VSDK_LOG_PREFIX";

/// Configuration for a [`Logger`](crate::Logger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Product identifier shown in every category tag.
    pub prefix: String,
    /// Silence everything except errors.
    pub suppress_non_errors: bool,
    /// Apply the persisted, runtime-adjustable verbosity threshold.
    pub runtime_verbosity: bool,
    /// Key under which the verbosity threshold is persisted.
    pub settings_key: String,
    /// Settings file; `None` uses [`YamlSettingsStore::default_path`].
    pub settings_path: Option<PathBuf>,
    /// Root stripped from stack-trace paths and used to resolve relative
    /// source paths; `None` uses the current directory.
    pub project_root: Option<PathBuf>,
    /// Output surface capabilities; `None` detects them from stdout.
    pub capabilities: Option<SurfaceCapabilities>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            suppress_non_errors: false,
            runtime_verbosity: true,
            settings_key: VERBOSITY_KEY.to_string(),
            settings_path: None,
            project_root: None,
            capabilities: None,
        }
    }
}

impl LoggerConfig {
    /// Defaults overlaid with the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load from a YAML file, then overlay the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref();
        log::info!("Loading logger config from {:?}", path);

        let contents = fs::read_to_string(path).map_err(|source| LogError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(&contents).map_err(|source| LogError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay environment variables onto this config.
    pub fn apply_env(&mut self) {
        if let Some(errors_only) = env_flag(ENV_ERRORS_ONLY) {
            self.suppress_non_errors = errors_only;
        }
        if let Some(runtime) = env_flag(ENV_RUNTIME_VERBOSITY) {
            self.runtime_verbosity = runtime;
        }
        if let Ok(prefix) = std::env::var(ENV_PREFIX)
            && !prefix.trim().is_empty()
        {
            self.prefix = prefix.trim().to_string();
        }
    }

    /// Whether non-error output is suppressed, including the build-time
    /// `errors-only` feature.
    pub fn effective_suppression(&self) -> bool {
        cfg!(feature = "errors-only") || self.suppress_non_errors
    }

    /// Capabilities to decorate for, detecting them when unset.
    pub fn effective_capabilities(&self) -> SurfaceCapabilities {
        self.capabilities.unwrap_or_else(SurfaceCapabilities::detect)
    }

    /// Project root, falling back to the current directory.
    pub fn effective_project_root(&self) -> PathBuf {
        self.project_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default()
    }

    /// Settings file path, falling back to the platform default.
    pub fn effective_settings_path(&self) -> PathBuf {
        self.settings_path
            .clone()
            .unwrap_or_else(YamlSettingsStore::default_path)
    }
}
