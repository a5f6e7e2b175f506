//! Persisted key/value settings.
//!
//! The logger only needs one persisted value (the verbosity threshold), but
//! the store is a plain string map so hosts can share a single file between
//! components.
//!
//! - [`MemorySettings`]: in-process map, used by tests and embedders that
//!   persist elsewhere
//! - [`YamlSettingsStore`]: YAML file with atomic writes

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::LogError;

/// Key under which the verbosity threshold is persisted.
pub const VERBOSITY_KEY: &str = "VSDK_LOG_LEVEL";

/// External store for settings that must survive restarts.
pub trait SettingsStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, LogError>;

    /// Store `value` under `key`, persisting it immediately.
    fn store(&self, key: &str, value: &str) -> Result<(), LogError>;
}

/// Settings held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettings {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.values.lock().insert(key.into(), value.into());
        store
    }

    /// Current value under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self, key: &str) -> Result<Option<String>, LogError> {
        Ok(self.get(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), LogError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings persisted as a flat YAML map.
///
/// Every `store` rewrites the whole file through a temp file and rename so a
/// crash never leaves a truncated file behind.
#[derive(Debug)]
pub struct YamlSettingsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl YamlSettingsStore {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at [`YamlSettingsStore::default_path`].
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Default settings file (`~/.config/vsdk/log-settings.yaml`, or the
    /// platform config dir on Windows).
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("vsdk").join("log-settings.yaml")
            } else {
                PathBuf::from("log-settings.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("vsdk")
                    .join("log-settings.yaml")
            } else {
                PathBuf::from("log-settings.yaml")
            }
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, LogError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| LogError::SettingsIo {
            path: self.path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_yaml_ng::from_str(&contents).map_err(|source| LogError::SettingsParse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), LogError> {
        let io_err = |source| LogError::SettingsIo {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let yaml = serde_yaml_ng::to_string(values).map_err(|source| LogError::SettingsParse {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(io_err)?;
        fs::rename(&temp_path, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl SettingsStore for YamlSettingsStore {
    fn load(&self, key: &str) -> Result<Option<String>, LogError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), LogError> {
        let _guard = self.lock.lock();
        // An unreadable file is replaced rather than blocking the write.
        let mut values = self.read_all().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable settings file: {e}");
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;
        log::debug!("Saved setting {key}={value} to {:?}", self.path);
        Ok(())
    }
}
