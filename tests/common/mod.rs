//! Shared integration test helpers for vsdk-log.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::TestContext;
//! ```
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attribute
//! suppresses warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use vsdk_log::{
    CaptureSink, Channel, Logger, LoggerConfig, MemorySettings, SurfaceCapabilities, VERBOSITY_KEY,
};

/// Plain surface whose host prefixes timestamps, so records are
/// deterministic.
pub fn stamped_plain() -> SurfaceCapabilities {
    SurfaceCapabilities {
        supports_timestamp_prefix: true,
        ..SurfaceCapabilities::plain()
    }
}

/// Config with deterministic capabilities rooted at `root`.
pub fn config_at(root: &Path) -> LoggerConfig {
    LoggerConfig {
        capabilities: Some(stamped_plain()),
        project_root: Some(root.to_path_buf()),
        ..LoggerConfig::default()
    }
}

/// Provides test isolation with automatic resource cleanup.
///
/// Wraps a `TempDir` used as the project root, a capturing sink, an
/// in-memory settings store, and a logger wired to all three.
pub struct TestContext {
    /// Temporary project root, kept alive for the lifetime of the context.
    pub dir: TempDir,
    /// Every dispatched record.
    pub sink: Arc<CaptureSink>,
    /// Persisted settings.
    pub settings: Arc<MemorySettings>,
    /// Logger under test.
    pub logger: Logger,
}

impl TestContext {
    /// Context whose persisted verbosity is `level`.
    pub fn with_verbosity(level: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self::build(config_at(dir.path()), dir, level)
    }

    /// Context with a customised config. Capabilities and project root
    /// default to the context's deterministic values when unset.
    pub fn with_config(mut config: LoggerConfig, level: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        config.capabilities.get_or_insert_with(stamped_plain);
        config
            .project_root
            .get_or_insert_with(|| dir.path().to_path_buf());
        Self::build(config, dir, level)
    }

    fn build(config: LoggerConfig, dir: TempDir, level: &str) -> Self {
        let sink = Arc::new(CaptureSink::new());
        let settings = Arc::new(MemorySettings::with_value(VERBOSITY_KEY, level));
        let logger = Logger::new(&config, sink.clone(), settings.clone());
        Self {
            dir,
            sink,
            settings,
            logger,
        }
    }

    /// Return the path to the temporary project root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create an empty file under the project root and return its path.
    pub fn touch(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, "").expect("Failed to write stub file");
        path
    }

    /// Dispatched records.
    pub fn records(&self) -> Vec<(Channel, String)> {
        self.sink.records()
    }
}
