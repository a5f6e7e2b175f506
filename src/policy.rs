//! Level gating.
//!
//! Two independent thresholds decide whether a record is emitted:
//!
//! - the suppression flag, fixed when the policy is built, which silences
//!   everything except [`Level::Error`]
//! - the runtime verbosity threshold, adjustable while the process runs and
//!   persisted through a [`SettingsStore`]

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::LogError;
use crate::level::Level;
use crate::reentry::ReentrancyGuard;
use crate::settings::SettingsStore;

/// Verbosity used when nothing (or garbage) is persisted.
pub const DEFAULT_VERBOSITY: Level = Level::Warning;

/// Process-wide verbosity threshold backed by a settings store.
///
/// The value is read from the store lazily on first use and kept in memory
/// afterwards. Every [`VerbositySetting::set`] writes through immediately.
pub struct VerbositySetting {
    store: Arc<dyn SettingsStore>,
    key: String,
    level: RwLock<Option<Level>>,
}

impl VerbositySetting {
    /// Setting persisted under `key` in `store`.
    pub fn new(store: Arc<dyn SettingsStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            level: RwLock::new(None),
        }
    }

    /// Current threshold, loading it from the store on first call.
    pub fn get(&self) -> Level {
        if let Some(level) = *self.level.read() {
            return level;
        }

        // Loaded with no lock held: the store and the diagnostics below may
        // log, and a bridged `log` call re-enters `get`.
        let loaded = {
            let _guard = ReentrancyGuard::enter();
            self.load_persisted()
        };
        // A concurrent load or `set` that finished first wins.
        *self.level.write().get_or_insert(loaded)
    }

    /// Change the threshold and persist it.
    ///
    /// The in-memory value is updated even when persisting fails.
    pub fn set(&self, level: Level) -> Result<(), LogError> {
        *self.level.write() = Some(level);
        self.store.store(&self.key, level.display_name())
    }

    /// Key under which the threshold is persisted.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn load_persisted(&self) -> Level {
        match self.store.load(&self.key) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                log::debug!("Ignoring persisted verbosity: {e}");
                DEFAULT_VERBOSITY
            }),
            Ok(None) => DEFAULT_VERBOSITY,
            Err(e) => {
                log::debug!("Could not read persisted verbosity: {e}");
                DEFAULT_VERBOSITY
            }
        }
    }
}

impl std::fmt::Debug for VerbositySetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerbositySetting")
            .field("key", &self.key)
            .field("level", &*self.level.read())
            .finish_non_exhaustive()
    }
}

/// Decides whether a requested level is emitted.
#[derive(Debug)]
pub struct LevelPolicy {
    suppress_non_errors: bool,
    verbosity: Option<VerbositySetting>,
}

impl LevelPolicy {
    /// Policy with the given suppression flag and, when the environment allows
    /// runtime editing, a verbosity threshold.
    pub fn new(suppress_non_errors: bool, verbosity: Option<VerbositySetting>) -> Self {
        Self {
            suppress_non_errors,
            verbosity,
        }
    }

    /// Policy that lets every level through.
    pub fn permissive() -> Self {
        Self::new(false, None)
    }

    /// Whether a record at `requested` should be emitted.
    pub fn should_emit(&self, requested: Level) -> bool {
        if let Some(verbosity) = &self.verbosity
            && requested.rank() > verbosity.get().rank()
        {
            return false;
        }
        if self.suppress_non_errors && requested.rank() > Level::Error.rank() {
            return false;
        }
        true
    }

    /// Whether non-error output is suppressed.
    pub fn suppresses_non_errors(&self) -> bool {
        self.suppress_non_errors
    }

    /// The runtime verbosity setting, if the environment allows editing it.
    pub fn verbosity(&self) -> Option<&VerbositySetting> {
        self.verbosity.as_ref()
    }
}
