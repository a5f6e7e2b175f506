//! Pre-log hooks.
//!
//! [`HookRegistry`] is an explicit observer list. Subscribers run
//! synchronously, in registration order, with the in-progress
//! [`LogRecord`] before the exception block is appended and the record is
//! dispatched.
//!
//! A panicking subscriber is isolated: the panic is caught and reported
//! through `log::warn!`, and the remaining subscribers and the dispatch still
//! run. Logging can never be made to fail by a faulty hook.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::level::Level;
use crate::record::LogRecord;

/// Unique identifier handed out by [`HookRegistry::register`].
pub type HookId = u64;

/// Callback invoked with the record, the category passed by the caller
/// (empty when it was inferred) and the level.
pub type PreLogHook = dyn Fn(&mut LogRecord, &str, Level) + Send + Sync;

/// Ordered list of pre-log subscribers.
pub struct HookRegistry {
    /// Next ID to assign. Guarded together with the list so IDs match order.
    hooks: RwLock<(HookId, Vec<(HookId, Arc<PreLogHook>)>)>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new((1, Vec::new())),
        }
    }

    /// Register `hook` after all existing ones.
    pub fn register<F>(&self, hook: F) -> HookId
    where
        F: Fn(&mut LogRecord, &str, Level) + Send + Sync + 'static,
    {
        let hook: Arc<PreLogHook> = Arc::new(hook);
        let mut guard = self.hooks.write();
        let (next_id, list) = &mut *guard;
        let id = *next_id;
        *next_id += 1;
        list.push((id, hook));
        id
    }

    /// Remove the hook with `id`. Returns `false` if it was not registered.
    pub fn unregister(&self, id: HookId) -> bool {
        let mut guard = self.hooks.write();
        let list = &mut guard.1;
        let before = list.len();
        list.retain(|(hook_id, _)| *hook_id != id);
        list.len() != before
    }

    /// Remove every hook.
    pub fn clear(&self) {
        self.hooks.write().1.clear();
    }

    /// Number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.read().1.len()
    }

    /// Whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every hook once, in registration order.
    ///
    /// The list is snapshotted first, so a hook may register or unregister
    /// hooks without deadlocking; such changes apply from the next call.
    pub fn invoke(&self, record: &mut LogRecord, original_category: &str, level: Level) {
        let snapshot: Vec<(HookId, Arc<PreLogHook>)> = self.hooks.read().1.clone();
        for (id, hook) in snapshot {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                hook(record, original_category, level)
            }));
            if result.is_err() {
                log::warn!("Pre-log hook {id} panicked; continuing with remaining hooks");
            }
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<HookId> = self.hooks.read().1.iter().map(|(id, _)| *id).collect();
        f.debug_struct("HookRegistry").field("ids", &ids).finish()
    }
}
