//! Per-thread re-entrancy flag shared by every logging entry point.
//!
//! While a thread runs the pipeline (or loads the persisted verbosity),
//! records it emits, directly or through the `log` facade, are dropped
//! instead of recursing into the logger.

use std::cell::Cell;

thread_local! {
    static ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Clears the flag when dropped, including on unwind.
pub(crate) struct ReentrancyGuard;

impl ReentrancyGuard {
    /// Set the flag for this thread, or `None` if it is already set.
    pub(crate) fn enter() -> Option<Self> {
        ACTIVE.with(|flag| {
            if flag.replace(true) {
                None
            } else {
                Some(ReentrancyGuard)
            }
        })
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        ACTIVE.with(|flag| flag.set(false));
    }
}

/// Whether this thread is already inside the logger.
pub(crate) fn is_active() -> bool {
    ACTIVE.with(Cell::get)
}
