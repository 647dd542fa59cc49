//! # Listener Registry
//!
//! Ordered set of weak observer handles shared by the message bus and the
//! module directory.
//!
//! The registry never keeps a listener alive: when the owner drops its last
//! `Arc`, the entry becomes stale and is pruned the next time a snapshot is
//! taken. Callers always iterate a snapshot, never the live list, so a
//! listener may register or unregister from inside its own callback.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::debug;

struct ListenerEntry<L: ?Sized, T> {
    handle: Weak<L>,
    tag: T,
}

/// Registry of weak listener handles, each paired with a tag.
///
/// Message listeners use the unit tag; module-list listeners carry their
/// optional entry-point filter.
pub struct ListenerRegistry<L: ?Sized, T = ()> {
    entries: Mutex<Vec<ListenerEntry<L, T>>>,
}

impl<L: ?Sized, T: Clone> ListenerRegistry<L, T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Append a listener. Registering the same handle twice yields two
    /// entries, each invoked once per fan-out.
    pub fn register(&self, listener: &Arc<L>, tag: T) {
        self.entries.lock().push(ListenerEntry {
            handle: Arc::downgrade(listener),
            tag,
        });
    }

    /// Remove every entry pointing at `listener`.
    ///
    /// Returns `true` if at least one entry was removed.
    pub fn unregister(&self, listener: &Arc<L>) -> bool {
        let target = Arc::as_ptr(listener);
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| !std::ptr::addr_eq(entry.handle.as_ptr(), target));
        entries.len() != before
    }

    /// Upgrade every live entry, pruning stale ones, and return them in
    /// registration order.
    pub fn snapshot(&self) -> Vec<(Arc<L>, T)> {
        let mut entries = self.entries.lock();
        let mut live = Vec::with_capacity(entries.len());
        let before = entries.len();
        entries.retain(|entry| match entry.handle.upgrade() {
            Some(listener) => {
                live.push((listener, entry.tag.clone()));
                true
            }
            None => false,
        });
        let pruned = before - entries.len();
        if pruned > 0 {
            debug!(pruned, "Listener is gone, removed from registry");
        }
        live
    }

    /// Number of registered entries, including any not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<L: ?Sized, T: Clone> Default for ListenerRegistry<L, T> {
    fn default() -> Self {
        Self::new()
    }
}
