//! Module-list subscribers and roster fan-out.

use crate::domain::{Roster, RosterCell};
use crate::ports::ModuleListener;
use shared_types::ListenerRegistry;
use std::sync::Arc;
use tracing::debug;

/// Subscribers paired with an optional entry-point filter.
pub struct ModuleListenerRegistry {
    listeners: ListenerRegistry<dyn ModuleListener, Option<String>>,
    roster: Arc<RosterCell>,
}

impl ModuleListenerRegistry {
    pub fn new(roster: Arc<RosterCell>) -> Self {
        Self {
            listeners: ListenerRegistry::new(),
            roster,
        }
    }

    /// Register a listener. If a roster is already available it is
    /// delivered right away; otherwise delivery waits for the next
    /// reconciliation.
    pub fn subscribe(&self, listener: &Arc<dyn ModuleListener>, entry_point: Option<&str>) {
        let filter = entry_point.map(str::to_string);
        self.listeners.register(listener, filter.clone());

        let roster = self.roster.snapshot();
        if roster.is_empty() {
            debug!(?filter, "Module listener registered, roster not available yet");
            return;
        }
        deliver(listener.as_ref(), filter.as_deref(), &roster);
    }

    /// Remove every registration of `listener`.
    pub fn unsubscribe(&self, listener: &Arc<dyn ModuleListener>) -> bool {
        self.listeners.unregister(listener)
    }

    /// Deliver the current roster to every live listener. Returns how many
    /// were reached; zero when the roster is empty.
    pub fn notify_all(&self) -> usize {
        let live = self.listeners.snapshot();
        let roster = self.roster.snapshot();
        if roster.is_empty() {
            debug!(listeners = live.len(), "Roster empty, delivery skipped");
            return 0;
        }
        for (listener, filter) in &live {
            deliver(listener.as_ref(), filter.as_deref(), &roster);
        }
        debug!(listeners = live.len(), modules = roster.len(), "Roster delivered");
        live.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

fn deliver(listener: &dyn ModuleListener, filter: Option<&str>, roster: &Roster) {
    match filter {
        None => listener.on_modules(roster.modules()),
        Some(_) => listener.on_modules(&roster.filtered(filter)),
    }
}
