//! Receiving side: filtering, bounded storage, fan-out and listener
//! management.

use crate::domain::{BusError, Eviction};
use crate::ports::{Arrival, MessageListener, MessageSink};
use crate::service::MessageBus;
use shared_types::Message;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, warn};

impl MessageSink for MessageBus {
    fn on_message_arrived(&self, message: Message) -> Result<Arrival, BusError> {
        self.ensure_authorized()?;

        if !message.receiver().accepts(&self.identity) {
            debug!(
                message_id = message.id(),
                sender = message.sender(),
                receiver = %message.receiver(),
                "Message addressed elsewhere, dropped"
            );
            return Ok(Arrival::Dropped);
        }

        let message = Arc::new(message);
        let limit = self.max_inbound_size.load(Ordering::Acquire);
        let eviction = self.inbound.lock().record_bounded(Arc::clone(&message), limit);
        match eviction {
            Eviction::None => {}
            Eviction::PurgedDelivered { removed } => {
                debug!(count = removed, limit, "Purged delivered messages from inbound history");
            }
            Eviction::Cleared { purged, dropped } => {
                warn!(
                    purged,
                    dropped, limit, "Inbound history full of undelivered messages, cleared"
                );
            }
        }

        let delivered = self.fan_out(&message);
        debug!(
            message_id = message.id(),
            sender = message.sender(),
            delivered,
            "Message received"
        );
        Ok(Arrival::Accepted { delivered })
    }
}

impl MessageBus {
    /// Hand a message to every live listener. Marks it delivered if at least
    /// one was reached.
    fn fan_out(&self, message: &Message) -> usize {
        let listeners = self.listeners.snapshot();
        for (listener, ()) in &listeners {
            listener.on_message(message);
        }
        if !listeners.is_empty() {
            message.mark_delivered();
        }
        listeners.len()
    }

    /// Subscribe to inbound messages.
    ///
    /// Every message currently in the inbound history is then replayed
    /// through the regular fan-out, oldest first: each live listener,
    /// including ones registered earlier, sees the backlog again, and the
    /// replayed messages are marked delivered.
    ///
    /// The bus keeps only a weak handle. Returns the number of replayed
    /// messages.
    pub fn register_listener(&self, listener: &Arc<dyn MessageListener>) -> usize {
        self.listeners.register(listener, ());
        let backlog = self.inbound.lock().snapshot();
        for message in &backlog {
            self.fan_out(message);
        }
        debug!(replayed = backlog.len(), "Message listener registered");
        backlog.len()
    }

    /// Remove every registration of `listener`. Returns `false` if it was not
    /// registered.
    pub fn unregister_listener(&self, listener: &Arc<dyn MessageListener>) -> bool {
        let removed = self.listeners.unregister(listener);
        if removed {
            debug!("Message listener unregistered");
        }
        removed
    }

    /// Number of registered listeners, including dropped ones not yet pruned.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
