//! History accessors, counters, limits and clear operations.

use crate::domain::{BusError, DeliveryFilter, HistoryScope};
use crate::service::MessageBus;
use shared_types::{Message, MessageId};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::debug;

impl MessageBus {
    /// First received message with the given id, in receive order.
    #[must_use]
    pub fn message_by_id(&self, id: MessageId) -> Option<Arc<Message>> {
        self.inbound.lock().find(id)
    }

    /// Messages accepted for sending since creation or the last reset.
    #[must_use]
    pub fn total_sent(&self) -> u64 {
        self.outbound.lock().total()
    }

    /// Messages accepted from the transport since creation or the last reset.
    #[must_use]
    pub fn total_received(&self) -> u64 {
        self.inbound.lock().total()
    }

    pub fn reset_total_sent(&self) {
        self.outbound.lock().reset_total();
    }

    pub fn reset_total_received(&self) {
        self.inbound.lock().reset_total();
    }

    /// Messages still waiting for the transport.
    #[must_use]
    pub fn stored_sent(&self) -> usize {
        self.outbound.lock().len()
    }

    /// Messages currently in the inbound history.
    #[must_use]
    pub fn stored_received(&self) -> usize {
        self.inbound.lock().len()
    }

    /// Copy of the outbound queue, oldest first.
    #[must_use]
    pub fn sent_messages(&self) -> Vec<Arc<Message>> {
        self.outbound.lock().snapshot()
    }

    /// Copy of the inbound history, oldest first.
    #[must_use]
    pub fn received_messages(&self) -> Vec<Arc<Message>> {
        self.inbound.lock().snapshot()
    }

    #[must_use]
    pub fn max_inbound_size(&self) -> usize {
        self.max_inbound_size.load(Ordering::Acquire)
    }

    /// Change the inbound history limit. Takes effect on the next insert;
    /// the current history is not trimmed.
    ///
    /// # Errors
    ///
    /// [`BusError::InvalidLimit`] for zero. The previous limit is kept.
    pub fn set_max_inbound_size(&self, limit: usize) -> Result<(), BusError> {
        if limit == 0 {
            return Err(BusError::InvalidLimit);
        }
        self.max_inbound_size.store(limit, Ordering::Release);
        Ok(())
    }

    /// Remove messages matching `filter` from the histories in `scope`.
    /// Counters are not touched. Returns the number removed.
    pub fn clear(&self, scope: HistoryScope, filter: DeliveryFilter) -> usize {
        let sent = match scope {
            HistoryScope::Sent | HistoryScope::Both => self.outbound.lock().clear(filter),
            HistoryScope::Received => 0,
        };
        let received = match scope {
            HistoryScope::Received | HistoryScope::Both => self.inbound.lock().clear(filter),
            HistoryScope::Sent => 0,
        };
        debug!(?scope, ?filter, sent, received, "History cleared");
        sent + received
    }
}
