//! Bounded message history.
//!
//! One `History` backs the outbound queue and another the inbound log. Each
//! is owned by its own lock in the service; nothing here synchronizes.

use shared_types::{Message, MessageId};
use std::collections::VecDeque;
use std::sync::Arc;

/// Default maximum number of messages kept in the inbound history.
pub const DEFAULT_MAX_INBOUND_SIZE: usize = 1000;

/// Which messages a clear operation removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFilter {
    /// Only messages handed to at least one listener.
    Delivered,
    /// Only messages no listener has seen yet.
    Undelivered,
    /// Everything.
    All,
}

impl DeliveryFilter {
    fn matches(self, message: &Message) -> bool {
        match self {
            Self::Delivered => message.is_delivered(),
            Self::Undelivered => !message.is_delivered(),
            Self::All => true,
        }
    }
}

/// Which history a clear operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryScope {
    /// Outbound queue.
    Sent,
    /// Inbound log.
    Received,
    /// Both lists.
    Both,
}

/// What the eviction policy did while making room for an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// History was below the limit.
    None,
    /// Delivered messages were purged and that was enough.
    PurgedDelivered {
        /// Messages removed.
        removed: usize,
    },
    /// Purging delivered messages was not enough; the history was emptied.
    Cleared {
        /// Delivered messages removed by the first pass.
        purged: usize,
        /// Remaining messages dropped by the full clear.
        dropped: usize,
    },
}

/// Ordered message list plus its lifetime counter.
///
/// The counter lives next to the list so that it is always updated under the
/// same lock as the list it counts.
#[derive(Debug, Default)]
pub struct History {
    messages: VecDeque<Arc<Message>>,
    total: u64,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and count it. No size limit applies.
    pub fn record(&mut self, message: Arc<Message>) {
        self.messages.push_back(message);
        self.total += 1;
    }

    /// Append a message and count it, evicting first if the history is at or
    /// over `limit`.
    ///
    /// Delivered messages go first; if the history is still at or over the
    /// limit afterwards, it is cleared entirely.
    pub fn record_bounded(&mut self, message: Arc<Message>, limit: usize) -> Eviction {
        let eviction = self.make_room(limit);
        self.record(message);
        eviction
    }

    fn make_room(&mut self, limit: usize) -> Eviction {
        if self.messages.len() < limit {
            return Eviction::None;
        }
        let purged = self.clear(DeliveryFilter::Delivered);
        if self.messages.len() < limit {
            return Eviction::PurgedDelivered { removed: purged };
        }
        let dropped = self.clear(DeliveryFilter::All);
        Eviction::Cleared { purged, dropped }
    }

    /// Take the oldest message off the front.
    pub fn pop_front(&mut self) -> Option<Arc<Message>> {
        self.messages.pop_front()
    }

    /// Put a message back at the front after a failed hand-off. Not counted
    /// again.
    pub fn requeue_front(&mut self, message: Arc<Message>) {
        self.messages.push_front(message);
    }

    /// First message with the given id, in insertion order.
    #[must_use]
    pub fn find(&self, id: MessageId) -> Option<Arc<Message>> {
        self.messages.iter().find(|m| m.id() == id).cloned()
    }

    /// Clone the current contents in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<Message>> {
        self.messages.iter().cloned().collect()
    }

    /// Remove every message matching `filter`, returning how many went.
    pub fn clear(&mut self, filter: DeliveryFilter) -> usize {
        let before = self.messages.len();
        if filter == DeliveryFilter::All {
            self.messages.clear();
        } else {
            self.messages.retain(|m| !filter.matches(m));
        }
        before - self.messages.len()
    }

    /// Number of messages currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages counted since creation or the last reset.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Reset the lifetime counter. Contents are untouched.
    pub fn reset_total(&mut self) {
        self.total = 0;
    }
}
