//! # Driving Ports (Inbound API)
//!
//! The entry point a transport uses to hand a received message to the bus.

use crate::domain::BusError;
use shared_types::Message;

/// What happened to a message handed to [`MessageSink::on_message_arrived`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Addressed to another package. Not stored, not counted, not fanned out.
    Dropped,
    /// Stored in the inbound history and fanned out.
    Accepted {
        /// Live listeners the message was handed to.
        delivered: usize,
    },
}

impl Arrival {
    /// Whether the message was stored.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Receiving side of the bus.
///
/// Transports call this once per message that reached the local process.
pub trait MessageSink: Send + Sync {
    /// Accept a message from the transport.
    ///
    /// # Errors
    ///
    /// [`BusError::Unauthorized`] while the local credential is not valid.
    fn on_message_arrived(&self, message: Message) -> Result<Arrival, BusError>;
}
