//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the bus requires from its host: something that physically
//! carries messages, and the observers that receive them.

use crate::domain::TransportError;
use shared_types::Message;

/// Carries an outbound message to other processes.
///
/// Implementations must eventually call
/// [`MessageSink::on_message_arrived`](crate::ports::MessageSink::on_message_arrived)
/// on the destination bus with sender, receiver, id and payload intact.
///
/// # Thread Safety
///
/// `carry` is called from whichever thread is draining the outbound queue,
/// never while a history lock is held.
pub trait TransportChannel: Send + Sync {
    /// Hand one message to the transport.
    fn carry(&self, message: &Message) -> Result<(), TransportError>;
}

/// Observer of inbound messages.
///
/// The bus holds listeners weakly: dropping the last `Arc` unsubscribes.
pub trait MessageListener: Send + Sync {
    /// Called once per accepted inbound message, and once per history entry
    /// on registration.
    fn on_message(&self, message: &Message);
}
