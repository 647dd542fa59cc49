//! Sending side: enqueue, count, drain.

use crate::domain::BusError;
use crate::service::MessageBus;
use shared_types::{Message, MessageId, Payload, Recipient};
use std::sync::Arc;
use tracing::{debug, warn};

impl MessageBus {
    /// Send a message to a single package and drain the outbound queue.
    ///
    /// `Ok` means the message is queued and counted, not that it was handed
    /// off. If another thread is draining at that moment, this call leaves
    /// the hand-off to it; should that drain stop on a transport error, the
    /// message stays queued behind the refused one and the error surfaces
    /// only on the other thread. [`MessageBus::stored_sent`] shows what is
    /// still waiting.
    ///
    /// # Errors
    ///
    /// - [`BusError::Unauthorized`] if the credential is not valid. The
    ///   message stays queued and counted.
    /// - [`BusError::Transport`] if the transport refused a queued message.
    pub fn send(
        &self,
        id: MessageId,
        receiver: impl Into<String>,
        payload: Payload,
    ) -> Result<(), BusError> {
        self.enqueue(Message::new(
            id,
            self.identity.clone(),
            Recipient::package(receiver),
            payload,
        ))
    }

    /// Send a message every process accepts.
    ///
    /// # Errors
    ///
    /// Same as [`MessageBus::send`].
    pub fn broadcast(&self, id: MessageId, payload: Payload) -> Result<(), BusError> {
        self.enqueue(Message::new(
            id,
            self.identity.clone(),
            Recipient::Broadcast,
            payload,
        ))
    }

    /// Reply to `original`, reusing its id and addressing its sender.
    ///
    /// # Errors
    ///
    /// Same as [`MessageBus::send`].
    pub fn respond(&self, original: &Message, payload: Payload) -> Result<(), BusError> {
        self.send(original.id(), original.sender(), payload)
    }

    fn enqueue(&self, message: Message) -> Result<(), BusError> {
        debug!(
            message_id = message.id(),
            receiver = %message.receiver(),
            "Queueing outbound message"
        );
        self.outbound.lock().record(Arc::new(message));
        self.drain().map(|_| ())
    }

    /// Hand every queued message to the transport, oldest first.
    ///
    /// Only one thread drains at a time. A caller that finds a drain already
    /// in progress returns immediately; the active drainer re-checks the queue
    /// before it leaves, so nothing enqueued meanwhile is stranded.
    ///
    /// Returns the number of messages this call handed off.
    ///
    /// # Errors
    ///
    /// - [`BusError::Unauthorized`] if the credential is not valid.
    /// - [`BusError::Transport`] on the first refused message. It and every
    ///   message behind it stay queued in their original order.
    pub fn drain(&self) -> Result<usize, BusError> {
        self.ensure_authorized()?;

        let mut carried = 0;
        loop {
            let Some(gate) = self.drain_gate.try_lock() else {
                return Ok(carried);
            };
            loop {
                let next = self.outbound.lock().pop_front();
                let Some(message) = next else {
                    break;
                };
                if let Err(error) = self.transport.carry(&message) {
                    warn!(
                        message_id = message.id(),
                        receiver = %message.receiver(),
                        %error,
                        "Transport refused message, left queued"
                    );
                    self.outbound.lock().requeue_front(message);
                    return Err(error.into());
                }
                carried += 1;
            }
            drop(gate);

            let idle = self.outbound.lock().is_empty();
            if idle {
                if carried > 0 {
                    debug!(count = carried, "Outbound queue drained");
                }
                return Ok(carried);
            }
        }
    }
}
