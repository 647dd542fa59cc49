//! # Broadcast Transport
//!
//! In-process stand-in for a system-wide broadcast: every carried message is
//! encoded to a JSON frame and published on a `tokio::sync::broadcast`
//! channel. Each attached bus runs a task that decodes frames and hands them
//! to [`MessageSink::on_message_arrived`]; receiver filtering then happens in
//! the bus, exactly as it would for an external transport.
//!
//! A bus attached to the same hub it sends through sees its own broadcasts.

use crate::domain::TransportError;
use crate::ports::{MessageSink, TransportChannel};
use serde::{Deserialize, Serialize};
use shared_types::{Message, MessageId, Payload, PayloadValue, Recipient};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default channel capacity, in frames.
pub const DEFAULT_HUB_CAPACITY: usize = 1024;

/// Wire envelope for one message. `receiver` is absent for broadcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Package identifier of the sending process.
    pub sender: String,
    /// Addressed package, `None` for a broadcast.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Caller-chosen message id, reused by replies.
    pub id: MessageId,
    /// Message payload. Floats must be finite.
    #[serde(default)]
    pub payload: Payload,
}

impl WireMessage {
    /// Encode to a JSON frame.
    ///
    /// # Errors
    ///
    /// [`TransportError::Encode`] if the payload holds a NaN or infinite
    /// float anywhere, nested maps included. JSON has no encoding for them
    /// that would decode back to the same value.
    pub fn encode(message: &Message) -> Result<String, TransportError> {
        if let Some(key) = non_finite_entry(message.payload()) {
            return Err(TransportError::Encode(format!(
                "payload entry `{key}` is not a finite number"
            )));
        }
        let wire = Self {
            sender: message.sender().to_string(),
            receiver: message.receiver().as_package().map(str::to_string),
            id: message.id(),
            payload: message.payload().clone(),
        };
        serde_json::to_string(&wire).map_err(|e| TransportError::Encode(e.to_string()))
    }

    /// Decode a JSON frame back into an undelivered message.
    pub fn decode(frame: &str) -> Result<Message, serde_json::Error> {
        let wire: Self = serde_json::from_str(frame)?;
        let receiver = wire.receiver.map_or(Recipient::Broadcast, Recipient::Package);
        Ok(Message::new(wire.id, wire.sender, receiver, wire.payload))
    }
}

fn non_finite_entry(payload: &Payload) -> Option<&str> {
    payload.iter().find_map(|(key, value)| match value {
        PayloadValue::Float(v) if !v.is_finite() => Some(key.as_str()),
        PayloadValue::Map(nested) => non_finite_entry(nested),
        _ => None,
    })
}

/// Shared broadcast channel that buses attach to.
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<Arc<str>>,
}

impl BroadcastHub {
    /// Create a hub with [`DEFAULT_HUB_CAPACITY`] frames of buffering.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HUB_CAPACITY)
    }

    /// Create a hub that buffers up to `capacity` frames per receiver.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// A transport that publishes onto this hub.
    #[must_use]
    pub fn transport(&self) -> BroadcastTransport {
        BroadcastTransport {
            sender: self.sender.clone(),
        }
    }

    /// Start delivering hub frames to `sink`.
    ///
    /// The subscription is taken before this returns, so frames published
    /// afterwards are never missed. The task ends when the sink is dropped or
    /// the hub closes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn attach(&self, sink: Weak<dyn MessageSink>) -> JoinHandle<()> {
        let mut receiver = self.sender.subscribe();
        tokio::spawn(async move {
            loop {
                let frame = match receiver.recv().await {
                    Ok(frame) => frame,
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!(lagged = count, "Bus fell behind, frames dropped");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let Some(sink) = sink.upgrade() else {
                    debug!("Attached bus is gone, detaching");
                    break;
                };
                let message = match WireMessage::decode(&frame) {
                    Ok(message) => message,
                    Err(error) => {
                        warn!(%error, "Discarding undecodable frame");
                        continue;
                    }
                };
                let message_id = message.id();
                if let Err(error) = sink.on_message_arrived(message) {
                    warn!(message_id, %error, "Bus refused inbound message");
                }
            }
        })
    }

    /// Number of attached receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

/// [`TransportChannel`] that publishes onto a [`BroadcastHub`].
#[derive(Debug, Clone)]
pub struct BroadcastTransport {
    sender: broadcast::Sender<Arc<str>>,
}

impl TransportChannel for BroadcastTransport {
    fn carry(&self, message: &Message) -> Result<(), TransportError> {
        let frame: Arc<str> = WireMessage::encode(message)?.into();
        match self.sender.send(frame) {
            Ok(receivers) => {
                debug!(message_id = message.id(), receivers, "Frame published");
            }
            Err(_) => {
                debug!(message_id = message.id(), "No bus attached, frame dropped");
            }
        }
        Ok(())
    }
}
