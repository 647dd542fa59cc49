//! Test doubles for the bus ports.
//!
//! Enable with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use cn_01_message_bus::test_utils::RecordingTransport;
//! use cn_01_message_bus::TransportChannel;
//! use shared_types::{Message, Payload, Recipient};
//!
//! let transport = RecordingTransport::failing_after(1);
//! let message = Message::new(1, "a", Recipient::Broadcast, Payload::new());
//! assert!(transport.carry(&message).is_ok());
//! assert!(transport.carry(&message).is_err());
//! assert_eq!(transport.carried_ids(), vec![1]);
//! ```

use crate::domain::TransportError;
use crate::ports::{MessageListener, TransportChannel};
use parking_lot::Mutex;
use shared_types::{CredentialGuard, Message, MessageId, Sha1Credential};
use std::sync::Arc;

/// Transport that records every carried message and can be told to start
/// refusing after a number of successes.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    carried: Mutex<Vec<Message>>,
    /// Successful carries left before refusing. `None` never refuses.
    budget: Mutex<Option<usize>>,
}

impl RecordingTransport {
    /// Transport that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that accepts `successes` messages, then refuses.
    #[must_use]
    pub fn failing_after(successes: usize) -> Self {
        let transport = Self::default();
        transport.fail_after(Some(successes));
        transport
    }

    /// Reset the failure budget. `None` accepts everything again.
    pub fn fail_after(&self, successes: Option<usize>) {
        *self.budget.lock() = successes;
    }

    /// Copies of every message carried so far.
    #[must_use]
    pub fn carried(&self) -> Vec<Message> {
        self.carried.lock().clone()
    }

    #[must_use]
    pub fn carried_ids(&self) -> Vec<MessageId> {
        self.carried.lock().iter().map(Message::id).collect()
    }
}

impl TransportChannel for RecordingTransport {
    fn carry(&self, message: &Message) -> Result<(), TransportError> {
        let mut budget = self.budget.lock();
        match budget.as_mut() {
            Some(0) => return Err(TransportError::Rejected("injected failure".into())),
            Some(left) => *left -= 1,
            None => {}
        }
        self.carried.lock().push(message.clone());
        Ok(())
    }
}

/// Listener that keeps a copy of everything it is handed.
#[derive(Debug, Default)]
pub struct CollectingListener {
    seen: Mutex<Vec<Message>>,
}

impl CollectingListener {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn seen(&self) -> Vec<Message> {
        self.seen.lock().clone()
    }

    #[must_use]
    pub fn seen_ids(&self) -> Vec<MessageId> {
        self.seen.lock().iter().map(Message::id).collect()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

impl MessageListener for CollectingListener {
    fn on_message(&self, message: &Message) {
        self.seen.lock().push(message.clone());
    }
}

/// Credential that has already been validated.
#[must_use]
pub fn validated_credential(package: &str) -> Arc<Sha1Credential> {
    let credential = Arc::new(Sha1Credential::new(package, "test-secret"));
    credential.set_valid(true);
    credential
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Payload, Recipient};

    #[test]
    fn test_recording_transport_budget_resets() {
        let transport = RecordingTransport::failing_after(0);
        let message = Message::new(5, "a", Recipient::Broadcast, Payload::new());

        assert!(transport.carry(&message).is_err());
        transport.fail_after(None);
        assert!(transport.carry(&message).is_ok());
        assert_eq!(transport.carried_ids(), vec![5]);
    }
}
