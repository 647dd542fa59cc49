//! # Message Bus Subsystem
//!
//! Lets independently deployed applications exchange tagged messages, either
//! addressed to one package or broadcast to all of them.
//!
//! ## Architecture
//!
//! - **Domain Layer:** bounded histories, eviction policy, errors
//! - **Ports Layer:** `MessageSink` (driving), `TransportChannel` and
//!   `MessageListener` (driven)
//! - **Service Layer:** `MessageBus`, which wires the two together
//! - **Adapters Layer:** in-process broadcast transport (feature `broadcast`)
//!
//! ## Delivery Rules
//!
//! - A message for a concrete package is accepted only by the process whose
//!   identity matches it, ignoring case. Broadcasts are accepted everywhere.
//! - Accepted messages enter the inbound history. At the size limit,
//!   delivered messages are purged first; if that frees nothing below the
//!   limit the whole history is cleared.
//! - Both directions are refused while the credential is not valid.
//!
//! ## Example
//!
//! ```rust
//! use cn_01_message_bus::{BusConfig, MessageBus, TransportChannel, TransportError};
//! use shared_types::{CredentialGuard, Message, Payload, Sha1Credential};
//! use std::sync::Arc;
//!
//! struct Discard;
//!
//! impl TransportChannel for Discard {
//!     fn carry(&self, _message: &Message) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! let credential = Arc::new(Sha1Credential::new("com.example.app", "secret"));
//! let bus = MessageBus::new(credential.clone(), Arc::new(Discard), BusConfig::default()).unwrap();
//!
//! // Refused until the directory validates the credential.
//! assert!(bus.send(7, "com.example.other", Payload::new()).is_err());
//!
//! credential.set_valid(true);
//! bus.drain().unwrap();
//! assert_eq!(bus.stored_sent(), 0);
//! assert_eq!(bus.total_sent(), 1);
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// FEATURE-GATED MODULES
// =============================================================================

pub mod adapters;

/// Test doubles for the bus ports.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use domain::{
    BusConfig, BusError, DeliveryFilter, Eviction, HistoryScope, TransportError,
    DEFAULT_MAX_INBOUND_SIZE,
};
pub use ports::{Arrival, MessageListener, MessageSink, TransportChannel};
pub use service::MessageBus;

#[cfg(feature = "broadcast")]
pub use adapters::{BroadcastHub, BroadcastTransport, WireMessage};
