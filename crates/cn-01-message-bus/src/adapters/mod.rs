//! Adapters for the bus ports.

/// In-process broadcast transport.
/// Requires feature: `broadcast`
#[cfg(feature = "broadcast")]
pub mod broadcast;

#[cfg(feature = "broadcast")]
pub use broadcast::{BroadcastHub, BroadcastTransport, WireMessage};
