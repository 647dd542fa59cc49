//! Domain errors for the message bus.

use thiserror::Error;

/// Failure reported by a [`TransportChannel`](crate::ports::TransportChannel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The channel has shut down and can no longer carry messages.
    #[error("transport channel is closed")]
    Closed,
    /// The message could not be encoded for the wire.
    #[error("failed to encode message: {0}")]
    Encode(String),
    /// The channel refused the message.
    #[error("transport rejected message: {0}")]
    Rejected(String),
}

/// Errors returned by bus operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// The local credential has not been validated by the directory.
    #[error("credential is not valid; bus access refused")]
    Unauthorized,
    /// A queued message could not be handed to the transport. It stays
    /// queued for the next drain.
    #[error("drain stopped: {0}")]
    Transport(#[from] TransportError),
    /// History limits must be positive.
    #[error("history limit must be greater than zero")]
    InvalidLimit,
}
