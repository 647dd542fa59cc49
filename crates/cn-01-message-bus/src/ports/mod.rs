//! # Ports Layer
//!
//! - **Driving Ports (Inbound):** the sink transports deliver into
//! - **Driven Ports (Outbound):** the transport and listener SPIs

pub mod inbound;
pub mod outbound;

pub use inbound::{Arrival, MessageSink};
pub use outbound::{MessageListener, TransportChannel};
