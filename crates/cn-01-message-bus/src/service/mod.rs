//! # Message Bus Service
//!
//! Wires the domain histories to the transport and listener ports.
//!
//! ## Locking
//!
//! The outbound queue and the inbound log sit behind independent locks; there
//! is no global lock. Transport hand-off and listener callbacks always run
//! with both released.

mod core;
mod inbound;
mod maintenance;
mod outbound;

pub use core::MessageBus;
