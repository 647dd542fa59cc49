//! Domain Layer - message histories, limits and errors. No I/O.

pub mod config;
pub mod errors;
pub mod history;

pub use config::BusConfig;
pub use errors::{BusError, TransportError};
pub use history::{
    DeliveryFilter, Eviction, History, HistoryScope, DEFAULT_MAX_INBOUND_SIZE,
};
