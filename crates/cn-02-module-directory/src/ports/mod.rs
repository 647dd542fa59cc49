//! # Ports Layer
//!
//! - **Driving Ports (Inbound):** `DirectoryApi`
//! - **Driven Ports (Outbound):** `DirectoryFetcher`, `ModuleStore`,
//!   `ModuleListener`

pub mod inbound;
pub mod outbound;

pub use inbound::DirectoryApi;
pub use outbound::{DirectoryFetcher, DirectoryRequest, ModuleListener, ModuleStore};
