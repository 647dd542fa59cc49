//! # Shared Types Crate
//!
//! This crate contains the entities exchanged between sibling applications
//! and the pieces both engines depend on.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Message`, `ModuleRecord` and the payload
//!   model are defined here and nowhere else.
//! - **Closed Payload Model**: payload values are a fixed set of kinds so the
//!   wire format and tests stay well-defined.
//! - **Weak Observers**: listener registries hold weak handles; a dropped
//!   listener is pruned, never invoked.

pub mod entities;
pub mod listeners;
pub mod security;

pub use entities::*;
pub use listeners::ListenerRegistry;
pub use security::{CredentialGuard, Sha1Credential};
