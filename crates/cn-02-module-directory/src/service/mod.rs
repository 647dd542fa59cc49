//! # Directory Service
//!
//! The synchronizer, its run slot and the module-list subscribers.

mod guard;
mod listeners;
mod synchronizer;

pub use listeners::ModuleListenerRegistry;
pub use synchronizer::DirectorySynchronizer;
