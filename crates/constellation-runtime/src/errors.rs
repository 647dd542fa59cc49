//! Runtime errors.

use crate::container::ConfigError;
use cn_01_message_bus::BusError;
use cn_02_module_directory::{FetchError, StoreError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Constellation is already initialized on this context")]
    AlreadyInitialized,
}

/// Everything a [`Constellation`](crate::Constellation) operation can fail with.
#[derive(Debug, Error)]
pub enum ConstellationError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Bus(#[from] BusError),
    /// The module cache could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The directory client could not be built.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
