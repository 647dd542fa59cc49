//! Host context: the handle a process initializes Constellation against.

use crate::errors::LifecycleError;
use std::sync::atomic::{AtomicBool, Ordering};

/// One per process. A context can back exactly one
/// [`Constellation`](crate::Constellation).
#[derive(Debug, Default)]
pub struct HostContext {
    initialized: AtomicBool,
}

impl HostContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `Constellation` has already been initialized on this context.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub(crate) fn claim(&self) -> Result<(), LifecycleError> {
        self.initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| LifecycleError::AlreadyInitialized)
    }
}
