//! Bus configuration.

use super::history::DEFAULT_MAX_INBOUND_SIZE;

/// Tunables for a [`MessageBus`](crate::MessageBus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Inbound history size at which eviction kicks in.
    pub max_inbound_size: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_inbound_size: DEFAULT_MAX_INBOUND_SIZE,
        }
    }
}

impl BusConfig {
    /// Config for tests that exercise eviction with a tiny limit.
    #[must_use]
    pub fn with_max_inbound_size(max_inbound_size: usize) -> Self {
        Self { max_inbound_size }
    }
}
