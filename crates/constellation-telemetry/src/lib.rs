//! # Constellation Telemetry
//!
//! Structured logging for Constellation processes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use constellation_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     tracing::info!("ready");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CN_SERVICE_NAME` | `constellation` | Service name in log lines |
//! | `CN_LOG_LEVEL` | `info` | Filter directive, falls back to `RUST_LOG` |
//! | `CN_JSON_LOGS` | `false` (`true` in containers) | JSON output |

mod config;
mod logging;

pub use config::TelemetryConfig;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),

    #[error("Invalid log filter: {0}")]
    Filter(String),
}

/// Install the global log subscriber.
///
/// Safe to call more than once: later calls leave the first subscriber in
/// place and report [`TelemetryError::Subscriber`].
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)
}
