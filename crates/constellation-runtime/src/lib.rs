//! # Constellation Runtime
//!
//! Host-facing entry point: configuration, the host context and the
//! [`Constellation`] facade that ties the message bus and the module
//! directory to one credential.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration loaded from the environment
//! - `context` - Init-once host handle
//! - `constellation` - Facade and builder
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = HostContext::new();
//! let config = ConstellationConfig::from_env()?;
//! let constellation = Constellation::initialize(&context, config)?;
//!
//! constellation.wait_initial_sync().await;
//! constellation.broadcast(1, Payload::new())?;
//! ```

pub mod constellation;
pub mod container;
pub mod context;
pub mod errors;

pub use constellation::{Constellation, ConstellationBuilder};
pub use container::{ConfigError, ConstellationConfig, StorageConfig};
pub use context::HostContext;
pub use errors::{ConstellationError, LifecycleError};
