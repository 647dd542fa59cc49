//! # Configuration Container
//!
//! Settings for every component of a Constellation process.

pub mod config;

pub use config::{ConfigError, ConstellationConfig, StorageConfig};
