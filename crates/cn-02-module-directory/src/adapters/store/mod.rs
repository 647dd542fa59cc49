//! Module cache implementations.

/// JSON file cache.
/// Requires feature: `file-store`
#[cfg(feature = "file-store")]
pub mod file;
pub mod memory;

#[cfg(feature = "file-store")]
pub use file::JsonFileModuleStore;
pub use memory::InMemoryModuleStore;
