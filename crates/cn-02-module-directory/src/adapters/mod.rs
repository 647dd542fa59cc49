//! Adapters for the directory ports.

/// reqwest directory fetcher.
/// Requires feature: `http`
#[cfg(feature = "http")]
pub mod http;
pub mod store;

#[cfg(feature = "http")]
pub use http::HttpDirectoryFetcher;
pub use store::InMemoryModuleStore;
#[cfg(feature = "file-store")]
pub use store::JsonFileModuleStore;
