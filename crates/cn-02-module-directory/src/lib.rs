//! # Module Directory Subsystem
//!
//! Keeps an in-memory roster of sibling modules in step with a remote
//! directory service, falling back to a local cache whenever the directory
//! cannot be reached or its reply cannot be used.
//!
//! ## Architecture
//!
//! - **Domain Layer:** roster model, reply parsing, outcomes
//! - **Ports Layer:** `DirectoryApi` (driving); `DirectoryFetcher`,
//!   `ModuleStore`, `ModuleListener` (driven)
//! - **Service Layer:** `DirectorySynchronizer`, `ModuleListenerRegistry`
//! - **Adapters Layer:** reqwest fetcher (feature `http`), JSON file cache
//!   (feature `file-store`), in-memory cache
//!
//! ## Outcomes
//!
//! | Outcome | Roster | Cache | Credential |
//! |---------|--------|-------|------------|
//! | `Ok` | replaced from reply | rewritten | valid |
//! | `OkFromCache` | replaced from cache | untouched | valid |
//! | `Failed` | emptied | untouched | valid |
//! | `InvalidCredential` | untouched | untouched | invalid |
//! | `AlreadyRunning` | untouched | untouched | untouched |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test doubles for the directory ports.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use domain::{
    parse_reply, DirectoryConfig, DirectoryReply, FetchError, ParseError, ParsedDirectory, Roster,
    RosterCell, StoreError, SyncOutcome,
};
pub use ports::{DirectoryApi, DirectoryFetcher, DirectoryRequest, ModuleListener, ModuleStore};
pub use service::{DirectorySynchronizer, ModuleListenerRegistry};

#[cfg(feature = "http")]
pub use adapters::HttpDirectoryFetcher;
#[cfg(feature = "file-store")]
pub use adapters::JsonFileModuleStore;
pub use adapters::InMemoryModuleStore;
