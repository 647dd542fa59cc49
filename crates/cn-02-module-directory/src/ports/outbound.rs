//! # Driven Ports (Outbound SPI)
//!
//! What the synchronizer needs from its host: a way to reach the directory
//! and somewhere to cache the roster.

use crate::domain::{FetchError, StoreError};
use async_trait::async_trait;
use shared_types::ModuleRecord;

/// Form fields POSTed to the directory.
#[derive(Clone, PartialEq, Eq)]
pub struct DirectoryRequest {
    /// Package identifier of the calling application.
    pub package: String,
    /// Lowercase hex SHA-1 of `package + secret_key`.
    pub data_coded: String,
}

impl std::fmt::Debug for DirectoryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryRequest")
            .field("package", &self.package)
            .finish_non_exhaustive()
    }
}

/// One remote roster fetch.
///
/// A single attempt per call. Implementations do not retry.
#[async_trait]
pub trait DirectoryFetcher: Send + Sync {
    /// Fetch the reply body.
    ///
    /// # Errors
    ///
    /// Any transport failure, a non-200 status or an empty body.
    async fn fetch(&self, request: &DirectoryRequest) -> Result<String, FetchError>;
}

/// Persistent roster cache.
///
/// Records are keyed by `package`. Implementations serialize writers.
pub trait ModuleStore: Send + Sync {
    fn delete_all(&self) -> Result<(), StoreError>;

    /// Insert a record, replacing any record with the same package in place.
    fn insert_or_replace(&self, record: &ModuleRecord) -> Result<(), StoreError>;

    /// Every cached record in insertion order.
    fn select_all(&self) -> Result<Vec<ModuleRecord>, StoreError>;

    /// Delete everything, then insert `records`, as one unit.
    ///
    /// The default runs the three primitives back to back; stores with a
    /// transaction primitive should override it.
    fn replace_all(&self, records: &[ModuleRecord]) -> Result<(), StoreError> {
        self.delete_all()?;
        for record in records {
            self.insert_or_replace(record)?;
        }
        Ok(())
    }
}

/// Observer of roster deliveries.
///
/// Held weakly by the registry: dropping the last `Arc` unsubscribes.
pub trait ModuleListener: Send + Sync {
    /// Called with the roster, or the subset matching this listener's
    /// entry-point filter. The subset may be empty.
    fn on_modules(&self, modules: &[ModuleRecord]);
}
