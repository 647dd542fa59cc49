//! Domain errors for the module directory.
//!
//! None of these escape a reconciliation: fetch and parse failures trigger
//! the cache fallback, store failures are logged. Callers only ever see a
//! [`SyncOutcome`](crate::SyncOutcome).

use thiserror::Error;

/// The remote fetch did not produce a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, timeout or protocol failure.
    #[error("directory request failed: {0}")]
    Http(String),
    /// Anything other than 200.
    #[error("directory answered with status {0}")]
    Status(u16),
    /// 200 with nothing in it.
    #[error("directory answered with an empty body")]
    EmptyBody,
}

/// The body could not be turned into a roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid directory JSON: {0}")]
    Json(String),
    #[error("directory reply has no children list")]
    MissingChildren,
    #[error("malformed mother entry: {0}")]
    MalformedMother(String),
}

/// Module cache failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("module cache I/O error: {0}")]
    Io(String),
    #[error("module cache is corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
