//! Domain Layer - roster model, reply parsing, outcomes and errors. No I/O.

pub mod config;
pub mod errors;
pub mod outcome;
pub mod response;
pub mod roster;

pub use config::{DirectoryConfig, DEFAULT_DIRECTORY_URL, DEFAULT_ERROR_FIELD};
pub use errors::{FetchError, ParseError, StoreError};
pub use outcome::SyncOutcome;
pub use response::{parse_reply, DirectoryReply, ParsedDirectory};
pub use roster::{Roster, RosterCell};
