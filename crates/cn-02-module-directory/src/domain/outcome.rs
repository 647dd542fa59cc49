use std::fmt;

/// Result of one reconciliation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncOutcome {
    /// Fresh roster from the directory; cache rewritten.
    Ok,
    /// Directory unusable; roster restored from a non-empty cache.
    OkFromCache,
    /// Directory unusable and the cache was empty.
    Failed,
    /// Another reconciliation holds the slot. Nothing was touched.
    AlreadyRunning,
    /// The directory rejected the credential.
    InvalidCredential,
}

impl SyncOutcome {
    /// Whether a roster is available after this outcome.
    #[must_use]
    pub fn has_roster(self) -> bool {
        matches!(self, Self::Ok | Self::OkFromCache)
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "OK",
            Self::OkFromCache => "OK_FROM_CACHE",
            Self::Failed => "FAILED",
            Self::AlreadyRunning => "ALREADY_RUNNING",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
        };
        f.write_str(label)
    }
}
