//! # Driving Ports (Inbound API)

use crate::domain::{Roster, SyncOutcome};
use async_trait::async_trait;
use shared_types::ModuleRecord;
use std::sync::Arc;

/// Directory operations exposed to the host application.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Run one reconciliation to completion.
    ///
    /// Never fails: transport, parse and cache problems are folded into the
    /// outcome.
    async fn reconcile(&self) -> SyncOutcome;

    /// Current roster snapshot.
    fn roster(&self) -> Arc<Roster>;

    /// Parent application from the last reconciliation, if any.
    fn mother(&self) -> Option<ModuleRecord> {
        self.roster().mother().cloned()
    }
}
