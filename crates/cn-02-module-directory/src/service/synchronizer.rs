use crate::domain::{parse_reply, DirectoryReply, ParsedDirectory, Roster, RosterCell, SyncOutcome};
use crate::ports::{DirectoryApi, DirectoryFetcher, DirectoryRequest, ModuleStore};
use crate::service::guard::SyncSlot;
use crate::service::listeners::ModuleListenerRegistry;
use async_trait::async_trait;
use shared_types::CredentialGuard;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Fetch-or-fallback engine for the module roster.
///
/// One reconciliation:
///
/// 1. Claim the run slot, or report `AlreadyRunning` without touching
///    anything.
/// 2. POST the package and its signature to the directory, once.
/// 3. A rejection marks the credential invalid. A usable roster rewrites
///    the cache and replaces the in-memory roster.
/// 4. Any fetch or parse failure falls back to the cache.
/// 5. Every outcome other than `AlreadyRunning` updates the credential and
///    notifies module listeners before the slot is released.
pub struct DirectorySynchronizer {
    fetcher: Arc<dyn DirectoryFetcher>,
    store: Arc<dyn ModuleStore>,
    credential: Arc<dyn CredentialGuard>,
    error_field: String,
    roster: Arc<RosterCell>,
    listeners: Arc<ModuleListenerRegistry>,
    slot: SyncSlot,
}

impl DirectorySynchronizer {
    pub fn new(
        fetcher: Arc<dyn DirectoryFetcher>,
        store: Arc<dyn ModuleStore>,
        credential: Arc<dyn CredentialGuard>,
        error_field: impl Into<String>,
    ) -> Self {
        let roster = Arc::new(RosterCell::new());
        Self {
            fetcher,
            store,
            credential,
            error_field: error_field.into(),
            listeners: Arc::new(ModuleListenerRegistry::new(Arc::clone(&roster))),
            roster,
            slot: SyncSlot::new(),
        }
    }

    /// Registry of module-list subscribers fed by this synchronizer.
    #[must_use]
    pub fn listeners(&self) -> &Arc<ModuleListenerRegistry> {
        &self.listeners
    }

    /// Whether a reconciliation currently holds the run slot.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.slot.is_running()
    }

    /// Run one reconciliation on the tokio runtime.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<SyncOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run().await })
    }

    async fn run(&self) -> SyncOutcome {
        let Some(_running) = self.slot.try_start() else {
            debug!("Reconciliation already in progress");
            return SyncOutcome::AlreadyRunning;
        };

        let outcome = self.fetch_or_fallback().await;

        if outcome == SyncOutcome::InvalidCredential {
            self.credential.set_valid(false);
        } else {
            self.credential.set_valid(true);
        }
        let roster = self.roster.snapshot();
        info!(
            %outcome,
            modules = roster.len(),
            mother = roster.mother().is_some(),
            "Directory reconciliation finished"
        );
        self.listeners.notify_all();
        outcome
    }

    async fn fetch_or_fallback(&self) -> SyncOutcome {
        let request = DirectoryRequest {
            package: self.credential.package_identifier().to_string(),
            data_coded: self.credential.encoded_signature(),
        };

        let body = match self.fetcher.fetch(&request).await {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, "Directory fetch failed, falling back to cache");
                return self.restore_from_cache();
            }
        };

        match parse_reply(&body, &self.error_field) {
            Ok(DirectoryReply::Rejected(reason)) => {
                warn!(package = %request.package, %reason, "Directory rejected credential");
                SyncOutcome::InvalidCredential
            }
            Ok(DirectoryReply::Roster(parsed)) => self.apply_remote(parsed),
            Err(error) => {
                warn!(%error, "Directory reply unusable, falling back to cache");
                self.restore_from_cache()
            }
        }
    }

    fn apply_remote(&self, parsed: ParsedDirectory) -> SyncOutcome {
        let records = parsed.cache_records();
        if let Err(error) = self.store.replace_all(&records) {
            warn!(%error, count = records.len(), "Could not rewrite module cache");
        }
        self.roster.replace(Roster::new(parsed.children, parsed.mother));
        SyncOutcome::Ok
    }

    fn restore_from_cache(&self) -> SyncOutcome {
        let cached = self.store.select_all().unwrap_or_else(|error| {
            warn!(%error, "Could not read module cache");
            Vec::new()
        });
        if cached.is_empty() {
            self.roster.replace(Roster::empty());
            return SyncOutcome::Failed;
        }
        debug!(count = cached.len(), "Roster restored from cache");
        self.roster.replace(Roster::from_cache(cached));
        SyncOutcome::OkFromCache
    }
}

#[async_trait]
impl DirectoryApi for DirectorySynchronizer {
    async fn reconcile(&self) -> SyncOutcome {
        self.run().await
    }

    fn roster(&self) -> Arc<Roster> {
        self.roster.snapshot()
    }
}
