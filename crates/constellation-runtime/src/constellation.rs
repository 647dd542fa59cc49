//! # Constellation Facade
//!
//! One `Constellation` per process: a message bus and a directory
//! synchronizer sharing one credential.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Build the credential, module cache, directory client and bus
//! 3. Claim the host context (fails if already claimed)
//! 4. Attach the bus to the broadcast hub, if one was given
//! 5. Spawn the first reconciliation
//!
//! Steps 1 and 2 run before the claim, so a failed build leaves the context
//! free for another attempt.

use crate::container::ConstellationConfig;
use crate::context::HostContext;
use crate::errors::ConstellationError;
use cn_01_message_bus::{
    BroadcastHub, BusError, DeliveryFilter, HistoryScope, MessageBus, MessageListener,
    MessageSink, TransportChannel,
};
use cn_02_module_directory::{
    DirectoryApi, DirectoryFetcher, DirectorySynchronizer, HttpDirectoryFetcher,
    InMemoryModuleStore, JsonFileModuleStore, ModuleListener, ModuleStore, SyncOutcome,
};
use parking_lot::Mutex;
use shared_types::{CredentialGuard, Message, MessageId, ModuleRecord, Payload, Sha1Credential};
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Assembles a [`Constellation`] from configuration plus optional overrides.
///
/// Anything not overridden is built from the configuration: an HTTP directory
/// client, a JSON file cache (or an in-memory one when no path is set) and a
/// transport that goes nowhere unless a hub is given.
pub struct ConstellationBuilder {
    config: ConstellationConfig,
    hub: Option<BroadcastHub>,
    transport: Option<Arc<dyn TransportChannel>>,
    fetcher: Option<Arc<dyn DirectoryFetcher>>,
    store: Option<Arc<dyn ModuleStore>>,
    sync_on_start: bool,
}

impl ConstellationBuilder {
    #[must_use]
    pub fn new(config: ConstellationConfig) -> Self {
        Self {
            config,
            hub: None,
            transport: None,
            fetcher: None,
            store: None,
            sync_on_start: true,
        }
    }

    /// Publish onto `hub` and receive everything published there.
    #[must_use]
    pub fn hub(mut self, hub: &BroadcastHub) -> Self {
        self.hub = Some(hub.clone());
        self
    }

    /// Outbound transport. Takes precedence over the hub's transport; the
    /// hub, if any, still feeds inbound messages.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn TransportChannel>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn DirectoryFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn store(mut self, store: Arc<dyn ModuleStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Whether `initialize` spawns the first reconciliation. Defaults to
    /// `true`.
    #[must_use]
    pub fn sync_on_start(mut self, enabled: bool) -> Self {
        self.sync_on_start = enabled;
        self
    }

    /// Build and start the constellation on `context`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`ConstellationError::Config`] for an unusable configuration.
    /// - [`ConstellationError::Store`] if the cache file cannot be opened.
    /// - [`ConstellationError::Fetch`] if the HTTP client cannot be built.
    /// - [`ConstellationError::Lifecycle`] if `context` is already claimed.
    pub fn initialize(self, context: &HostContext) -> Result<Constellation, ConstellationError> {
        let config = self.config;
        config.validate()?;

        let credential = Arc::new(Sha1Credential::new(
            config.package_identifier.clone(),
            config.secret_key.as_str(),
        ));

        let store: Arc<dyn ModuleStore> = match (self.store, &config.storage.cache_path) {
            (Some(store), _) => store,
            (None, Some(path)) => {
                let store = JsonFileModuleStore::open(path)?;
                debug!(path = %store.path().display(), "Module cache opened");
                Arc::new(store)
            }
            (None, None) => Arc::new(InMemoryModuleStore::new()),
        };

        let fetcher: Arc<dyn DirectoryFetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let fetcher = HttpDirectoryFetcher::new(&config.directory)?;
                debug!(endpoint = fetcher.endpoint(), "Directory client built");
                Arc::new(fetcher)
            }
        };

        let detached = self.transport.is_none() && self.hub.is_none();
        let transport: Arc<dyn TransportChannel> = match (self.transport, &self.hub) {
            (Some(transport), _) => transport,
            (None, Some(hub)) => Arc::new(hub.transport()),
            (None, None) => Arc::new(BroadcastHub::new().transport()),
        };

        let bus = Arc::new(MessageBus::new(
            Arc::clone(&credential) as Arc<dyn CredentialGuard>,
            transport,
            config.bus.clone(),
        )?);

        let directory = Arc::new(DirectorySynchronizer::new(
            fetcher,
            store,
            Arc::clone(&credential) as Arc<dyn CredentialGuard>,
            config.directory.error_field.clone(),
        ));

        context.claim()?;

        let receiver = self.hub.as_ref().map(|hub| {
            let sink: Weak<dyn MessageSink> = Arc::downgrade(&bus) as Weak<dyn MessageSink>;
            hub.attach(sink)
        });

        let constellation = Constellation {
            bus,
            directory,
            credential,
            initial_sync: Mutex::new(None),
            receiver,
            detached,
        };

        if self.sync_on_start {
            let handle = constellation.trigger_directory_sync();
            *constellation.initial_sync.lock() = Some(handle);
        }

        if detached {
            warn!(
                package = %constellation.identity(),
                "No hub or transport configured, sent messages reach no other process"
            );
        }
        info!(
            package = %constellation.identity(),
            endpoint = %config.directory.endpoint,
            "Constellation initialized"
        );
        Ok(constellation)
    }
}

/// A running Constellation process.
///
/// Messaging calls return [`BusError::Unauthorized`] until a reconciliation
/// has validated the credential. Messages sent meanwhile stay queued and are
/// flushed after the first reconciliation that leaves the credential valid.
pub struct Constellation {
    bus: Arc<MessageBus>,
    directory: Arc<DirectorySynchronizer>,
    credential: Arc<Sha1Credential>,
    initial_sync: Mutex<Option<JoinHandle<SyncOutcome>>>,
    receiver: Option<JoinHandle<()>>,
    detached: bool,
}

impl Constellation {
    /// Shorthand for `ConstellationBuilder::new(config).initialize(context)`.
    ///
    /// # Errors
    ///
    /// See [`ConstellationBuilder::initialize`].
    pub fn initialize(
        context: &HostContext,
        config: ConstellationConfig,
    ) -> Result<Self, ConstellationError> {
        ConstellationBuilder::new(config).initialize(context)
    }

    /// Package identifier of this process.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.bus.identity()
    }

    /// Whether the directory accepted this process's signature on the last
    /// reconciliation.
    #[must_use]
    pub fn is_credential_valid(&self) -> bool {
        self.credential.is_valid()
    }

    /// Whether this process was built without a hub or transport. Its
    /// messages are counted as sent but reach no other process.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// The underlying bus, for callers that need the full engine API.
    #[must_use]
    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    pub fn send(
        &self,
        id: MessageId,
        receiver: impl Into<String>,
        payload: Payload,
    ) -> Result<(), ConstellationError> {
        Ok(self.bus.send(id, receiver, payload)?)
    }

    pub fn broadcast(&self, id: MessageId, payload: Payload) -> Result<(), ConstellationError> {
        Ok(self.bus.broadcast(id, payload)?)
    }

    pub fn respond(&self, original: &Message, payload: Payload) -> Result<(), ConstellationError> {
        Ok(self.bus.respond(original, payload)?)
    }

    /// First received message with `id`.
    #[must_use]
    pub fn message_by_id(&self, id: MessageId) -> Option<Arc<Message>> {
        self.bus.message_by_id(id)
    }

    /// Register a message listener and replay the received backlog to it.
    pub fn register_listener(&self, listener: &Arc<dyn MessageListener>) -> usize {
        self.bus.register_listener(listener)
    }

    pub fn unregister_listener(&self, listener: &Arc<dyn MessageListener>) -> bool {
        self.bus.unregister_listener(listener)
    }

    #[must_use]
    pub fn total_sent(&self) -> u64 {
        self.bus.total_sent()
    }

    #[must_use]
    pub fn total_received(&self) -> u64 {
        self.bus.total_received()
    }

    pub fn reset_total_sent(&self) {
        self.bus.reset_total_sent();
    }

    pub fn reset_total_received(&self) {
        self.bus.reset_total_received();
    }

    #[must_use]
    pub fn stored_sent(&self) -> usize {
        self.bus.stored_sent()
    }

    #[must_use]
    pub fn stored_received(&self) -> usize {
        self.bus.stored_received()
    }

    #[must_use]
    pub fn max_inbound_size(&self) -> usize {
        self.bus.max_inbound_size()
    }

    pub fn set_max_inbound_size(&self, limit: usize) -> Result<(), ConstellationError> {
        Ok(self.bus.set_max_inbound_size(limit)?)
    }

    /// Remove messages from one or both histories. Returns how many went.
    pub fn clear(&self, scope: HistoryScope, filter: DeliveryFilter) -> usize {
        self.bus.clear(scope, filter)
    }

    // =========================================================================
    // Module directory
    // =========================================================================

    /// Subscribe to roster updates, optionally only for modules with the
    /// given entry point. A non-empty roster is delivered immediately.
    pub fn subscribe_modules(&self, listener: &Arc<dyn ModuleListener>, entry_point: Option<&str>) {
        self.directory.listeners().subscribe(listener, entry_point);
    }

    pub fn unsubscribe_modules(&self, listener: &Arc<dyn ModuleListener>) -> bool {
        self.directory.listeners().unsubscribe(listener)
    }

    /// Parent application from the last reconciliation.
    #[must_use]
    pub fn mother(&self) -> Option<ModuleRecord> {
        self.directory.mother()
    }

    /// Current sibling modules, mother excluded.
    #[must_use]
    pub fn modules(&self) -> Vec<ModuleRecord> {
        self.directory.roster().modules().to_vec()
    }

    /// Start a reconciliation in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger_directory_sync(&self) -> JoinHandle<SyncOutcome> {
        let directory = Arc::clone(&self.directory);
        let bus = Arc::clone(&self.bus);
        let credential = Arc::clone(&self.credential);
        tokio::spawn(async move {
            let outcome = directory.reconcile().await;
            flush_after_sync(&bus, credential.as_ref(), outcome);
            outcome
        })
    }

    /// Run a reconciliation to completion.
    pub async fn reconcile_directory(&self) -> SyncOutcome {
        let outcome = self.directory.reconcile().await;
        flush_after_sync(&self.bus, self.credential.as_ref(), outcome);
        outcome
    }

    /// Wait for the reconciliation spawned by `initialize`.
    ///
    /// `None` if none was started, it was already awaited, or it panicked.
    pub async fn wait_initial_sync(&self) -> Option<SyncOutcome> {
        let handle = self.initial_sync.lock().take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                warn!(%error, "Initial reconciliation task failed");
                None
            }
        }
    }
}

fn flush_after_sync(bus: &MessageBus, credential: &dyn CredentialGuard, outcome: SyncOutcome) {
    if outcome == SyncOutcome::AlreadyRunning || !credential.is_valid() {
        return;
    }
    if bus.stored_sent() == 0 {
        return;
    }
    match bus.drain() {
        Ok(count) => debug!(count, "Flushed messages queued before authorization"),
        Err(BusError::Unauthorized) => {}
        Err(error) => warn!(%error, "Flush after reconciliation stopped"),
    }
}

impl Drop for Constellation {
    fn drop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            receiver.abort();
        }
    }
}

impl fmt::Debug for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constellation")
            .field("bus", &self.bus)
            .field("credential_valid", &self.credential.is_valid())
            .field("detached", &self.detached)
            .field("syncing", &self.directory.is_running())
            .finish_non_exhaustive()
    }
}
