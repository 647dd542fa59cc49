use crate::domain::{BusConfig, BusError, History};
use crate::ports::{MessageListener, TransportChannel};
use parking_lot::Mutex;
use shared_types::{CredentialGuard, ListenerRegistry};
use std::fmt;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

/// Cross-application message bus.
///
/// Outbound messages are queued, counted and handed to the transport by a
/// single drainer at a time. Inbound messages addressed to this process are
/// stored in a bounded history and fanned out to listeners.
///
/// # Example
///
/// ```rust,ignore
/// let credential = Arc::new(Sha1Credential::new("com.example.app", "secret"));
/// let hub = BroadcastHub::new();
/// let transport = Arc::new(hub.transport());
/// let bus = Arc::new(MessageBus::new(credential, transport, BusConfig::default())?);
/// hub.attach(Arc::downgrade(&bus) as Weak<dyn MessageSink>);
///
/// bus.broadcast(1, Payload::new())?;
/// ```
pub struct MessageBus {
    /// Package identifier used as sender and for receiver matching.
    pub(crate) identity: String,
    pub(crate) credential: Arc<dyn CredentialGuard>,
    pub(crate) transport: Arc<dyn TransportChannel>,
    /// Messages waiting for the transport, plus `totalSent`.
    pub(crate) outbound: Mutex<History>,
    /// Accepted inbound messages, plus `totalReceived`.
    pub(crate) inbound: Mutex<History>,
    pub(crate) max_inbound_size: AtomicUsize,
    pub(crate) listeners: ListenerRegistry<dyn MessageListener>,
    /// Held by whichever thread is currently draining.
    pub(crate) drain_gate: Mutex<()>,
}

impl MessageBus {
    /// Create a bus for the package the credential was issued for.
    ///
    /// # Errors
    ///
    /// [`BusError::InvalidLimit`] if `config.max_inbound_size` is zero.
    pub fn new(
        credential: Arc<dyn CredentialGuard>,
        transport: Arc<dyn TransportChannel>,
        config: BusConfig,
    ) -> Result<Self, BusError> {
        if config.max_inbound_size == 0 {
            return Err(BusError::InvalidLimit);
        }
        Ok(Self {
            identity: credential.package_identifier().to_string(),
            credential,
            transport,
            outbound: Mutex::new(History::new()),
            inbound: Mutex::new(History::new()),
            max_inbound_size: AtomicUsize::new(config.max_inbound_size),
            listeners: ListenerRegistry::new(),
            drain_gate: Mutex::new(()),
        })
    }

    /// Package identifier of this process.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub(crate) fn ensure_authorized(&self) -> Result<(), BusError> {
        if self.credential.is_valid() {
            Ok(())
        } else {
            Err(BusError::Unauthorized)
        }
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("identity", &self.identity)
            .field("queued", &self.outbound.lock().len())
            .field("received", &self.inbound.lock().len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
