//! # Core Domain Entities
//!
//! Defines the entities exchanged between sibling applications.
//!
//! ## Clusters
//!
//! - **Messaging**: `Message`, `Recipient`, `Payload`, `PayloadValue`
//! - **Directory**: `ModuleRecord`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// CLUSTER A: MESSAGING
// =============================================================================

/// Caller-supplied message tag. Not guaranteed unique.
pub type MessageId = i64;

/// Typed key/value bundle carried by a message.
///
/// Keys are ordered so that serialized payloads are stable.
pub type Payload = BTreeMap<String, PayloadValue>;

/// A single payload value.
///
/// The set of kinds is closed so that every payload survives the wire
/// round-trip through the transport unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Nested mapping.
    Map(Payload),
}

impl PayloadValue {
    /// Borrow the value as text, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a float. Integers are widened.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrow the value as a nested mapping, if it is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&Payload> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for PayloadValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Payload> for PayloadValue {
    fn from(value: Payload) -> Self {
        Self::Map(value)
    }
}

/// Destination of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    /// Accepted by every process.
    Broadcast,
    /// Accepted only by the process whose package identifier matches.
    Package(String),
}

impl Recipient {
    /// Address a single package.
    pub fn package(identifier: impl Into<String>) -> Self {
        Self::Package(identifier.into())
    }

    /// Whether this is the broadcast sentinel.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Self::Broadcast)
    }

    /// Whether a process identified by `local_identity` should accept a
    /// message addressed to this recipient. Package matching ignores case.
    #[must_use]
    pub fn accepts(&self, local_identity: &str) -> bool {
        match self {
            Self::Broadcast => true,
            Self::Package(id) => id.eq_ignore_ascii_case(local_identity),
        }
    }

    /// The package identifier, or `None` for broadcast.
    #[must_use]
    pub fn as_package(&self) -> Option<&str> {
        match self {
            Self::Broadcast => None,
            Self::Package(id) => Some(id),
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Broadcast => write!(f, "*"),
            Self::Package(id) => write!(f, "{id}"),
        }
    }
}

/// A tagged message exchanged between sibling applications.
///
/// The `delivered` flag is the only mutable part: it flips to `true` the
/// first time fan-out hands the message to a live listener and never
/// reverts. Histories hold messages behind `Arc`, so the flag is atomic.
#[derive(Debug)]
pub struct Message {
    id: MessageId,
    sender: String,
    receiver: Recipient,
    payload: Payload,
    delivered: AtomicBool,
}

impl Message {
    /// Create an undelivered message.
    pub fn new(
        id: MessageId,
        sender: impl Into<String>,
        receiver: Recipient,
        payload: Payload,
    ) -> Self {
        Self {
            id,
            sender: sender.into(),
            receiver,
            payload,
            delivered: AtomicBool::new(false),
        }
    }

    /// The caller-supplied tag.
    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Package identifier of the sending application.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Destination of the message.
    #[must_use]
    pub fn receiver(&self) -> &Recipient {
        &self.receiver
    }

    /// The payload bundle.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Look up a single payload entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.payload.get(key)
    }

    /// Whether fan-out has reached at least one live listener.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.delivered.load(Ordering::Acquire)
    }

    /// Mark the message delivered. Idempotent.
    pub fn mark_delivered(&self) {
        self.delivered.store(true, Ordering::Release);
    }
}

impl Clone for Message {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            payload: self.payload.clone(),
            delivered: AtomicBool::new(self.is_delivered()),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "message id={} sender={} receiver={} entries={}",
            self.id,
            self.sender,
            self.receiver,
            self.payload.len()
        )
    }
}

// =============================================================================
// CLUSTER B: DIRECTORY
// =============================================================================

/// A module advertised by the directory service.
///
/// `package` is the natural key. At most one record per roster carries
/// `is_mother`, designating the parent application of the constellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Package identifier (natural key).
    pub package: String,
    /// Human-readable name.
    pub name: String,
    /// Advertised version string.
    pub version: String,
    /// Entry point used by filtered module-list listeners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<String>,
    /// Icon or banner location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether this record is the parent application.
    #[serde(default)]
    pub is_mother: bool,
}

impl ModuleRecord {
    /// Create a plain child record.
    pub fn new(
        package: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            version: version.into(),
            entry_point: None,
            image_url: None,
            is_mother: false,
        }
    }

    /// Set the entry point.
    #[must_use]
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = Some(entry_point.into());
        self
    }

    /// Set the image location.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Flag this record as the parent application.
    #[must_use]
    pub fn into_mother(mut self) -> Self {
        self.is_mother = true;
        self
    }

    /// Whether the entry point equals `filter`. Records without an entry
    /// point never match.
    #[must_use]
    pub fn matches_entry_point(&self, filter: &str) -> bool {
        self.entry_point.as_deref() == Some(filter)
    }
}

impl fmt::Display for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} v{})", self.package, self.name, self.version)?;
        if let Some(entry_point) = &self.entry_point {
            write!(f, " entry={entry_point}")?;
        }
        if self.is_mother {
            write!(f, " [mother]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_matching_ignores_case() {
        let recipient = Recipient::package("com.Example.App");
        assert!(recipient.accepts("com.example.app"));
        assert!(!recipient.accepts("com.example.other"));
        assert!(Recipient::Broadcast.accepts("anything"));
    }

    #[test]
    fn test_delivered_flag_is_sticky() {
        let message = Message::new(7, "a", Recipient::Broadcast, Payload::new());
        assert!(!message.is_delivered());
        message.mark_delivered();
        message.mark_delivered();
        assert!(message.is_delivered());
        assert!(message.clone().is_delivered());
    }

    #[test]
    fn test_payload_value_json_kinds() {
        let mut nested = Payload::new();
        nested.insert("depth".into(), 2.into());

        let mut payload = Payload::new();
        payload.insert("flag".into(), true.into());
        payload.insert("count".into(), 3.into());
        payload.insert("ratio".into(), 0.5.into());
        payload.insert("label".into(), "hello".into());
        payload.insert("inner".into(), nested.clone().into());

        let json = serde_json::to_string(&payload).unwrap();
        let decoded: Payload = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.get("count").and_then(PayloadValue::as_i64), Some(3));
        assert_eq!(decoded.get("ratio").and_then(PayloadValue::as_f64), Some(0.5));
        assert_eq!(decoded.get("flag").and_then(PayloadValue::as_bool), Some(true));
        assert_eq!(decoded.get("label").and_then(PayloadValue::as_str), Some("hello"));
        assert_eq!(decoded.get("inner").and_then(PayloadValue::as_map), Some(&nested));
    }

    #[test]
    fn test_entry_point_matching() {
        let record = ModuleRecord::new("com.example.a", "A", "1.0").with_entry_point("main");
        assert!(record.matches_entry_point("main"));
        assert!(!record.matches_entry_point("settings"));
        assert!(!ModuleRecord::new("b", "B", "1").matches_entry_point("main"));
    }
}
