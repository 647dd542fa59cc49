//! # Credential Guard
//!
//! The security boundary consumed by the message bus and the directory
//! synchronizer.
//!
//! ## Security Properties
//!
//! - **Signed Package Token**: the directory request carries the lowercase hex
//!   SHA-1 of `package + secret_key`; the secret itself never leaves the process
//! - **Validation Gate**: `send`/`broadcast` and inbound delivery are refused
//!   until a directory round-trip has validated the credential
//! - **Zeroized Secret**: the secret key is wiped from memory on drop

use sha1::{Digest, Sha1};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use zeroize::Zeroizing;

/// Security boundary shared by every component that needs to know whether
/// the local application is authorized to use the bus.
pub trait CredentialGuard: Send + Sync {
    /// Package identifier the credential was issued for.
    fn package_identifier(&self) -> &str;

    /// Whether the credential has been validated by the directory.
    fn is_valid(&self) -> bool;

    /// Record the result of the latest validation.
    fn set_valid(&self, valid: bool);

    /// Signed token sent to the directory alongside the package identifier.
    fn encoded_signature(&self) -> String;
}

/// Credential signed with SHA-1 over `package + secret_key`.
///
/// Starts out invalid: the first completed directory reconciliation decides
/// whether the application may use the bus.
pub struct Sha1Credential {
    package: String,
    secret_key: Zeroizing<String>,
    valid: AtomicBool,
}

impl Sha1Credential {
    /// Create an unvalidated credential.
    pub fn new(package: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            secret_key: Zeroizing::new(secret_key.into()),
            valid: AtomicBool::new(false),
        }
    }
}

impl CredentialGuard for Sha1Credential {
    fn package_identifier(&self) -> &str {
        &self.package
    }

    fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    fn set_valid(&self, valid: bool) {
        debug!(package = %self.package, valid, "Credential validation updated");
        self.valid.store(valid, Ordering::Release);
    }

    fn encoded_signature(&self) -> String {
        let mut hasher = Sha1::new();
        hasher.update(self.package.as_bytes());
        hasher.update(self.secret_key.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl fmt::Debug for Sha1Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha1Credential")
            .field("package", &self.package)
            .field("secret_key", &"<redacted>")
            .field("valid", &self.is_valid())
            .finish()
    }
}
