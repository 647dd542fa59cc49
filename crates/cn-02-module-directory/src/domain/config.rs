//! Directory configuration.

use std::time::Duration;

/// Default directory endpoint.
pub const DEFAULT_DIRECTORY_URL: &str = "http://127.0.0.1:8080/applications/0.json";

/// JSON key whose presence marks the reply as a credential rejection.
pub const DEFAULT_ERROR_FIELD: &str = "acas_error";

/// Settings for the remote directory and how its replies are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// URL the roster request is POSTed to.
    pub endpoint: String,
    /// Whole-request timeout. Bounds how long a stuck fetch holds the sync slot.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Reply key signalling an invalid credential.
    pub error_field: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DIRECTORY_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            error_field: DEFAULT_ERROR_FIELD.to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Default settings pointed at `endpoint`.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}
