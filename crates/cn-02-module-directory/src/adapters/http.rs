//! reqwest-backed directory fetcher.

use crate::domain::{DirectoryConfig, FetchError};
use crate::ports::{DirectoryFetcher, DirectoryRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// POSTs `package` and `data_coded` as a form and returns the body of a 200
/// reply.
#[derive(Debug, Clone)]
pub struct HttpDirectoryFetcher {
    client: Client,
    endpoint: String,
}

impl HttpDirectoryFetcher {
    /// Build a client with the configured timeouts.
    pub fn new(config: &DirectoryConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DirectoryFetcher for HttpDirectoryFetcher {
    async fn fetch(&self, request: &DirectoryRequest) -> Result<String, FetchError> {
        debug!(endpoint = %self.endpoint, package = %request.package, "Requesting module roster");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("package", request.package.as_str()),
                ("data_coded", request.data_coded.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }
}
