//! Test doubles for the directory ports.
//!
//! Enable with the `test-utils` feature flag.

use crate::domain::FetchError;
use crate::ports::{DirectoryFetcher, DirectoryRequest, ModuleListener};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::ModuleRecord;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;

/// Fetcher that plays back queued replies in order and records requests.
/// Once the script runs out every fetch fails.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    replies: Mutex<VecDeque<Result<String, FetchError>>>,
    requests: Mutex<Vec<DirectoryRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher whose first call returns `body`.
    pub fn replying(body: impl Into<String>) -> Self {
        let fetcher = Self::new();
        fetcher.push_body(body);
        fetcher
    }

    /// Fetcher whose first call fails with `error`.
    pub fn failing(error: FetchError) -> Self {
        let fetcher = Self::new();
        fetcher.push(Err(error));
        fetcher
    }

    pub fn push(&self, reply: Result<String, FetchError>) {
        self.replies.lock().push_back(reply);
    }

    pub fn push_body(&self, body: impl Into<String>) {
        self.push(Ok(body.into()));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<DirectoryRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DirectoryFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &DirectoryRequest) -> Result<String, FetchError> {
        self.requests.lock().push(request.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Http("no scripted reply".into())))
    }
}

/// Fetcher that parks inside `fetch` until released, for overlapping-run
/// tests.
#[derive(Debug)]
pub struct GatedFetcher {
    body: String,
    entered: Notify,
    release: Notify,
}

impl GatedFetcher {
    pub fn new(body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            body: body.into(),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    /// Wait until a fetch is parked.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Let the parked fetch return.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl DirectoryFetcher for GatedFetcher {
    async fn fetch(&self, _request: &DirectoryRequest) -> Result<String, FetchError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.body.clone())
    }
}

/// Listener that keeps every delivery.
#[derive(Debug, Default)]
pub struct CollectingModuleListener {
    deliveries: Mutex<Vec<Vec<ModuleRecord>>>,
}

impl CollectingModuleListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deliveries(&self) -> Vec<Vec<ModuleRecord>> {
        self.deliveries.lock().clone()
    }

    /// Packages of the most recent delivery.
    pub fn last_packages(&self) -> Option<Vec<String>> {
        self.deliveries
            .lock()
            .last()
            .map(|modules| modules.iter().map(|m| m.package.clone()).collect())
    }
}

impl ModuleListener for CollectingModuleListener {
    fn on_modules(&self, modules: &[ModuleRecord]) {
        self.deliveries.lock().push(modules.to_vec());
    }
}
