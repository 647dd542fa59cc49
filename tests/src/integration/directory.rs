//! # Directory Reconciliation Flows
//!
//! The runtime facade against a real HTTP directory (httpmock) and a JSON
//! cache file on disk:
//!
//! 1. **Fresh start**: signed POST, roster published, cache written
//! 2. **Directory down**: a restarted process restores roster and mother
//!    from the cache file
//! 3. **Rejected signature**: the bus stays locked and the cache untouched

#[cfg(test)]
mod tests {
    use cn_02_module_directory::test_utils::CollectingModuleListener;
    use cn_02_module_directory::{JsonFileModuleStore, ModuleListener, ModuleStore, SyncOutcome};
    use constellation_runtime::{
        Constellation, ConstellationBuilder, ConstellationConfig, HostContext, StorageConfig,
    };
    use httpmock::prelude::*;
    use shared_types::{CredentialGuard, Payload, Sha1Credential};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    const PATH: &str = "/applications/0.json";
    const PACKAGE: &str = "com.example.app";
    const SECRET: &str = "integration-secret";

    const ROSTER: &str = r#"{
        "mother": {"name": "Launcher", "package": "com.example.launcher", "version": "5"},
        "children": [
            {"name": "Mail", "package": "com.example.mail", "version": "1.2", "entrypoint": "main"},
            {"name": "Maps", "package": "com.example.maps", "version": "0.9", "entrypoint": "widget",
             "image_url": "http://cdn.example/maps.png"}
        ]
    }"#;

    fn config(server: &MockServer, cache: &Path) -> ConstellationConfig {
        let mut config = ConstellationConfig::new(PACKAGE, SECRET);
        config.directory.endpoint = server.url(PATH);
        config.storage = StorageConfig {
            cache_path: Some(cache.to_path_buf()),
        };
        config
    }

    fn expected_signature() -> String {
        Sha1Credential::new(PACKAGE, SECRET).encoded_signature()
    }

    #[tokio::test]
    async fn test_fresh_start_publishes_roster_and_writes_cache() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("modules.json");
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .body_includes(format!("package={PACKAGE}"))
                    .body_includes(format!("data_coded={}", expected_signature()));
                then.status(200).body(ROSTER);
            })
            .await;

        let context = HostContext::new();
        let constellation = Constellation::initialize(&context, config(&server, &cache)).unwrap();

        assert_eq!(constellation.wait_initial_sync().await, Some(SyncOutcome::Ok));
        mock.assert_async().await;
        assert!(constellation.is_credential_valid());

        let mother = constellation.mother().unwrap();
        assert_eq!(mother.package, "com.example.launcher");
        assert!(mother.is_mother);

        let widgets = CollectingModuleListener::new();
        let handle: Arc<dyn ModuleListener> = widgets.clone();
        constellation.subscribe_modules(&handle, Some("widget"));
        assert_eq!(
            widgets.last_packages(),
            Some(vec!["com.example.maps".to_string()])
        );

        let cached = JsonFileModuleStore::open(&cache).unwrap().select_all().unwrap();
        let packages: Vec<_> = cached.iter().map(|r| r.package.as_str()).collect();
        assert_eq!(
            packages,
            vec!["com.example.launcher", "com.example.mail", "com.example.maps"]
        );

        constellation
            .send(1, "com.example.mail", Payload::new())
            .unwrap();
        assert_eq!(constellation.total_sent(), 1);
    }

    #[tokio::test]
    async fn test_restart_with_directory_down_uses_cache() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("modules.json");

        {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path(PATH);
                    then.status(200).body(ROSTER);
                })
                .await;
            let context = HostContext::new();
            let first = Constellation::initialize(&context, config(&server, &cache)).unwrap();
            assert_eq!(first.wait_initial_sync().await, Some(SyncOutcome::Ok));
        }

        let server = MockServer::start_async().await;
        let outage = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(503).body("maintenance");
            })
            .await;

        let context = HostContext::new();
        let restarted = ConstellationBuilder::new(config(&server, &cache))
            .sync_on_start(false)
            .initialize(&context)
            .unwrap();

        let listener = CollectingModuleListener::new();
        let handle: Arc<dyn ModuleListener> = listener.clone();
        restarted.subscribe_modules(&handle, None);
        assert!(listener.deliveries().is_empty());

        assert_eq!(restarted.reconcile_directory().await, SyncOutcome::OkFromCache);
        outage.assert_async().await;

        assert!(restarted.is_credential_valid());
        assert_eq!(
            restarted.mother().map(|m| m.package),
            Some("com.example.launcher".to_string())
        );
        assert_eq!(
            listener.last_packages(),
            Some(vec![
                "com.example.mail".to_string(),
                "com.example.maps".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_rejected_signature_leaves_cache_and_bus_locked() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("modules.json");
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200)
                    .body(r#"{"acas_error": "unknown package", "children": []}"#);
            })
            .await;

        let context = HostContext::new();
        let constellation = Constellation::initialize(&context, config(&server, &cache)).unwrap();

        assert_eq!(
            constellation.wait_initial_sync().await,
            Some(SyncOutcome::InvalidCredential)
        );
        assert!(!constellation.is_credential_valid());
        assert!(constellation.broadcast(1, Payload::new()).is_err());
        assert_eq!(constellation.stored_sent(), 1);
        assert!(!cache.exists());
    }
}
