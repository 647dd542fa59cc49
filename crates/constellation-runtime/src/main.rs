//! # Constellation Node
//!
//! Runs one Constellation process.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration from the environment
//! 3. Initialize the constellation on an in-process hub
//! 4. Wait for the first reconciliation and log the roster
//! 5. Run until Ctrl-C

use anyhow::{Context, Result};
use cn_01_message_bus::BroadcastHub;
use constellation_runtime::{ConstellationBuilder, ConstellationConfig, HostContext};
use constellation_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = ConstellationConfig::from_env().context("Failed to load configuration")?;
    info!(?config, "Configuration loaded");

    let context = HostContext::new();
    let hub = BroadcastHub::new();
    let constellation = ConstellationBuilder::new(config)
        .hub(&hub)
        .initialize(&context)
        .context("Failed to initialize constellation")?;

    match constellation.wait_initial_sync().await {
        Some(outcome) if outcome.has_roster() => {
            info!(%outcome, "Initial reconciliation finished");
        }
        Some(outcome) => warn!(%outcome, "Initial reconciliation left no roster"),
        None => warn!("Initial reconciliation did not complete"),
    }

    if let Some(mother) = constellation.mother() {
        info!(package = %mother.package, version = %mother.version, "Mother application");
    }
    for module in constellation.modules() {
        info!(
            package = %module.package,
            name = %module.name,
            version = %module.version,
            "Sibling module"
        );
    }

    info!(package = %constellation.identity(), "Node running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!(
        sent = constellation.total_sent(),
        received = constellation.total_received(),
        "Shutting down"
    );
    Ok(())
}
