//! # Topology Runtime
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging and metrics
//! 2. Resolve store settings from the environment
//! 3. Probe the store, open the backend, decode `/GlobalEnv/` (fatal on failure)
//! 4. Build the immutable service context
//! 5. Resolve every declared topic and print the bus configuration
//! 6. Watch `/<AppName>/` until Ctrl+C

use anyhow::{Context, Result};
use tracing::{info, warn};

use bus_telemetry::{init_telemetry, TelemetryConfig, STORE_CONNECT_DURATION};
use config_store::{
    EnvSnapshot, EtcdConnector, StoreClient, StoreError, StoreSettings, TcpReachabilityProbe,
};
use topology_runtime::TopologyRuntime;

fn connect(settings: StoreSettings) -> Result<StoreClient, StoreError> {
    StoreClient::connect(settings, &TcpReachabilityProbe, &EtcdConnector)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let env = EnvSnapshot::from_process();
    let settings = StoreSettings::from_env(&env).context("Invalid store settings")?;
    info!(endpoint = %settings.endpoint, "Connecting to config store");

    let client = tokio::task::spawn_blocking(move || {
        let _timer = STORE_CONNECT_DURATION.start_timer();
        connect(settings)
    })
    .await
    .context("Store connect task failed")?
    .context("Config store is not usable")?;

    let runtime = tokio::task::spawn_blocking(move || {
        let runtime = TopologyRuntime::new(client, &env);
        let report = runtime.resolve_all();
        (runtime, report)
    })
    .await
    .context("Topology resolution task failed")?;
    let (runtime, report) = runtime;

    for slot in report.missing() {
        warn!(slot = %slot, "No bus configuration resolved");
    }
    let rendered =
        serde_json::to_string_pretty(&report).context("Failed to render topology report")?;
    println!("{rendered}");

    let runtime = tokio::task::spawn_blocking(move || {
        runtime.watch_app_config(|_, _| {}).map(|()| runtime)
    })
    .await
    .context("Watch registration task failed")?
    .context("Failed to watch application configuration")?;

    info!("Topology runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    tokio::task::spawn_blocking(move || drop(runtime))
        .await
        .context("Shutdown task failed")?;

    match bus_telemetry::encode_metrics() {
        Ok(metrics) => info!(bytes = metrics.len(), "Final metrics snapshot encoded"),
        Err(e) => warn!(error = %e, "Failed to encode metrics"),
    }
    Ok(())
}
