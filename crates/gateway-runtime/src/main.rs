//! # Consent Gateway
//!
//! Reads newline-delimited JSON events from stdin and runs each one through
//! the audit and consent pipeline. Stops on Ctrl+C or end of input.

use anyhow::{Context, Result};
use gateway_runtime::adapters::{JsonLinesSource, LoggingHandlers, LoggingPrompt};
use gateway_runtime::{GatewayConfig, GatewayRuntime};
use gateway_telemetry::{init_telemetry, TelemetryConfig};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = GatewayConfig::load().context("Failed to load configuration")?;
    let prompt = Arc::new(LoggingPrompt::new(config.pipeline.consent_action.clone()));

    let runtime = Arc::new(GatewayRuntime::new(config));
    let gateway = runtime.start(Arc::new(LoggingHandlers), prompt).await?;

    let signal_runtime = Arc::clone(&runtime);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal_runtime.request_shutdown(),
            Err(e) => warn!("Cannot listen for Ctrl+C: {}", e),
        }
    });

    info!("Gateway is running. Reading events from stdin, Ctrl+C to stop.");
    let accepted = runtime.serve(&gateway, JsonLinesSource::stdin()).await;
    info!(accepted, "Event intake stopped");

    let report = runtime.shutdown(gateway).await;
    if !report.drained {
        warn!("Some events did not finish before the drain deadline");
    }

    Ok(())
}
