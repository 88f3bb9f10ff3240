//! # Metrics Worker
//!
//! Consumes `distinctName` tasks from the configured queue adapter and records
//! each metric as a sequenced, time-indexed event in Redis.

use anyhow::{Context, Result};
use metrics_worker::bootstrap;
use metrics_worker::cli::Cli;
use metrics_worker::config::ConfigLoader;
use metrics_worker::logging;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init_tracing();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load().context("failed to load configuration")?;
    config.apply_overrides(cli.overrides());

    info!(
        adapter = %config.adapter.name,
        concurrency = config.processor.concurrency,
        wait_timeout_ms = config.processor.wait_timeout_ms,
        "🔄 Worker starting... Press Ctrl+C to shutdown gracefully"
    );

    let stats = bootstrap::run(config, shutdown_signal()).await?;

    info!(
        received = stats.received,
        succeeded = stats.succeeded,
        failed = stats.failed,
        unregistered = stats.unregistered,
        "✅ Worker shutdown complete"
    );
    Ok(())
}

async fn shutdown_signal() {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Received Ctrl+C, initiating graceful shutdown...");
        }
        result = wait_for_sigterm() => {
            match result {
                Ok(_) => info!("🛑 Received SIGTERM, initiating graceful shutdown..."),
                Err(e) => {
                    warn!("⚠️  Error setting up SIGTERM handler: {}", e);
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
    }
}

/// Wait for SIGTERM signal (for container deployments)
#[cfg(unix)]
async fn wait_for_sigterm() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_sigterm() -> Result<()> {
    std::future::pending::<()>().await;
    Ok(())
}
