//! Supervised RPC Daemon - Main Entry Point
//!
//! Serves the demo `echo.v1` service through a supervised JSON-RPC server.

mod config;
mod echo;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use supervised_api_rpc::SupervisedRpcServer;
use supervised_core::{ServerOptions, TracingLogger};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("supervised=info"))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration & initialize logging
    let config = DaemonConfig::from_env();
    init_logging(config.log_format)?;

    info!("Supervised RPC daemon v{} starting...", VERSION);

    // 2. Build the supervised server
    let options = ServerOptions::new(config.rpc.clone())
        .with_logger(Arc::new(TracingLogger))
        .with_format_error(echo::redact_internal);
    let mut server = SupervisedRpcServer::new(Some(options));

    // 3. Register services
    server
        .add_service(&echo::descriptor(), &echo::implementation())
        .context("Failed to register echo service")?;

    // 4. Start JSON-RPC transport
    let (handle, addr) = server
        .into_base()
        .start()
        .await
        .context("RPC server start failed")?;

    info!(addr = %addr, "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
