mod bootstrap;
mod health;
pub mod quotes;

use std::time::Duration;

use anyhow::Result;
use linequote_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use linequote_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    // Now bootstrap using the same config we already loaded
    let app = bootstrap::bootstrap_with_config(config).await?;

    let router = quotes::router(app.db_pool.clone()).merge(health::router(app.db_pool.clone()));

    let bind_address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %bind_address,
        "linequote-server started"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async {
        shutdown_rx.await.ok();
    });
    let server_task = tokio::spawn(async move { server.await });

    tokio::signal::ctrl_c().await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "linequote-server stopping"
    );

    let _ = shutdown_tx.send(());
    let drain_window = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    match tokio::time::timeout(drain_window, server_task).await {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!(
                event_name = "system.server.drain_timeout",
                correlation_id = "shutdown",
                timeout_secs = app.config.server.graceful_shutdown_secs,
                "in-flight requests did not drain in time, exiting anyway"
            );
        }
    }

    Ok(())
}
