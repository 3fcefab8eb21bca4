//! Artifact Webhook Server.
//!
//! This binary:
//! - Receives artifact upload webhooks
//! - Verifies the `X-Hub-Signature` HMAC
//! - Writes `project_id → data` to EdgeKV
//!
//! Without `EDGEKV_URL` records are kept in process memory.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use artifact_hook::{router, AppState, Config, EdgeKvClient, KvStore, MemoryKvStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        webhook_path = %config.webhook_path,
        max_body_bytes = config.max_body_bytes,
        edgekv_configured = config.edgekv_url.is_some(),
        edgekv_namespace = %config.edgekv_namespace,
        edgekv_group = %config.edgekv_group,
        "config_loaded"
    );

    let store = build_store(&config)?;

    // Create application state
    let state = AppState::new(config.clone(), store);
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Select the key-value store from configuration.
fn build_store(config: &Config) -> Result<Arc<dyn KvStore>> {
    match &config.edgekv_url {
        Some(url) => {
            let client = EdgeKvClient::new(
                url,
                config.edgekv_namespace.clone(),
                config.edgekv_group.clone(),
                config.edgekv_token.clone(),
                Duration::from_millis(config.edgekv_timeout_ms),
            )
            .context("Failed to create EdgeKV client")?;
            if !client.has_token() {
                warn!("edgekv_token_not_configured");
            }
            info!(
                namespace = %client.namespace(),
                group = %client.group(),
                token_configured = client.has_token(),
                "edgekv_client_created"
            );
            Ok(Arc::new(client))
        }
        None => {
            warn!("edgekv_not_configured_using_memory_store");
            Ok(Arc::new(MemoryKvStore::new()))
        }
    }
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
