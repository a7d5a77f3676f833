//! lrukv - An in-memory key-value cache server
//!
//! Serves the text protocol over TCP and a small admin HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lrukv::{api::create_router, AppState, Cache, Config, Server};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and start its expiry reaper
/// 4. Bind the TCP protocol listener and the admin HTTP server
/// 5. Serve until SIGINT/SIGTERM
/// 6. Stop accepting, drain connections, then stop and join the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lrukv=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting lrukv cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, port={}, admin_port={}, reaper_interval={:?}, max_connections={}",
        config.capacity,
        config.server_port,
        config.admin_port,
        config.reaper_interval,
        config.max_connections
    );

    let cache = Arc::new(Cache::with_reaper(config.capacity, config.reaper_interval));
    let shutdown = CancellationToken::new();

    let server = Server::from_config(&config, Arc::clone(&cache))
        .await
        .context("failed to start protocol listener")?;
    let server_task = tokio::spawn(server.run(shutdown.clone()));

    let admin_task = if config.admin_enabled() {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.admin_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind admin port {}", addr))?;
        info!("Admin API listening on http://{}", addr);

        let app = create_router(AppState::new(Arc::clone(&cache)));
        let token = shutdown.clone();
        Some(tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await
        }))
    } else {
        None
    };

    shutdown_signal().await;
    shutdown.cancel();

    server_task
        .await
        .context("protocol server task failed")?
        .context("protocol server error")?;
    if let Some(admin_task) = admin_task {
        admin_task
            .await
            .context("admin server task failed")?
            .context("admin server error")?;
    }

    cache.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
