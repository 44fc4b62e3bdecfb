// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Process lifecycle: startup, serving and ordered shutdown
//!
//! Shutdown order: polling loops stop first, then the session is logged
//! out, while the HTTP server drains within `SERVER_SHUTDOWN_GRACE`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::api::{AppState, create_router};
use crate::collector::start_collection;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fritzbox::FritzBoxClient;
use crate::metrics::MetricsRegistry;

/// Time the HTTP server gets to finish in-flight scrapes
pub const SERVER_SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

/// Runs the exporter until a termination signal arrives
///
/// # Errors
///
/// Returns an error if the router client cannot be built, the listen address
/// is invalid or cannot be bound, or the HTTP server fails.
pub async fn run(config: Config) -> Result<()> {
    let client = Arc::new(FritzBoxClient::new(&config.fritzbox)?);

    let addr: SocketAddr = config.listen_addr.parse().map_err(|e| {
        tracing::error!("Invalid listen address '{}': {}", config.listen_addr, e);
        e
    })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind address {}: {}", addr, e);
        e
    })?;

    tracing::info!("FRITZ!Box exporter starting on {}", addr);
    tracing::info!("Monitoring FRITZ!Box at {}", config.fritzbox.base_url);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET /health  - Health check");
    tracing::info!("  - GET /metrics - Prometheus metrics");

    let (shutdown_tx, _) = watch::channel(false);
    spawn_signal_handler(shutdown_tx.clone());

    serve(listener, config, client, MetricsRegistry::new(), shutdown_tx).await
}

/// Serves metrics and polls the router until `shutdown_tx` is set
///
/// The server task ending for any reason also triggers shutdown.
///
/// # Errors
///
/// Returns the HTTP server error, if any.
pub async fn serve(
    listener: TcpListener,
    config: Config,
    client: Arc<FritzBoxClient>,
    metrics: MetricsRegistry,
    shutdown_tx: watch::Sender<bool>,
) -> Result<()> {
    let collection = start_collection(
        shutdown_tx.subscribe(),
        client.clone(),
        metrics.clone(),
        config.device_monitoring_interval,
        config.network_monitoring_interval,
    );

    let app = create_router(Arc::new(AppState { metrics }));
    let mut server_shutdown = shutdown_tx.subscribe();
    let server_tx = shutdown_tx.clone();
    let mut server = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.wait_for(|&stop| stop).await;
                tracing::info!("HTTP server shutting down");
            })
            .await;
        if let Err(e) = &result {
            tracing::error!("Server error: {}", e);
        }
        server_tx.send_replace(true);
        result
    });

    let stop_polling = async {
        collection.join().await;
        match client.close().await {
            Ok(()) => tracing::info!("Closed FRITZ!Box session"),
            Err(e) => tracing::error!("Failed to log out from FRITZ!Box: {}", e),
        }
    };

    let mut shutdown_rx = shutdown_tx.subscribe();
    let stop_server = async {
        let _ = shutdown_rx.wait_for(|&stop| stop).await;
        match tokio::time::timeout(SERVER_SHUTDOWN_GRACE, &mut server).await {
            Ok(Ok(result)) => result.map_err(AppError::from),
            Ok(Err(e)) => {
                tracing::error!("HTTP server task failed: {}", e);
                Ok(())
            }
            Err(_) => {
                tracing::error!(
                    "HTTP server did not stop within {}s, aborting",
                    SERVER_SHUTDOWN_GRACE.as_secs()
                );
                server.abort();
                Ok(())
            }
        }
    };

    let ((), server_result) = tokio::join!(stop_polling, stop_server);
    tracing::info!("Shutdown complete");
    server_result
}

/// Sets the shutdown flag on SIGINT, SIGTERM or SIGQUIT
fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(signal) => {
                tracing::info!("Received {}, shutting down", signal);
                shutdown_tx.send_replace(true);
            }
            Err(e) => tracing::error!("Failed to listen for shutdown signals: {}", e),
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
        _ = quit.recv() => Ok("SIGQUIT"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl+C")
}
