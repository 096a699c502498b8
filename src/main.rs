//! W-Chat realtime server
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use wchat_core::config::AppConfig;
use wchat_core::error::AppError;
use wchat_database::DatabasePool;
use wchat_realtime::server::RealtimeEngine;

#[tokio::main]
async fn main() {
    let env = std::env::var("WCHAT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting W-Chat realtime server v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database ─────────────────────────────────────────
    let (db, presence_repo) = DatabasePool::open(&config.database).await?;

    // ── Step 2: Realtime engine ──────────────────────────────────
    let engine = RealtimeEngine::new(config.realtime.clone(), Arc::new(presence_repo));

    // ── Step 3: HTTP server ──────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let app = wchat_api::build_router(wchat_api::AppState::new(config, engine.clone()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("W-Chat server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    // Stopping the engine closes every outbound queue, which ends the
    // WebSocket tasks so the server can drain. It returns once queued
    // presence writes are flushed, so the pool can close after it.
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown_engine = engine.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = signalled_tx.send(());
            if let Err(e) = shutdown_engine.shutdown().await {
                tracing::warn!(error = %e, "Realtime engine shutdown failed");
            }
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        Ok(()) = signalled_rx => {
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => {
                    result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
                }
                Err(_) => tracing::warn!(
                    grace_seconds = grace.as_secs(),
                    "Graceful shutdown timed out"
                ),
            }
        }
    }

    db.close().await;
    tracing::info!("W-Chat server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
