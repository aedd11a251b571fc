//! Nodebucket API server
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//! - `EMPLOYEE_SEED_PATH`: JSON array of employee documents to load at startup
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `nodebucket=debug`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3000`)

use std::env;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nodebucket::api::{AppState, create_router};
use nodebucket::infrastructure::{RepositoryConfig, RepositoryFactory};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nodebucket=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Nodebucket API");

    let config = match RepositoryConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "Invalid storage configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        storage_mode = ?config.storage_mode,
        seed_path = ?config.seed_path,
        "Repository configuration loaded"
    );

    let employee_repository = match RepositoryFactory::new(config).create().await {
        Ok(repository) => {
            tracing::info!("Employee store ready");
            repository
        }
        Err(error) => {
            tracing::error!(%error, "Employee store could not be prepared");
            std::process::exit(1);
        }
    };

    let router = create_router(AppState::new(employee_repository));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let address: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, %host, %port, "HOST/PORT do not form a socket address");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, %address, "Could not bind listener");
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!(%address, "Nodebucket listening"),
        Err(error) => tracing::warn!(%error, "Could not read local address"),
    }

    if let Err(error) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server stopped with an error");
        std::process::exit(1);
    }

    tracing::info!("Nodebucket stopped");
}

/// Completes on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Ctrl+C received, draining connections");
        }
        () = terminate => {
            tracing::info!("SIGTERM received, draining connections");
        }
    }
}
