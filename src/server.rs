//! HTTP server initialization and runtime setup.
//!
//! Builds the link store, loads the registry and runs the Axum server until
//! Ctrl-C or SIGTERM.

use crate::application::services::LinkRegistry;
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::LinkStore;
use crate::infrastructure::persistence::{InMemoryStore, JsonFileStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomHexGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Creates the link store selected by the configuration.
pub fn build_store(config: &Config) -> Arc<dyn LinkStore> {
    match config.storage_backend {
        StorageBackend::File => Arc::new(JsonFileStore::new(
            config.links_file.clone(),
            config.public_base_url.clone(),
        )),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, links will not survive a restart");
            Arc::new(InMemoryStore::new())
        }
    }
}

/// Loads the registry from the configured store.
pub async fn open_registry(config: &Config) -> LinkRegistry {
    LinkRegistry::open(
        build_store(config),
        Box::new(RandomHexGenerator::default()),
        config.registry_options(),
    )
    .await
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let registry = Arc::new(open_registry(&config).await);
    let state = AppState::new(registry, config.public_base_url.clone());

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
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

    tracing::info!("Shutdown signal received");
}
