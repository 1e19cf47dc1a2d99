//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, worker spawning, and the Axum server lifecycle.

use crate::application::services::{LinkService, RedirectService};
use crate::config::{Config, StorageBackend};
use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::{IdentitySource, LinkRepository};
use crate::infrastructure::persistence::{
    InMemoryLinkRepository, PgIdentitySource, PgLinkRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Storage handles for the selected backend.
pub struct Storage {
    pub link_repository: Arc<dyn LinkRepository>,
    pub identity_source: Arc<dyn IdentitySource>,
}

/// Opens the configured storage backend.
///
/// For PostgreSQL this connects the pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn open_storage(config: &Config) -> Result<Storage> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply database migrations")?;
            tracing::info!("Migrations applied");

            let pool = Arc::new(pool);
            Ok(Storage {
                link_repository: Arc::new(PgLinkRepository::new(pool.clone())),
                identity_source: Arc::new(PgIdentitySource::new(pool)),
            })
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; links are lost on restart");
            let memory = Arc::new(InMemoryLinkRepository::new());
            Ok(Storage {
                link_repository: memory.clone(),
                identity_source: memory,
            })
        }
    }
}

/// Builds a PostgreSQL pool from the `DB_*` pool settings.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL with migrations, or in-memory)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the click queue is closed and the worker is awaited, so
/// clicks already queued are recorded before the process exits.
///
/// # Errors
///
/// Returns an error if:
/// - Storage initialization fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let storage = open_storage(&config).await?;

    let (click_tx, click_rx) = mpsc::channel::<ClickEvent>(config.click_queue_capacity);

    let worker = tokio::spawn(run_click_worker(
        click_rx,
        storage.link_repository.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let link_service = Arc::new(LinkService::new(
        storage.link_repository.clone(),
        storage.identity_source,
        config.base_url.clone(),
    ));
    let redirect_service = Arc::new(RedirectService::new(storage.link_repository, click_tx));
    let state = AppState::new(link_service, redirect_service);

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it every click sender) is gone once serve returns.
    tracing::info!("Server stopped, draining click queue");
    if let Err(e) = worker.await {
        tracing::error!(error = %e, "Click worker terminated abnormally");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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

    tracing::info!("Shutdown signal received");
}
