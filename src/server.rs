//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::config::Config;
use crate::domain::visit_worker::{AnalyticsRecorder, run_visit_worker};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::open_repository;
use crate::routes::app_router;
use crate::state::{AppSettings, AppState};
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Time allowed for queued visits to be written after the listener stops.
const VISIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (SQLite or PostgreSQL) with migrations
/// - Redis cache (or NullCache fallback)
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the listener stops accepting connections, in-flight requests
/// finish, and the visit worker drains its queue before this function returns.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = open_repository(&config).await?;
    let cache = connect_cache(&config).await;

    let (recorder, visit_rx) = AnalyticsRecorder::channel(config.visit_queue_capacity);
    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        Arc::clone(&repository),
        config.visit_worker_concurrency,
    ));

    let state = AppState::new(
        repository,
        Arc::new(RandomCodeGenerator::new(config.code_length)),
        cache,
        recorder,
        AppSettings::from(&config),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped, draining visit queue");

    match tokio::time::timeout(VISIT_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => tracing::info!("Visit queue drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Visit worker panicked"),
        Err(_) => tracing::warn!(
            "Visit queue not drained after {}s, remaining visits are lost",
            VISIT_DRAIN_TIMEOUT.as_secs()
        ),
    }

    Ok(())
}

/// Connects to Redis when configured, falling back to [`NullCache`].
async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
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
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
