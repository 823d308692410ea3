//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup and the Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::cache::{LinkCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{
    PgLinkRepository, PgSequenceRepository, PgSettingsRepository,
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

/// Creates the PostgreSQL pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Connects to Redis when configured.
///
/// Returns `None` when Redis is not configured or unreachable; callers then
/// run without a distributed cache.
pub async fn connect_cache(config: &Config) -> Option<Arc<RedisCache>> {
    let redis_url = config.redis_url.as_ref()?;

    match RedisCache::connect(redis_url, config.store_timeouts()).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Some(Arc::new(redis))
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            None
        }
    }
}

/// Builds the application state over PostgreSQL and an optional Redis cache.
pub fn build_state(config: &Config, pool: PgPool, redis: Option<Arc<RedisCache>>) -> AppState {
    let pool = Arc::new(pool);
    let timeouts = config.store_timeouts();

    let (cache, settings_cache): (Arc<dyn LinkCache>, Option<Arc<dyn LinkCache>>) = match redis {
        Some(redis) => {
            let cache: Arc<dyn LinkCache> = redis;
            (cache.clone(), Some(cache))
        }
        None => {
            tracing::info!("Cache disabled (NullCache)");
            (Arc::new(NullCache::new()), None)
        }
    };

    AppState::new(
        Arc::new(PgLinkRepository::new(pool.clone(), timeouts)),
        Arc::new(PgSequenceRepository::new(pool.clone(), timeouts)),
        Arc::new(PgSettingsRepository::new(pool, timeouts)),
        cache,
        settings_cache,
        &config.settings_cache_key,
        &config.base_url,
        config.sequence_salt,
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis cache (or NullCache fallback)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    let redis = connect_cache(&config).await;
    let state = build_state(&config, pool, redis);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
