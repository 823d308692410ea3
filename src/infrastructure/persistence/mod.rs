//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries. Every statement runs under the configured per-call timeout.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgSequenceRepository`] - Atomic counters
//! - [`PgSettingsRepository`] - The policy row

pub mod pg_link_repository;
pub mod pg_sequence_repository;
pub mod pg_settings_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_sequence_repository::PgSequenceRepository;
pub use pg_settings_repository::PgSettingsRepository;

use crate::error::AppError;
use std::future::Future;
use std::time::Duration;

/// Runs a query future under `limit`, mapping errors and timeouts to [`AppError`].
async fn bounded<T, F>(op: &'static str, limit: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            tracing::warn!(op, timeout_ms = limit.as_millis() as u64, "Database call timed out");
            Err(AppError::system(format!("{} timed out", op)))
        }
    }
}
