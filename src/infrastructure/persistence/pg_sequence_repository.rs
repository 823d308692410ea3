//! PostgreSQL implementation of sequence repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::bounded;
use crate::config::StoreTimeouts;
use crate::domain::repositories::SequenceRepository;
use crate::error::AppError;

/// Counters stored in the `sequences` table.
///
/// A single upsert statement increments and returns the value, so the row
/// lock taken by PostgreSQL is the only serialization point across all
/// service instances.
pub struct PgSequenceRepository {
    pool: Arc<PgPool>,
    timeouts: StoreTimeouts,
}

impl PgSequenceRepository {
    pub fn new(pool: Arc<PgPool>, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }
}

#[async_trait]
impl SequenceRepository for PgSequenceRepository {
    async fn increment(&self, name: &str) -> Result<u64, AppError> {
        let value = bounded(
            "increment sequence",
            self.timeouts.write,
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO sequences (name, value)
                VALUES ($1, 1)
                ON CONFLICT (name) DO UPDATE SET value = sequences.value + 1
                RETURNING value
                "#,
            )
            .bind(name)
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        u64::try_from(value).map_err(|_| {
            AppError::system(format!("sequence '{name}' holds negative value {value}"))
        })
    }
}
