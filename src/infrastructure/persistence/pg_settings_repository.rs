//! PostgreSQL implementation of settings repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::bounded;
use crate::config::StoreTimeouts;
use crate::domain::entities::Policy;
use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;

/// The policy lives in the singleton row `settings.id = 1`.
pub struct PgSettingsRepository {
    pool: Arc<PgPool>,
    timeouts: StoreTimeouts,
}

impl PgSettingsRepository {
    pub fn new(pool: Arc<PgPool>, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn load_policy(&self) -> Result<Policy, AppError> {
        let row = bounded(
            "load policy",
            self.timeouts.read,
            sqlx::query_as::<_, (i32, i32)>(
                "SELECT ttl_hours, cache_ttl_minutes FROM settings WHERE id = 1",
            )
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row
            .map(|(ttl_hours, cache_ttl_minutes)| Policy::new(ttl_hours, cache_ttl_minutes))
            .unwrap_or_default())
    }

    async fn save_policy(&self, policy: Policy) -> Result<(), AppError> {
        bounded(
            "save policy",
            self.timeouts.write,
            sqlx::query(
                r#"
                INSERT INTO settings (id, ttl_hours, cache_ttl_minutes)
                VALUES (1, $1, $2)
                ON CONFLICT (id) DO UPDATE
                SET ttl_hours = EXCLUDED.ttl_hours,
                    cache_ttl_minutes = EXCLUDED.cache_ttl_minutes
                "#,
            )
            .bind(policy.ttl_hours)
            .bind(policy.cache_ttl_minutes)
            .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }
}
