//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::bounded;
use crate::config::StoreTimeouts;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "code, target, created_at, expires_at, disabled, custom_alias, owner_id";

#[derive(sqlx::FromRow)]
struct LinkRow {
    code: String,
    target: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    disabled: bool,
    custom_alias: Option<String>,
    owner_id: Option<i64>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Self {
            code: row.code,
            target: row.target,
            created_at: row.created_at,
            expires_at: row.expires_at,
            disabled: row.disabled,
            custom_alias: row.custom_alias,
            owner_id: row.owner_id,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Uniqueness of `code` and `custom_alias` is enforced by the
/// `links_code_key` constraint and the partial `links_custom_alias_key` index;
/// violations surface as [`AppError::Conflict`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    timeouts: StoreTimeouts,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            INSERT INTO links (code, target, created_at, expires_at, disabled, custom_alias)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = bounded(
            "insert link",
            self.timeouts.write,
            sqlx::query_as::<_, LinkRow>(&sql)
                .bind(&new_link.code)
                .bind(&new_link.target)
                .bind(new_link.created_at)
                .bind(new_link.expires_at)
                .bind(new_link.custom_alias.as_deref())
                .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1");

        let row = bounded(
            "find link by code",
            self.timeouts.read,
            sqlx::query_as::<_, LinkRow>(&sql)
                .bind(code)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_live_by_target(&self, target: &str) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links
            WHERE target = $1
              AND NOT disabled
              AND (expires_at IS NULL OR expires_at > NOW())
            ORDER BY created_at DESC
            LIMIT 1
            "#
        );

        let row = bounded(
            "find link by target",
            self.timeouts.read,
            sqlx::query_as::<_, LinkRow>(&sql)
                .bind(target)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(Link::from))
    }

    async fn set_disabled(&self, code: &str, disabled: bool) -> Result<bool, AppError> {
        let result = bounded(
            "set link disabled",
            self.timeouts.write,
            sqlx::query("UPDATE links SET disabled = $2 WHERE code = $1")
                .bind(code)
                .bind(disabled)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = bounded(
            "purge expired links",
            self.timeouts.write,
            sqlx::query("DELETE FROM links WHERE expires_at IS NOT NULL AND expires_at <= $1")
                .bind(now)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        bounded(
            "health check",
            self.timeouts.read,
            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }
}
