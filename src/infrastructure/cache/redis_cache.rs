//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, LinkCache};
use crate::config::StoreTimeouts;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

const CODE_PREFIX: &str = "c:";
const TARGET_PREFIX: &str = "u:";

/// Redis cache implementation.
///
/// Uses `ConnectionManager` for connection reuse and reconnects. Keys are
/// `c:<code>` for redirects and `u:<target>` for deduplication. Every call
/// is bounded by the configured read or write timeout; a timeout surfaces as
/// [`CacheError::Timeout`].
pub struct RedisCache {
    client: ConnectionManager,
    timeouts: StoreTimeouts,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `timeouts` - per-call limits for reads and writes
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, timeouts: StoreTimeouts) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            timeouts,
        })
    }

    fn code_key(code: &str) -> String {
        format!("{}{}", CODE_PREFIX, code)
    }

    fn target_key(target: &str) -> String {
        format!("{}{}", TARGET_PREFIX, target)
    }

    async fn bounded<T, F>(op: &'static str, limit: Duration, fut: F) -> CacheResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(limit, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(op, error = %e, "Redis command failed");
                Err(CacheError::OperationError(format!("{}: {}", op, e)))
            }
            Err(_) => {
                warn!(op, timeout_ms = limit.as_millis() as u64, "Redis command timed out");
                Err(CacheError::Timeout(op))
            }
        }
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();
        let cmd = conn.get::<_, Option<String>>(key);
        let value = Self::bounded("GET", self.timeouts.read, cmd).await?;

        match &value {
            Some(_) => debug!(key, "Cache HIT"),
            None => debug!(key, "Cache MISS"),
        }
        Ok(value)
    }

    async fn set_string(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        let cmd = conn.set_ex::<_, _, ()>(key, value, ttl_seconds);
        Self::bounded("SETEX", self.timeouts.write, cmd).await?;

        debug!(key, ttl_seconds, "Cache SET");
        Ok(())
    }
}

#[async_trait]
impl LinkCache for RedisCache {
    async fn get_by_code(&self, code: &str) -> CacheResult<Option<String>> {
        self.get_string(&Self::code_key(code)).await
    }

    async fn set_by_code(&self, code: &str, target: &str, ttl: Duration) -> CacheResult<()> {
        self.set_string(&Self::code_key(code), target, ttl).await
    }

    async fn delete_by_code(&self, code: &str) -> CacheResult<()> {
        let key = Self::code_key(code);
        let mut conn = self.client.clone();

        let cmd = conn.del::<_, i32>(&key);
        let deleted = Self::bounded("DEL", self.timeouts.write, cmd).await?;
        if deleted > 0 {
            debug!(code, "Cache INVALIDATE");
        }
        Ok(())
    }

    async fn delete_by_target(&self, target: &str) -> CacheResult<()> {
        let key = Self::target_key(target);
        let mut conn = self.client.clone();

        let cmd = conn.del::<_, i32>(&key);
        let deleted = Self::bounded("DEL", self.timeouts.write, cmd).await?;
        if deleted > 0 {
            debug!(target, "Cache INVALIDATE (target)");
        }
        Ok(())
    }

    async fn get_by_target(&self, target: &str) -> CacheResult<Option<String>> {
        self.get_string(&Self::target_key(target)).await
    }

    async fn set_by_target(&self, target: &str, code: &str, ttl: Duration) -> CacheResult<()> {
        self.set_string(&Self::target_key(target), code, ttl).await
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.client.clone();
        let cmd = conn.exists::<_, bool>(key);
        Self::bounded("EXISTS", self.timeouts.read, cmd).await
    }

    async fn get_hash(&self, key: &str) -> CacheResult<Option<HashMap<String, String>>> {
        let mut conn = self.client.clone();
        let cmd = conn.hgetall::<_, HashMap<String, String>>(key);
        let fields = Self::bounded("HGETALL", self.timeouts.read, cmd).await?;

        if fields.is_empty() {
            debug!(key, "Cache MISS (hash)");
            return Ok(None);
        }
        Ok(Some(fields))
    }

    async fn set_hash(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl: Duration,
    ) -> CacheResult<()> {
        if fields.is_empty() {
            return Ok(());
        }

        let mut conn = self.client.clone();
        let mut pipe = redis::pipe();
        pipe.atomic().hset_multiple(key, fields).ignore();
        if !ttl.is_zero() {
            pipe.expire(key, ttl.as_secs().max(1) as i64).ignore();
        }

        let cmd = pipe.query_async::<()>(&mut conn);
        Self::bounded("HSET", self.timeouts.write, cmd).await?;

        debug!(key, ttl_seconds = ttl.as_secs(), "Cache SET (hash)");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        let cmd = conn.ping::<()>();
        Self::bounded("PING", self.timeouts.read, cmd).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_namespaces_are_disjoint() {
        assert_eq!(RedisCache::code_key("abc"), "c:abc");
        assert_eq!(
            RedisCache::target_key("https://example.com/"),
            "u:https://example.com/"
        );
        assert_ne!(RedisCache::code_key("x"), RedisCache::target_key("x"));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let limit = Duration::from_millis(20);
        let pending = std::future::pending::<RedisResult<Option<String>>>();
        let result = RedisCache::bounded("GET", limit, pending).await;

        assert!(matches!(result, Err(CacheError::Timeout("GET"))));
    }

    #[tokio::test]
    async fn test_bounded_maps_command_errors() {
        let error = redis::RedisError::from((redis::ErrorKind::Client, "rejected"));
        let failing = async { Err::<(), _>(error) };
        let limit = Duration::from_secs(1);
        let result = RedisCache::bounded("SETEX", limit, failing).await;

        assert!(matches!(result, Err(CacheError::OperationError(_))));
    }
}
