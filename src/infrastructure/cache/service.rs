//! Cache service trait and error types.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Errors that can occur during cache operations.
///
/// A miss is never an error: lookups report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),

    #[error("Cache operation '{0}' timed out")]
    Timeout(&'static str),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Volatile two-way link cache plus a small hash store.
///
/// Two independent key spaces are kept: `code → target` serves redirects and
/// `target → code` serves deduplication on shorten. Each entry carries its
/// own TTL, so one direction may expire before the other.
///
/// Backend faults are reported as errors rather than folded into misses;
/// callers decide whether a fault is fatal.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkCache: Send + Sync {
    /// Looks up the target for a short code.
    async fn get_by_code(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores `code → target` for `ttl`.
    async fn set_by_code(&self, code: &str, target: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes the `code → target` entry, if any.
    async fn delete_by_code(&self, code: &str) -> CacheResult<()>;

    /// Looks up the code for a normalized target.
    async fn get_by_target(&self, target: &str) -> CacheResult<Option<String>>;

    /// Stores `target → code` for `ttl`.
    async fn set_by_target(&self, target: &str, code: &str, ttl: Duration) -> CacheResult<()>;

    /// Removes the `target → code` entry, if any.
    async fn delete_by_target(&self, target: &str) -> CacheResult<()>;

    /// Reports whether a raw key exists.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Reads all fields of a hash. An absent or empty hash is `Ok(None)`.
    async fn get_hash(&self, key: &str) -> CacheResult<Option<HashMap<String, String>>>;

    /// Writes hash fields and sets the expiry of the whole hash to `ttl`.
    async fn set_hash(&self, key: &str, fields: &[(String, String)], ttl: Duration)
    -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

/// Drops both cache directions for a link.
///
/// Used when a link stops resolving: without the `target → code` entry,
/// shortening the same target again falls through to the store and gets a
/// live code instead of the dead one.
pub async fn invalidate_link(cache: &dyn LinkCache, code: &str, target: &str) -> CacheResult<()> {
    cache.delete_by_code(code).await?;
    cache.delete_by_target(target).await
}
