//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, LinkCache};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// A cache implementation that stores nothing.
///
/// Every lookup is a miss and every write succeeds, so the link service
/// degrades to pure durable-store reads.
///
/// # Use Cases
///
/// - Development environments without Redis
/// - Fallback when the Redis connection fails at startup
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for NullCache {
    async fn get_by_code(&self, _code: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_by_code(&self, _code: &str, _target: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete_by_code(&self, _code: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn get_by_target(&self, _target: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_by_target(&self, _target: &str, _code: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete_by_target(&self, _target: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn exists(&self, _key: &str) -> CacheResult<bool> {
        Ok(false)
    }

    async fn get_hash(&self, _key: &str) -> CacheResult<Option<HashMap<String, String>>> {
        Ok(None)
    }

    async fn set_hash(
        &self,
        _key: &str,
        _fields: &[(String, String)],
        _ttl: Duration,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
