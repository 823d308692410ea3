//! Caching layer for redirects, deduplication and policy.
//!
//! Provides a [`LinkCache`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation for disabled caching

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, LinkCache, invalidate_link};

#[cfg(test)]
pub use service::MockLinkCache;
