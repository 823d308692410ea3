//! Read-through access to the TTL policy.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::entities::Policy;
use crate::domain::repositories::SettingsRepository;
use crate::error::AppError;
use crate::infrastructure::cache::LinkCache;

/// Expiry of the cached policy hash.
pub const POLICY_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Serves the current [`Policy`], preferring the distributed cache.
///
/// Lookup order is cache hash, then durable row. A durable read repopulates
/// the hash so other instances see the policy without touching the store.
/// The last policy served is kept as a local snapshot; it is advisory and
/// may lag behind the cache.
pub struct SettingsProvider<R: SettingsRepository + ?Sized> {
    repository: Arc<R>,
    cache: Option<Arc<dyn LinkCache>>,
    cache_key: String,
    snapshot: RwLock<Policy>,
}

impl<R: SettingsRepository + ?Sized> SettingsProvider<R> {
    /// Creates a provider. Pass `None` for `cache` when no distributed
    /// cache is available; every `get` then reads the durable store.
    pub fn new(
        repository: Arc<R>,
        cache: Option<Arc<dyn LinkCache>>,
        cache_key: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            cache,
            cache_key: cache_key.into(),
            snapshot: RwLock::new(Policy::default()),
        }
    }

    /// Returns the current policy.
    ///
    /// A zero policy means no row exists yet and is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::System`] if the cache read faults (a miss is not
    /// a fault) or the durable read fails.
    pub async fn get(&self) -> Result<Policy, AppError> {
        if let Some(cache) = &self.cache
            && let Some(fields) = cache.get_hash(&self.cache_key).await?
        {
            match Policy::from_hash_fields(&fields) {
                Ok(policy) if !policy.is_zero() => {
                    debug!(key = %self.cache_key, "Policy served from cache");
                    self.store_snapshot(policy);
                    return Ok(policy);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(key = %self.cache_key, error = %e, "Ignoring undecodable cached policy");
                }
            }
        }

        let policy = self.repository.load_policy().await?;

        if let Some(cache) = &self.cache
            && !policy.is_zero()
            && let Err(e) = cache
                .set_hash(&self.cache_key, &policy.to_hash_fields(), POLICY_CACHE_TTL)
                .await
        {
            warn!(key = %self.cache_key, error = %e, "Failed to cache policy");
        }

        self.store_snapshot(policy);
        Ok(policy)
    }

    /// Last policy returned by [`Self::get`], or zero before the first call.
    pub fn snapshot(&self) -> Policy {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn store_snapshot(&self, policy: Policy) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = policy,
            Err(poisoned) => *poisoned.into_inner() = policy,
        }
    }
}
