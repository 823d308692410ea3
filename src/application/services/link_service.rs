//! Link shortening and resolution service.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::sequence_allocator::SequenceAllocator;
use crate::domain::entities::{Link, NewLink, Policy};
use crate::domain::repositories::{LinkRepository, SequenceRepository};
use crate::error::AppError;
use crate::infrastructure::cache::LinkCache;
use crate::utils::base62;
use crate::utils::url_normalizer::normalize_url;

/// Result of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenedLink {
    pub code: String,
    pub short_url: String,
}

/// Service for creating and resolving short links.
///
/// Reads go cache first, then the durable store; every successful store
/// read or write repopulates both cache directions. Cache writes are
/// best-effort and only logged on failure, while a cache read fault fails
/// the call rather than being mistaken for a miss.
///
/// # Deduplication
///
/// Shortening a URL that already has a live code returns that code. Two
/// concurrent requests for the same new URL may both insert; the target
/// column carries no uniqueness constraint.
pub struct LinkService<L: LinkRepository + ?Sized, S: SequenceRepository + ?Sized> {
    links: Arc<L>,
    sequence: SequenceAllocator<S>,
    cache: Arc<dyn LinkCache>,
    base_url: String,
    salt: u64,
}

impl<L: LinkRepository + ?Sized, S: SequenceRepository + ?Sized> LinkService<L, S> {
    /// Creates a new link service.
    ///
    /// `base_url` is joined with the code by a single `/`; `salt` is XOR-ed
    /// into sequence values before encoding.
    pub fn new(
        links: Arc<L>,
        sequence: Arc<S>,
        cache: Arc<dyn LinkCache>,
        base_url: impl Into<String>,
        salt: u64,
    ) -> Self {
        Self {
            links,
            sequence: SequenceAllocator::new(sequence),
            cache,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            salt,
        }
    }

    /// Shortens `raw_url`, reusing the existing code for an already
    /// shortened target.
    ///
    /// A non-empty `custom_alias` is stored verbatim as the code; whether it
    /// is free is decided by the store at insert time.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] / [`AppError::UnsupportedScheme`] if the URL is rejected
    /// - [`AppError::Conflict`] if the code or alias is already taken
    /// - [`AppError::Sequence`] if no code could be allocated
    /// - [`AppError::System`] on cache read faults and store failures
    pub async fn shorten(
        &self,
        raw_url: &str,
        custom_alias: Option<&str>,
        policy: Policy,
    ) -> Result<ShortenedLink, AppError> {
        let target = normalize_url(raw_url)?;

        if let Some(code) = self.cache.get_by_target(&target).await? {
            debug!(code = %code, "Dedup hit in cache");
            return Ok(self.shortened(code));
        }

        if let Some(existing) = self.links.find_live_by_target(&target).await? {
            debug!(code = %existing.code, "Dedup hit in store");
            self.populate_cache(&existing, policy).await;
            return Ok(self.shortened(existing.code));
        }

        let alias = custom_alias.filter(|a| !a.is_empty());
        let code = match alias {
            Some(alias) => alias.to_string(),
            None => base62::encode(self.sequence.next().await? ^ self.salt),
        };

        let now = Utc::now();
        let link = self
            .links
            .insert(NewLink {
                code,
                target,
                created_at: now,
                expires_at: policy.link_expiry(now),
                custom_alias: alias.map(str::to_string),
            })
            .await?;

        info!(code = %link.code, custom = alias.is_some(), "Short link created");

        self.populate_cache(&link, policy).await;
        Ok(self.shortened(link.code))
    }

    /// Resolves `code` to its target URL.
    ///
    /// A cached mapping is trusted as is; cache entries never outlive the
    /// link's expiry.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for unknown or disabled codes, and when the
    ///   store lookup itself fails
    /// - [`AppError::Expired`] when the link's expiry has passed
    /// - [`AppError::System`] on cache read faults
    pub async fn resolve(&self, code: &str, policy: Policy) -> Result<String, AppError> {
        if let Some(target) = self.cache.get_by_code(code).await? {
            debug!(code, "Resolved from cache");
            return Ok(target);
        }

        let link = match self.links.find_by_code(code).await {
            Ok(Some(link)) => link,
            Ok(None) => return Err(AppError::NotFound),
            Err(e) => {
                warn!(code, error = %e, "Link lookup failed, reporting not found");
                return Err(AppError::NotFound);
            }
        };

        if link.disabled {
            return Err(AppError::NotFound);
        }
        if link.is_expired() {
            return Err(AppError::Expired);
        }

        self.populate_cache(&link, policy).await;
        Ok(link.target)
    }

    fn shortened(&self, code: String) -> ShortenedLink {
        let short_url = format!("{}/{}", self.base_url, code);
        ShortenedLink { code, short_url }
    }

    async fn populate_cache(&self, link: &Link, policy: Policy) {
        let Some(ttl) = population_ttl(&policy, link.expires_at, Utc::now()) else {
            debug!(code = %link.code, "Link expires too soon to cache");
            return;
        };

        let cache = self.cache.as_ref();
        if let Err(e) = cache.set_by_code(&link.code, &link.target, ttl).await {
            warn!(code = %link.code, error = %e, "Failed to cache code mapping");
        }
        if let Err(e) = cache.set_by_target(&link.target, &link.code, ttl).await {
            warn!(code = %link.code, error = %e, "Failed to cache target mapping");
        }
    }
}

/// Cache lifetime for a link: the policy's cache TTL, capped by the time
/// left until `expires_at`. `None` when under one second remains.
fn population_ttl(
    policy: &Policy,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let ttl = policy.cache_ttl();

    let Some(expires_at) = expires_at else {
        return Some(ttl);
    };

    let remaining = (expires_at - now).to_std().ok()?;
    let capped = ttl.min(remaining);
    (capped >= Duration::from_secs(1)).then_some(capped)
}
