//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, SettingsProvider};
use crate::domain::repositories::{LinkRepository, SequenceRepository, SettingsRepository};
use crate::infrastructure::cache::LinkCache;

/// Link service over trait-object repositories.
pub type DynLinkService = LinkService<dyn LinkRepository, dyn SequenceRepository>;

/// Settings provider over a trait-object repository.
pub type DynSettingsProvider = SettingsProvider<dyn SettingsRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub settings: Arc<DynSettingsProvider>,
    /// Used directly only by the health check.
    pub links: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn LinkCache>,
}

impl AppState {
    /// Wires the services from their stores.
    ///
    /// `settings_cache` is `None` when no distributed cache is reachable, so
    /// the policy is always read from the durable store.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        links: Arc<dyn LinkRepository>,
        sequence: Arc<dyn SequenceRepository>,
        settings_repository: Arc<dyn SettingsRepository>,
        cache: Arc<dyn LinkCache>,
        settings_cache: Option<Arc<dyn LinkCache>>,
        settings_cache_key: &str,
        base_url: &str,
        sequence_salt: u64,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            links.clone(),
            sequence,
            cache.clone(),
            base_url,
            sequence_salt,
        ));
        let settings = Arc::new(SettingsProvider::new(
            settings_repository,
            settings_cache,
            settings_cache_key,
        ));

        Self {
            link_service,
            settings,
            links,
            cache,
        }
    }
}
