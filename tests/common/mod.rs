#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use snaplink::domain::entities::{Link, NewLink, Policy};
use snaplink::domain::repositories::{LinkRepository, SequenceRepository, SettingsRepository};
use snaplink::error::AppError;
use snaplink::infrastructure::cache::{CacheError, CacheResult, LinkCache};
use snaplink::state::AppState;

pub const BASE_URL: &str = "https://sl.example";
pub const SETTINGS_KEY: &str = "settings";

/// Link store enforcing unique codes and aliases like the PostgreSQL schema.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    pub inserts: AtomicUsize,
}

impl InMemoryLinkRepository {
    pub fn put(&self, link: Link) {
        self.links.lock().unwrap().push(link);
    }

    pub fn get(&self, code: &str) -> Option<Link> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();
        let taken = links.iter().any(|l| {
            l.code == new_link.code
                || (new_link.custom_alias.is_some() && l.custom_alias == new_link.custom_alias)
        });
        if taken {
            return Err(AppError::Conflict);
        }

        self.inserts.fetch_add(1, Ordering::SeqCst);
        let link = Link::from(new_link);
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.get(code))
    }

    async fn find_live_by_target(&self, target: &str) -> Result<Option<Link>, AppError> {
        let now = Utc::now();
        let links = self.links.lock().unwrap();
        let live = links
            .iter()
            .rev()
            .find(|l| l.target == target && !l.disabled && !l.is_expired_at(now));
        Ok(live.cloned())
    }

    async fn set_disabled(&self, code: &str, disabled: bool) -> Result<bool, AppError> {
        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.code == code) {
            Some(link) => {
                link.disabled = disabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| !l.is_expired_at(now));
        Ok((before - links.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySequenceRepository {
    counters: Mutex<HashMap<String, u64>>,
}

#[async_trait]
impl SequenceRepository for InMemorySequenceRepository {
    async fn increment(&self, name: &str) -> Result<u64, AppError> {
        let mut counters = self.counters.lock().unwrap();
        let value = counters.entry(name.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

#[derive(Default)]
pub struct InMemorySettingsRepository {
    policy: Mutex<Policy>,
    pub loads: AtomicUsize,
}

impl InMemorySettingsRepository {
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            policy: Mutex::new(policy),
            loads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load_policy(&self) -> Result<Policy, AppError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(*self.policy.lock().unwrap())
    }

    async fn save_policy(&self, policy: Policy) -> Result<(), AppError> {
        *self.policy.lock().unwrap() = policy;
        Ok(())
    }
}

/// TTL-aware cache with Redis key layout. `fail` turns every call into a fault.
#[derive(Default)]
pub struct InMemoryCache {
    strings: Mutex<HashMap<String, (String, Instant)>>,
    hashes: Mutex<HashMap<String, (HashMap<String, String>, Instant)>>,
    pub fail: std::sync::atomic::AtomicBool,
}

impl InMemoryCache {
    fn check(&self) -> CacheResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CacheError::ConnectionError("injected fault".to_string()));
        }
        Ok(())
    }

    fn get_live(&self, key: &str) -> Option<String> {
        let strings = self.strings.lock().unwrap();
        strings
            .get(key)
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(value, _)| value.clone())
    }

    fn put(&self, key: String, value: &str, ttl: Duration) {
        self.strings
            .lock()
            .unwrap()
            .insert(key, (value.to_string(), Instant::now() + ttl));
    }

    pub fn peek_code(&self, code: &str) -> Option<String> {
        self.get_live(&format!("c:{}", code))
    }

    pub fn peek_target(&self, target: &str) -> Option<String> {
        self.get_live(&format!("u:{}", target))
    }
}

#[async_trait]
impl LinkCache for InMemoryCache {
    async fn get_by_code(&self, code: &str) -> CacheResult<Option<String>> {
        self.check()?;
        Ok(self.peek_code(code))
    }

    async fn set_by_code(&self, code: &str, target: &str, ttl: Duration) -> CacheResult<()> {
        self.check()?;
        self.put(format!("c:{}", code), target, ttl);
        Ok(())
    }

    async fn delete_by_code(&self, code: &str) -> CacheResult<()> {
        self.check()?;
        let key = format!("c:{}", code);
        self.strings.lock().unwrap().remove(&key);
        Ok(())
    }

    async fn get_by_target(&self, target: &str) -> CacheResult<Option<String>> {
        self.check()?;
        Ok(self.peek_target(target))
    }

    async fn set_by_target(&self, target: &str, code: &str, ttl: Duration) -> CacheResult<()> {
        self.check()?;
        self.put(format!("u:{}", target), code, ttl);
        Ok(())
    }

    async fn delete_by_target(&self, target: &str) -> CacheResult<()> {
        self.check()?;
        let key = format!("u:{}", target);
        self.strings.lock().unwrap().remove(&key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        self.check()?;
        Ok(self.get_live(key).is_some() || self.hashes.lock().unwrap().contains_key(key))
    }

    async fn get_hash(&self, key: &str) -> CacheResult<Option<HashMap<String, String>>> {
        self.check()?;
        let hashes = self.hashes.lock().unwrap();
        let live = hashes
            .get(key)
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(fields, _)| fields.clone());
        Ok(live)
    }

    async fn set_hash(
        &self,
        key: &str,
        fields: &[(String, String)],
        ttl: Duration,
    ) -> CacheResult<()> {
        self.check()?;
        let entry = (fields.iter().cloned().collect(), Instant::now() + ttl);
        self.hashes.lock().unwrap().insert(key.to_string(), entry);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.check().is_ok()
    }
}

/// Application state over in-memory stores, with handles to inspect them.
pub struct TestApp {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub settings: Arc<InMemorySettingsRepository>,
    pub cache: Arc<InMemoryCache>,
}

pub fn create_test_app(policy: Policy, salt: u64) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::default());
    let sequence = Arc::new(InMemorySequenceRepository::default());
    let settings = Arc::new(InMemorySettingsRepository::with_policy(policy));
    let cache = Arc::new(InMemoryCache::default());

    let state = AppState::new(
        links.clone(),
        sequence,
        settings.clone(),
        cache.clone(),
        Some(cache.clone() as Arc<dyn LinkCache>),
        SETTINGS_KEY,
        BASE_URL,
        salt,
    );

    TestApp {
        state,
        links,
        settings,
        cache,
    }
}

pub fn create_test_server(app: &TestApp) -> TestServer {
    TestServer::new(snaplink::routes::router(app.state.clone())).unwrap()
}
