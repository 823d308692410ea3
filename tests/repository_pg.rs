//! PostgreSQL repository tests. Run with `DATABASE_URL` set and `--ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;

use snaplink::config::StoreTimeouts;
use snaplink::domain::entities::{NewLink, Policy};
use snaplink::domain::repositories::{LinkRepository, SequenceRepository, SettingsRepository};
use snaplink::error::AppError;
use snaplink::infrastructure::persistence::{
    PgLinkRepository, PgSequenceRepository, PgSettingsRepository,
};

fn new_link(code: &str, target: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        target: target.to_string(),
        created_at: Utc::now(),
        expires_at: None,
        custom_alias: None,
    }
}

fn link_repo(pool: PgPool) -> PgLinkRepository {
    PgLinkRepository::new(Arc::new(pool), StoreTimeouts::default())
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_and_find_by_code(pool: PgPool) {
    let repo = link_repo(pool);

    let new = new_link("abc123", "https://example.com/");
    let link = repo.insert(new).await.unwrap();
    assert_eq!(link.code, "abc123");
    assert!(!link.disabled);

    let found = repo.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(found.target, "https://example.com/");

    assert!(repo.find_by_code("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_code_conflicts(pool: PgPool) {
    let repo = link_repo(pool);

    let first = new_link("dup", "https://a.example/");
    repo.insert(first).await.unwrap();
    let result = repo.insert(new_link("dup", "https://b.example/")).await;

    assert!(matches!(result, Err(AppError::Conflict)));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_alias_conflicts(pool: PgPool) {
    let repo = link_repo(pool);

    let mut first = new_link("promo", "https://a.example/");
    first.custom_alias = Some("promo".to_string());
    repo.insert(first).await.unwrap();

    let mut second = new_link("promo2", "https://b.example/");
    second.custom_alias = Some("promo".to_string());
    let result = repo.insert(second).await;

    assert!(matches!(result, Err(AppError::Conflict)));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_live_by_target_skips_dead_links(pool: PgPool) {
    let repo = link_repo(pool);
    let target = "https://example.com/doc";

    let mut expired = new_link("old", target);
    expired.expires_at = Some(Utc::now() - Duration::hours(1));
    repo.insert(expired).await.unwrap();

    repo.insert(new_link("off", target)).await.unwrap();
    repo.set_disabled("off", true).await.unwrap();

    assert!(repo.find_live_by_target(target).await.unwrap().is_none());

    repo.insert(new_link("live", target)).await.unwrap();
    let found = repo.find_live_by_target(target).await.unwrap().unwrap();
    assert_eq!(found.code, "live");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_set_disabled_unknown_code(pool: PgPool) {
    let repo = link_repo(pool);
    assert!(!repo.set_disabled("nope", true).await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_purge_expired(pool: PgPool) {
    let repo = link_repo(pool);

    let mut expired = new_link("old", "https://example.com/1");
    expired.expires_at = Some(Utc::now() - Duration::minutes(1));
    repo.insert(expired).await.unwrap();

    let mut future = new_link("new", "https://example.com/2");
    future.expires_at = Some(Utc::now() + Duration::hours(1));
    repo.insert(future).await.unwrap();

    let forever = new_link("forever", "https://example.com/3");
    repo.insert(forever).await.unwrap();

    assert_eq!(repo.purge_expired(Utc::now()).await.unwrap(), 1);
    assert!(repo.find_by_code("old").await.unwrap().is_none());
    assert!(repo.find_by_code("new").await.unwrap().is_some());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_sequence_starts_at_one_and_increments(pool: PgPool) {
    let repo = PgSequenceRepository::new(Arc::new(pool), StoreTimeouts::default());

    assert_eq!(repo.increment("url").await.unwrap(), 1);
    assert_eq!(repo.increment("url").await.unwrap(), 2);
    assert_eq!(repo.increment("other").await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_sequence_concurrent_increments(pool: PgPool) {
    let repo = PgSequenceRepository::new(Arc::new(pool), StoreTimeouts::default());
    let repo = Arc::new(repo);

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment("url").await.unwrap() })
        })
        .collect();

    let mut values = HashSet::new();
    for handle in handles {
        values.insert(handle.await.unwrap());
    }

    assert_eq!(values.len(), 20);
    assert_eq!(values.iter().max().copied(), Some(20));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_settings_default_and_save(pool: PgPool) {
    let repo = PgSettingsRepository::new(Arc::new(pool), StoreTimeouts::default());

    assert!(repo.load_policy().await.unwrap().is_zero());

    repo.save_policy(Policy::new(48, 10)).await.unwrap();
    assert_eq!(repo.load_policy().await.unwrap(), Policy::new(48, 10));

    repo.save_policy(Policy::new(1, 0)).await.unwrap();
    assert_eq!(repo.load_policy().await.unwrap(), Policy::new(1, 0));
}
