//! Reservation and Shorten flow tests
//!
//! Store doubles inject collisions and insert races.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use linkkeeper::errors::{LinkerError, Result};
use linkkeeper::services::{
    AliasRequest, LinkService, MAX_INSERT_ATTEMPTS, MAX_RANDOM_ATTEMPTS, UniquenessResolver,
};
use linkkeeper::storage::{AliasRecord, AliasStore, MemoryStore};

/// 所有短码都已存在
#[derive(Default)]
struct AlwaysTakenStore {
    lookups: AtomicUsize,
    inserts: AtomicUsize,
}

#[async_trait]
impl AliasStore for AlwaysTakenStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<AliasRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(Some(AliasRecord::new(
            code.to_string(),
            "https://taken.example".to_string(),
            Utc::now(),
        )))
    }

    async fn insert(&self, _record: &AliasRecord) -> Result<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_last_accessed(&self, _code: &str, _at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }

    async fn delete_older_than(&self, _cutoff: DateTime<Utc>) -> Result<u64> {
        Ok(0)
    }

    fn backend_name(&self) -> &str {
        "always-taken"
    }
}

/// 预检查总是通过，但 insert 总是因主键冲突失败（模拟并发抢占）
#[derive(Default)]
struct RacingStore {
    inserts: AtomicUsize,
}

#[async_trait]
impl AliasStore for RacingStore {
    async fn find_by_code(&self, _code: &str) -> Result<Option<AliasRecord>> {
        Ok(None)
    }

    async fn insert(&self, record: &AliasRecord) -> Result<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Err(LinkerError::duplicate_key(format!(
            "short_code '{}' already exists",
            record.short_code
        )))
    }

    async fn update_last_accessed(&self, _code: &str, _at: DateTime<Utc>) -> Result<()> {
        Ok(())
    }

    async fn delete_older_than(&self, _cutoff: DateTime<Utc>) -> Result<u64> {
        Ok(0)
    }

    fn backend_name(&self) -> &str {
        "racing"
    }
}

/// 存储不可用
struct BrokenStore;

#[async_trait]
impl AliasStore for BrokenStore {
    async fn find_by_code(&self, _code: &str) -> Result<Option<AliasRecord>> {
        Err(LinkerError::store_connection("connection refused"))
    }

    async fn insert(&self, _record: &AliasRecord) -> Result<()> {
        Err(LinkerError::store_connection("connection refused"))
    }

    async fn update_last_accessed(&self, _code: &str, _at: DateTime<Utc>) -> Result<()> {
        Err(LinkerError::store_connection("connection refused"))
    }

    async fn delete_older_than(&self, _cutoff: DateTime<Utc>) -> Result<u64> {
        Err(LinkerError::store_connection("connection refused"))
    }

    fn backend_name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn test_random_reservation_gives_up_after_exactly_ten_attempts() {
    let store = Arc::new(AlwaysTakenStore::default());
    let resolver = UniquenessResolver::new(store.clone());

    let err = resolver.reserve(&AliasRequest::Random).await.unwrap_err();

    assert!(matches!(err, LinkerError::ExhaustedRetries(_)));
    assert_eq!(store.lookups.load(Ordering::SeqCst), MAX_RANDOM_ATTEMPTS);
    assert_eq!(MAX_RANDOM_ATTEMPTS, 10);
}

#[tokio::test]
async fn test_existing_custom_alias_is_taken() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert(&AliasRecord::new(
            "promo".to_string(),
            "https://example.com".to_string(),
            Utc::now(),
        ))
        .await
        .unwrap();

    let resolver = UniquenessResolver::new(store);
    let err = resolver
        .reserve(&AliasRequest::Custom("promo".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkerError::AliasTaken(_)));
}

#[tokio::test]
async fn test_shorten_never_inserts_when_every_code_collides() {
    let store = Arc::new(AlwaysTakenStore::default());
    let service = LinkService::new(store.clone(), "https://sho.rt");

    let err = service
        .shorten("https://example.com/a", None)
        .await
        .unwrap_err();

    assert!(matches!(err, LinkerError::ExhaustedRetries(_)));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_insert_race_surfaces_alias_taken() {
    let store = Arc::new(RacingStore::default());
    let service = LinkService::new(store.clone(), "https://sho.rt");

    let err = service
        .shorten("https://example.com/a", Some("launch"))
        .await
        .unwrap_err();

    assert!(matches!(err, LinkerError::AliasTaken(_)));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_random_insert_race_retries_then_exhausts() {
    let store = Arc::new(RacingStore::default());
    let service = LinkService::new(store.clone(), "https://sho.rt");

    let err = service
        .shorten("https://example.com/a", None)
        .await
        .unwrap_err();

    assert!(matches!(err, LinkerError::ExhaustedRetries(_)));
    assert_eq!(store.inserts.load(Ordering::SeqCst), MAX_INSERT_ATTEMPTS);
}

#[tokio::test]
async fn test_store_failure_propagates_as_store_error() {
    let service = LinkService::new(Arc::new(BrokenStore), "https://sho.rt");

    let err = service
        .shorten("https://example.com/a", Some("promo"))
        .await
        .unwrap_err();
    assert!(err.is_store_error());

    let err = service
        .shorten("https://example.com/a", None)
        .await
        .unwrap_err();
    assert!(err.is_store_error());
}

#[tokio::test]
async fn test_concurrent_custom_requests_have_one_winner() {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(LinkService::new(store.clone(), "https://sho.rt"));

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .shorten(&format!("https://example.com/{i}"), Some("same-name"))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(result) => {
                assert_eq!(result.short_code, "same-name");
                winners += 1;
            }
            Err(e) => assert!(matches!(e, LinkerError::AliasTaken(_)), "{e}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_short_url_uses_trimmed_base_url() {
    let service = LinkService::new(Arc::new(MemoryStore::new()), "https://sho.rt///");
    let result = service
        .shorten("https://example.com", Some("Docs"))
        .await
        .unwrap();
    assert_eq!(result.short_url, "https://sho.rt/docs");
}
