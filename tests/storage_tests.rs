//! SeaORM store tests against temporary SQLite databases

use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

use linkkeeper::config::DatabaseConfig;
use linkkeeper::errors::LinkerError;
use linkkeeper::storage::{AliasRecord, AliasStore, SeaOrmStore, StoreFactory};

async fn sqlite_store(dir: &TempDir) -> SeaOrmStore {
    let db_path = dir.path().join("aliases.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let config = DatabaseConfig {
        database_url: db_url.clone(),
        ..DatabaseConfig::default()
    };
    SeaOrmStore::new(&db_url, "sqlite", &config)
        .await
        .expect("Failed to create SQLite store")
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn record(code: &str, ts: DateTime<Utc>) -> AliasRecord {
    AliasRecord::new(code.to_string(), format!("https://example.com/{code}"), ts)
}

#[tokio::test]
async fn test_insert_and_find() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir).await;

    store.insert(&record("promo", at(0))).await.unwrap();

    let found = store.find_by_code("promo").await.unwrap().unwrap();
    assert_eq!(found, record("promo", at(0)));
    assert!(store.find_by_code("missing").await.unwrap().is_none());
    assert_eq!(store.backend_name(), "sqlite");
}

#[tokio::test]
async fn test_duplicate_insert_is_rejected_without_overwrite() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir).await;

    store.insert(&record("promo", at(0))).await.unwrap();

    let mut other = record("promo", at(10));
    other.original_url = "https://attacker.example".to_string();
    let err = store.insert(&other).await.unwrap_err();
    assert!(matches!(err, LinkerError::DuplicateKey(_)), "{err}");

    let found = store.find_by_code("promo").await.unwrap().unwrap();
    assert_eq!(found.original_url, "https://example.com/promo");
}

#[tokio::test]
async fn test_last_access_only_moves_forward() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir).await;
    store.insert(&record("promo", at(0))).await.unwrap();

    store.update_last_accessed("promo", at(100)).await.unwrap();
    store.update_last_accessed("promo", at(50)).await.unwrap();

    let found = store.find_by_code("promo").await.unwrap().unwrap();
    assert_eq!(found.last_accessed_at, at(100));
    assert_eq!(found.created_at, at(0));

    // 不存在的短码不报错
    store.update_last_accessed("missing", at(200)).await.unwrap();
}

#[tokio::test]
async fn test_delete_older_than_is_strict() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir).await;

    store.insert(&record("old", at(0))).await.unwrap();
    store.insert(&record("edge", at(100))).await.unwrap();
    store.insert(&record("new", at(200))).await.unwrap();

    assert_eq!(store.delete_older_than(at(100)).await.unwrap(), 1);
    assert!(store.find_by_code("old").await.unwrap().is_none());
    assert!(store.find_by_code("edge").await.unwrap().is_some());
    assert!(store.find_by_code("new").await.unwrap().is_some());

    assert_eq!(store.delete_older_than(at(100)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = sqlite_store(&dir).await;
        store.insert(&record("keep", at(0))).await.unwrap();
        store.close().await.unwrap();
    }

    let store = sqlite_store(&dir).await;
    assert!(store.find_by_code("keep").await.unwrap().is_some());
}

#[tokio::test]
async fn test_factory_selects_backend() {
    let config = DatabaseConfig {
        database_url: "memory://".to_string(),
        ..DatabaseConfig::default()
    };
    let store = StoreFactory::create(&config).await.unwrap();
    assert_eq!(store.backend_name(), "memory");

    let dir = TempDir::new().unwrap();
    let config = DatabaseConfig {
        database_url: dir.path().join("factory.db").display().to_string(),
        ..DatabaseConfig::default()
    };
    let store = StoreFactory::create(&config).await.unwrap();
    assert_eq!(store.backend_name(), "sqlite");

    let config = DatabaseConfig {
        database_url: "redis://localhost".to_string(),
        ..DatabaseConfig::default()
    };
    assert!(matches!(
        StoreFactory::create(&config).await,
        Err(LinkerError::Config(_))
    ));
}

#[tokio::test]
async fn test_concurrent_duplicate_inserts_have_one_winner() {
    let dir = TempDir::new().unwrap();
    let store = std::sync::Arc::new(sqlite_store(&dir).await);

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.insert(&record("race", at(i))).await
        }));
    }

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => ok += 1,
            Err(e) => assert!(matches!(e, LinkerError::DuplicateKey(_)), "{e}"),
        }
    }
    assert_eq!(ok, 1);

    let cutoff = at(0) + Duration::days(1);
    assert_eq!(store.delete_older_than(cutoff).await.unwrap(), 1);
}
