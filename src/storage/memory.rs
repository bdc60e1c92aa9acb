//! In-process store
//!
//! Same semantics as the database backend, used for tests and for
//! `database_url = "memory://"`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{AliasRecord, AliasStore};
use crate::errors::{LinkerError, Result};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, AliasRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AliasStore for MemoryStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<AliasRecord>> {
        Ok(self.records.read().await.get(code).cloned())
    }

    async fn insert(&self, record: &AliasRecord) -> Result<()> {
        match self.records.write().await.entry(record.short_code.clone()) {
            Entry::Occupied(_) => Err(LinkerError::duplicate_key(format!(
                "short_code '{}' already exists",
                record.short_code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn update_last_accessed(&self, code: &str, at: DateTime<Utc>) -> Result<()> {
        if let Some(record) = self.records.write().await.get_mut(code)
            && at > record.last_accessed_at
        {
            record.last_accessed_at = at;
        }
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_stale(cutoff));
        let deleted = (before - records.len()) as u64;
        debug!("MemoryStore: deleted {} stale records", deleted);
        Ok(deleted)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(code: &str, last_accessed_at: DateTime<Utc>) -> AliasRecord {
        AliasRecord {
            short_code: code.to_string(),
            original_url: format!("https://example.com/{code}"),
            created_at: last_accessed_at,
            last_accessed_at,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert(&record("promo", now)).await.unwrap();

        let mut other = record("promo", now);
        other.original_url = "https://other.example".to_string();
        let err = store.insert(&other).await.unwrap_err();
        assert!(matches!(err, LinkerError::DuplicateKey(_)));

        // 原记录未被覆盖
        let stored = store.find_by_code("promo").await.unwrap().unwrap();
        assert_eq!(stored.original_url, "https://example.com/promo");
    }

    #[tokio::test]
    async fn test_update_last_accessed_is_monotonic() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert(&record("promo", now)).await.unwrap();

        let later = now + Duration::minutes(5);
        store.update_last_accessed("promo", later).await.unwrap();
        store
            .update_last_accessed("promo", now - Duration::minutes(5))
            .await
            .unwrap();

        let stored = store.find_by_code("promo").await.unwrap().unwrap();
        assert_eq!(stored.last_accessed_at, later);
        assert_eq!(stored.created_at, now);
    }

    #[tokio::test]
    async fn test_update_missing_code_is_noop() {
        let store = MemoryStore::new();
        store.update_last_accessed("ghost", Utc::now()).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_older_than() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert(&record("old", now - Duration::days(400)))
            .await
            .unwrap();
        store.insert(&record("fresh", now)).await.unwrap();

        let deleted = store
            .delete_older_than(now - Duration::days(365))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(store.find_by_code("old").await.unwrap().is_none());
        assert!(store.find_by_code("fresh").await.unwrap().is_some());
    }
}
