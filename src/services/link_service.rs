//! Shorten service
//!
//! Validates the target URL, reserves a short code and persists the record.
//! The store's primary key is the final uniqueness check: a duplicate insert
//! becomes `AliasTaken` for custom names and triggers a fresh reservation for
//! random ones.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::reservation::{AliasRequest, UniquenessResolver};
use crate::errors::{LinkerError, Result};
use crate::storage::{AliasRecord, AliasStore};
use crate::utils::validate_url;

/// 随机短码路径下 insert 的最大次数
pub const MAX_INSERT_ATTEMPTS: usize = 3;

/// Result of a successful shorten call
#[derive(Debug, Clone)]
pub struct ShortenResult {
    pub short_code: String,
    /// `base_url` + "/" + `short_code`
    pub short_url: String,
    pub record: AliasRecord,
}

pub struct LinkService {
    store: Arc<dyn AliasStore>,
    resolver: UniquenessResolver,
    base_url: String,
}

impl LinkService {
    pub fn new(store: Arc<dyn AliasStore>, base_url: &str) -> Self {
        Self {
            resolver: UniquenessResolver::new(store.clone()),
            store,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn short_url_for(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    pub async fn shorten(
        &self,
        original_url: &str,
        custom_name: Option<&str>,
    ) -> Result<ShortenResult> {
        let original_url =
            validate_url(original_url).map_err(|e| LinkerError::invalid_url(e.to_string()))?;

        let request = AliasRequest::from_custom_name(custom_name);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let short_code = self.resolver.reserve(&request).await?;
            let record = AliasRecord::new(short_code.clone(), original_url.clone(), Utc::now());

            match self.store.insert(&record).await {
                Ok(()) => {
                    info!(
                        "LinkService: created alias '{}' -> '{}'",
                        record.short_code, record.original_url
                    );
                    return Ok(ShortenResult {
                        short_url: self.short_url_for(&short_code),
                        short_code,
                        record,
                    });
                }
                Err(LinkerError::DuplicateKey(_)) if request.is_custom() => {
                    // 预检查之后被并发请求抢先写入
                    return Err(LinkerError::alias_taken(format!(
                        "Custom name '{}' is already in use",
                        short_code
                    )));
                }
                Err(LinkerError::DuplicateKey(_)) if attempts < MAX_INSERT_ATTEMPTS => {
                    warn!(
                        "Random code '{}' was taken before insert (attempt {}/{}), retrying",
                        short_code, attempts, MAX_INSERT_ATTEMPTS
                    );
                }
                Err(LinkerError::DuplicateKey(_)) => {
                    return Err(LinkerError::exhausted_retries(format!(
                        "Failed to store a unique short code after {} attempts",
                        MAX_INSERT_ATTEMPTS
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn service(store: Arc<MemoryStore>) -> LinkService {
        LinkService::new(store, "https://sho.rt/")
    }

    #[tokio::test]
    async fn test_shorten_random() {
        let store = Arc::new(MemoryStore::new());
        let result = service(store.clone())
            .shorten("https://example.com/a", None)
            .await
            .unwrap();

        assert_eq!(result.short_code.len(), 6);
        assert_eq!(result.short_url, format!("https://sho.rt/{}", result.short_code));
        assert_eq!(result.record.created_at, result.record.last_accessed_at);

        let stored = store.find_by_code(&result.short_code).await.unwrap().unwrap();
        assert_eq!(stored.original_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_shorten_custom_normalized() {
        let store = Arc::new(MemoryStore::new());
        let result = service(store)
            .shorten("https://example.com", Some("Spring-Sale"))
            .await
            .unwrap();
        assert_eq!(result.short_code, "spring-sale");
        assert_eq!(result.short_url, "https://sho.rt/spring-sale");
    }

    #[tokio::test]
    async fn test_blank_custom_name_is_random() {
        let store = Arc::new(MemoryStore::new());
        let result = service(store)
            .shorten("https://example.com", Some("   "))
            .await
            .unwrap();
        assert_eq!(result.short_code.len(), 6);
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_store() {
        let store = Arc::new(MemoryStore::new());
        let err = service(store.clone())
            .shorten("javascript:alert(1)", Some("promo"))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkerError::InvalidUrl(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_custom_taken_twice() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(store);
        svc.shorten("https://a.example", Some("promo")).await.unwrap();
        let err = svc
            .shorten("https://b.example", Some("PROMO"))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkerError::AliasTaken(_)));
    }
}
