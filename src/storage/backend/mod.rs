//! SeaORM storage backend
//!
//! Stores alias records in SQLite, MySQL/MariaDB or PostgreSQL.
//! Uniqueness of `short_code` is enforced by the primary key of
//! `alias_records`.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{LinkerError, Result};
use crate::storage::{AliasRecord, AliasStore};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, record_to_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinkerError::config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://, memory://",
            database_url
        )))
    }
}

/// SeaORM-based alias store
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
    backend_name: String,
    retry_policy: retry::RetryPolicy,
}

impl SeaOrmStore {
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkerError::config("database.database_url is not set"));
        }

        let retry_policy = retry::RetryPolicy {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
            attempt_timeout: Some(Duration::from_secs(config.timeout)),
        };

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config).await?
        };

        run_migrations(&db).await?;

        let store = SeaOrmStore {
            db,
            backend_name: backend_name.to_string(),
            retry_policy,
        };

        info!("{} store initialized", store.backend_name.to_uppercase());
        Ok(store)
    }
}

#[async_trait]
impl AliasStore for SeaOrmStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<AliasRecord>> {
        self.find_record(code).await
    }

    async fn insert(&self, record: &AliasRecord) -> Result<()> {
        self.insert_record(record).await
    }

    async fn update_last_accessed(&self, code: &str, at: DateTime<Utc>) -> Result<()> {
        self.touch_record(code, at).await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        self.delete_stale_records(cutoff).await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    async fn close(&self) -> Result<()> {
        if let Err(e) = self.db.clone().close().await {
            warn!("Failed to close {} connection pool: {}", self.backend_name, e);
            return Err(LinkerError::store_connection(e.to_string()));
        }
        info!("{} connection pool closed", self.backend_name.to_uppercase());
        Ok(())
    }
}
