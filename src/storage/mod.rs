use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
pub mod traits;

pub use backend::SeaOrmStore;
pub use memory::MemoryStore;
pub use models::AliasRecord;
pub use traits::AliasStore;

/// 使用进程内存储的 database_url
pub const MEMORY_DATABASE_URL: &str = "memory://";

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<dyn AliasStore>> {
        let database_url = config.database_url.trim();

        if database_url == MEMORY_DATABASE_URL {
            tracing::warn!("Using in-memory store, records will not survive a restart");
            return Ok(Arc::new(MemoryStore::new()));
        }

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let store = SeaOrmStore::new(database_url, &backend_type, config).await?;
        Ok(Arc::new(store))
    }
}
