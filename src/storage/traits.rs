use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::AliasRecord;
use crate::errors::Result;

/// 短码记录存储接口
///
/// 所有操作都可能是远程调用，调用方不得在调用期间持有进程内锁。
/// `insert` 是短码唯一性的最终裁决者：已存在时必须返回
/// [`LinkerError::DuplicateKey`](crate::errors::LinkerError::DuplicateKey)，不得覆盖。
#[async_trait]
pub trait AliasStore: Send + Sync {
    /// 按小写短码精确查询
    async fn find_by_code(&self, code: &str) -> Result<Option<AliasRecord>>;

    async fn insert(&self, record: &AliasRecord) -> Result<()>;

    /// 更新最后访问时间，只前进不后退
    async fn update_last_accessed(&self, code: &str, at: DateTime<Utc>) -> Result<()>;

    /// 删除 last_accessed_at 早于 cutoff 的记录，返回删除数量
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    fn backend_name(&self) -> &str;

    /// 释放底层连接
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
