//! Write operations for SeaOrmStore

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, SqlErr, sea_query::Expr};
use tracing::{debug, info};

use super::converters::record_to_active_model;
use super::{SeaOrmStore, retry};
use crate::errors::{LinkerError, Result};
use crate::storage::AliasRecord;

use migration::entities::alias_record;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 已存在的行是否就是这次要写入的记录（按秒比较，兼容不带小数秒的列类型）
fn is_same_write(existing: &AliasRecord, record: &AliasRecord) -> bool {
    existing.original_url == record.original_url
        && existing.created_at.timestamp() == record.created_at.timestamp()
}

impl SeaOrmStore {
    /// 插入新记录；主键冲突返回 DuplicateKey，不覆盖已有记录
    ///
    /// 超时或断连后的重放可能撞上前一次已经提交的同一行，这种情况视为成功。
    pub(super) async fn insert_record(&self, record: &AliasRecord) -> Result<()> {
        let db = &self.db;
        let model = record_to_active_model(record);
        let mut attempts = 0u32;

        let outcome = retry::with_retry(
            &format!("insert({})", record.short_code),
            self.retry_policy,
            || {
                attempts += 1;
                let model = model.clone();
                async move {
                    alias_record::Entity::insert(model)
                        .exec_without_returning(db)
                        .await
                }
            },
        )
        .await;

        match outcome {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return self.resolve_insert_conflict(record, attempts > 1).await;
            }
            Err(e) => {
                return Err(LinkerError::store_operation(format!(
                    "Failed to insert alias '{}': {}",
                    record.short_code, e
                )));
            }
        }

        debug!("Alias record inserted: {}", record.short_code);
        Ok(())
    }

    /// 处理插入时的主键冲突
    ///
    /// `replayed` 为 true 表示冲突发生在重试中：若库中的行与本次写入一致，
    /// 说明前一次尝试已提交，返回成功；否则是真正的占用。
    pub(super) async fn resolve_insert_conflict(
        &self,
        record: &AliasRecord,
        replayed: bool,
    ) -> Result<()> {
        if replayed
            && let Some(existing) = self.find_record(&record.short_code).await?
            && is_same_write(&existing, record)
        {
            debug!(
                "Replayed insert of '{}' found its own earlier write",
                record.short_code
            );
            return Ok(());
        }

        Err(LinkerError::duplicate_key(format!(
            "Short code '{}' already exists",
            record.short_code
        )))
    }

    /// 条件更新，只在新时间晚于已存时间时生效
    pub(super) async fn touch_record(&self, code: &str, at: DateTime<Utc>) -> Result<()> {
        let db = &self.db;

        retry::with_retry(&format!("touch({})", code), self.retry_policy, || async {
            alias_record::Entity::update_many()
                .col_expr(alias_record::Column::LastAccessedAt, Expr::value(at))
                .filter(alias_record::Column::ShortCode.eq(code))
                .filter(alias_record::Column::LastAccessedAt.lt(at))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| {
            LinkerError::store_operation(format!(
                "Failed to update last access of '{}': {}",
                code, e
            ))
        })?;

        Ok(())
    }

    pub(super) async fn delete_stale_records(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let db = &self.db;

        let result = retry::with_retry("delete_stale", self.retry_policy, || async {
            alias_record::Entity::delete_many()
                .filter(alias_record::Column::LastAccessedAt.lt(cutoff))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| {
            LinkerError::store_operation(format!("Failed to delete stale aliases: {}", e))
        })?;

        if result.rows_affected > 0 {
            info!(
                "Deleted {} alias records idle since before {}",
                result.rows_affected,
                cutoff.to_rfc3339()
            );
        }
        Ok(result.rows_affected)
    }
}
