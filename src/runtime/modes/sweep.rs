//! One-shot retention sweep

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::config::StaticConfig;
use crate::storage::StoreFactory;
use crate::tasks::RetentionSweeper;

/// 执行一轮清理后退出，返回删除数量
pub async fn run_sweep(config: &StaticConfig) -> Result<u64> {
    let store = StoreFactory::create(&config.database)
        .await
        .context("Failed to create alias store")?;

    let sweeper = RetentionSweeper::from_config(store.clone(), &config.retention);
    let result = sweeper.sweep(Utc::now()).await;

    if let Err(e) = store.close().await {
        tracing::warn!("Failed to close store after sweep: {}", e);
    }

    let deleted = result.context("Retention sweep failed")?;
    info!(
        "Sweep finished: {} aliases idle for more than {} days removed",
        deleted,
        sweeper.retention_days()
    );
    Ok(deleted)
}
