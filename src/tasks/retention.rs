//! 闲置短链接清理任务
//!
//! 删除最后访问时间早于保留期限的记录。删除按记录幂等，失败时放弃本轮，
//! 等待下一次调度。

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::RetentionConfig;
use crate::errors::{LinkerError, Result};
use crate::storage::AliasStore;

/// 默认保留天数
pub const DEFAULT_RETENTION_DAYS: i64 = 365;

pub struct RetentionSweeper {
    store: Arc<dyn AliasStore>,
    retention_days: i64,
}

/// 后台清理任务句柄
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn AliasStore>, retention_days: i64) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    pub fn from_config(store: Arc<dyn AliasStore>, config: &RetentionConfig) -> Self {
        Self::new(store, config.retention_days)
    }

    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    /// 计算清理截止时间；保留天数超出时间可表示范围时返回配置错误
    pub fn cutoff(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        Duration::try_days(self.retention_days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                LinkerError::config(format!(
                    "retention_days {} is out of range",
                    self.retention_days
                ))
            })
    }

    /// 执行一轮清理，返回删除数量
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<u64> {
        let cutoff = self.cutoff(now)?;
        debug!("Retention sweep started (cutoff: {})", cutoff.to_rfc3339());

        let deleted = self.store.delete_older_than(cutoff).await?;
        info!(
            "Retention sweep removed {} aliases idle for more than {} days",
            deleted, self.retention_days
        );
        Ok(deleted)
    }

    /// 启动后台清理任务
    ///
    /// 首次运行前等待 `initial_delay`，之后每隔 `interval` 运行一次。
    pub fn spawn_background_task(
        self: Arc<Self>,
        interval: StdDuration,
        initial_delay: StdDuration,
    ) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + initial_delay, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.sweep(Utc::now()).await {
                            error!("Retention sweep failed, will retry next run: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("Retention sweeper received shutdown signal");
                        break;
                    }
                }
            }
        });

        info!(
            "Retention sweeper started (interval: {}s, first run in {}s)",
            interval.as_secs(),
            initial_delay.as_secs()
        );

        SweeperHandle {
            shutdown_tx,
            handle,
        }
    }
}

impl SweeperHandle {
    /// 通知任务退出并等待结束；正在进行的一轮清理会先完成
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            error!("Retention sweeper task ended abnormally: {}", e);
        }
    }
}
