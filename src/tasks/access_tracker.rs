//! 访问时间异步写入
//!
//! 重定向只把事件放入有界队列，单个后台 worker 负责写入存储。
//! 队列满或已关闭时丢弃事件并记录 warn，写入失败同样只记录日志。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::storage::AliasStore;

#[derive(Debug)]
struct AccessEvent {
    code: String,
    at: DateTime<Utc>,
}

/// 事件发送端，可在多个 HTTP worker 间克隆
#[derive(Clone)]
pub struct AccessTracker {
    sender: mpsc::Sender<AccessEvent>,
}

/// 后台 worker 句柄，用于优雅关闭
pub struct AccessTrackerWorker {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl AccessTracker {
    /// 启动后台 worker
    pub fn spawn(store: Arc<dyn AliasStore>, capacity: usize) -> (Self, AccessTrackerWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(run_worker(store, receiver, shutdown_rx));
        debug!("Access tracker started (queue capacity: {})", capacity);

        (
            Self { sender },
            AccessTrackerWorker {
                shutdown_tx,
                handle,
            },
        )
    }

    /// 记录一次访问，不等待写入结果
    pub fn record(&self, code: &str, at: DateTime<Utc>) {
        let event = AccessEvent {
            code: code.to_string(),
            at,
        };
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(
                    "Access tracker queue is full, dropping last-access update for '{}'",
                    event.code
                );
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!(
                    "Access tracker is shut down, dropping last-access update for '{}'",
                    event.code
                );
            }
        }
    }
}

impl AccessTrackerWorker {
    /// 停止接收新事件，并在超时内写完队列中剩余的事件
    pub async fn shutdown(self, timeout: Duration) {
        let _ = self.shutdown_tx.send(true);

        match tokio::time::timeout(timeout, self.handle).await {
            Ok(Ok(())) => info!("Access tracker drained"),
            Ok(Err(e)) => warn!("Access tracker worker ended abnormally: {}", e),
            Err(_) => warn!(
                "Access tracker drain timed out after {} ms, pending updates dropped",
                timeout.as_millis()
            ),
        }
    }
}

async fn run_worker(
    store: Arc<dyn AliasStore>,
    mut receiver: mpsc::Receiver<AccessEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = receiver.recv() => match event {
                Some(event) => apply(store.as_ref(), event).await,
                None => break,
            },
            _ = shutdown_rx.changed() => {
                // 关闭后 try_send 立即返回 Closed，已入队的事件仍可读出
                receiver.close();
                let mut drained = 0usize;
                while let Some(event) = receiver.recv().await {
                    apply(store.as_ref(), event).await;
                    drained += 1;
                }
                debug!("Access tracker drained {} queued updates", drained);
                break;
            }
        }
    }
}

async fn apply(store: &dyn AliasStore, event: AccessEvent) {
    if let Err(e) = store.update_last_accessed(&event.code, event.at).await {
        warn!(
            "Failed to update last access of '{}': {}",
            event.code, e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LinkerError, Result};
    use crate::storage::{AliasRecord, MemoryStore};
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    #[tokio::test]
    async fn test_record_is_applied_and_drained() {
        let store = Arc::new(MemoryStore::new());
        let created = Utc::now() - ChronoDuration::days(10);
        store
            .insert(&AliasRecord::new("promo".into(), "https://example.com".into(), created))
            .await
            .unwrap();

        let (tracker, worker) = AccessTracker::spawn(store.clone(), 16);
        let at = Utc::now();
        tracker.record("promo", at);
        worker.shutdown(Duration::from_secs(5)).await;

        let record = store.find_by_code("promo").await.unwrap().unwrap();
        assert_eq!(record.last_accessed_at, at);
        assert_eq!(record.created_at, created);
    }

    #[tokio::test]
    async fn test_record_after_shutdown_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        let (tracker, worker) = AccessTracker::spawn(store, 4);
        worker.shutdown(Duration::from_secs(5)).await;

        // 不得 panic 或阻塞
        tracker.record("promo", Utc::now());
    }

    struct FailingStore;

    #[async_trait]
    impl AliasStore for FailingStore {
        async fn find_by_code(&self, _code: &str) -> Result<Option<AliasRecord>> {
            Ok(None)
        }
        async fn insert(&self, _record: &AliasRecord) -> Result<()> {
            Ok(())
        }
        async fn update_last_accessed(&self, _code: &str, _at: DateTime<Utc>) -> Result<()> {
            Err(LinkerError::store_connection("store unreachable"))
        }
        async fn delete_older_than(&self, _cutoff: DateTime<Utc>) -> Result<u64> {
            Ok(0)
        }
        fn backend_name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let (tracker, worker) = AccessTracker::spawn(Arc::new(FailingStore), 4);
        tracker.record("promo", Utc::now());
        tracker.record("other", Utc::now());
        worker.shutdown(Duration::from_secs(5)).await;
    }
}
