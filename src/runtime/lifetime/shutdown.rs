use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::AliasStore;
use crate::tasks::{AccessTrackerWorker, SweeperHandle};

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// 访问时间队列排空超时（秒）
const TRACKER_DRAIN_TIMEOUT_SECS: u64 = 10;

/// 关闭阶段需要处理的后台资源
pub struct ShutdownTasks {
    pub store: Arc<dyn AliasStore>,
    pub tracker_worker: AccessTrackerWorker,
    pub sweeper: Option<SweeperHandle>,
}

/// 等待 Ctrl+C（Unix 下同时监听 SIGTERM）
pub async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    res = tokio::signal::ctrl_c() => log_ctrl_c(res),
                    _ = sigterm.recv() => info!("SIGTERM received, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                log_ctrl_c(tokio::signal::ctrl_c().await);
            }
        }
    }

    #[cfg(not(unix))]
    log_ctrl_c(tokio::signal::ctrl_c().await);
}

fn log_ctrl_c(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Shutdown signal received, flushing data..."),
        Err(e) => warn!(
            "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
            e
        ),
    }
}

/// 停止清理任务、排空访问时间队列并关闭存储
pub async fn listen_for_shutdown(tasks: ShutdownTasks) {
    let shutdown_result = timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        perform_shutdown_tasks(tasks),
    )
    .await;

    match shutdown_result {
        Ok(()) => info!("All shutdown tasks completed successfully"),
        Err(_) => error!(
            "Shutdown tasks timed out after {} seconds, exiting anyway",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}

async fn perform_shutdown_tasks(tasks: ShutdownTasks) {
    if let Some(sweeper) = tasks.sweeper {
        sweeper.stop().await;
        info!("Retention sweeper stopped");
    }

    tasks
        .tracker_worker
        .shutdown(Duration::from_secs(TRACKER_DRAIN_TIMEOUT_SECS))
        .await;

    if let Err(e) = tasks.store.close().await {
        error!("Failed to close store: {}", e);
    }
}
