use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{LinkService, RedirectResolver};
use crate::storage::{AliasStore, StoreFactory};
use crate::tasks::{AccessTracker, AccessTrackerWorker, RetentionSweeper, SweeperHandle};

pub struct StartupContext {
    pub store: Arc<dyn AliasStore>,
    pub link_service: Arc<LinkService>,
    pub redirect_resolver: Arc<RedirectResolver>,
    pub tracker_worker: AccessTrackerWorker,
    /// `retention.enabled = false` 时为 None
    pub sweeper: Option<SweeperHandle>,
}

/// 准备服务器启动的上下文
///
/// 依次创建存储、访问时间写入队列、业务服务和后台清理任务。
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StoreFactory::create(&config.database)
        .await
        .context("Failed to create alias store")?;
    info!("Using store backend: {}", store.backend_name());

    let (tracker, tracker_worker) =
        AccessTracker::spawn(store.clone(), config.tracker.queue_capacity);

    let link_service = Arc::new(LinkService::new(store.clone(), &config.server.base_url));
    let redirect_resolver = Arc::new(RedirectResolver::new(store.clone(), tracker));
    info!("Short links will be issued under {}", link_service.base_url());

    let sweeper = if config.retention.enabled {
        let sweeper = Arc::new(RetentionSweeper::from_config(
            store.clone(),
            &config.retention,
        ));
        Some(sweeper.spawn_background_task(
            Duration::from_secs(config.retention.sweep_interval_hours.saturating_mul(60 * 60)),
            Duration::from_secs(config.retention.initial_delay_secs),
        ))
    } else {
        info!("Retention sweeper is disabled");
        None
    };

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        store,
        link_service,
        redirect_resolver,
        tracker_worker,
        sweeper,
    })
}
