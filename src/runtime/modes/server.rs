//! Server mode
//!
//! Binds the HTTP server, then waits for either the server to exit or a
//! shutdown signal. Background tasks are stopped after the server has
//! stopped accepting requests.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::api::configure_routes;
use crate::api::middleware::RequestTiming;
use crate::config::StaticConfig;
use crate::runtime::lifetime::{self, shutdown::ShutdownTasks};

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .map_err(|e| {
            error!("Server startup failed: {}", e);
            e
        })?;

    let link_service = startup.link_service.clone();
    let redirect_resolver = startup.redirect_resolver.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    info!("Using {} worker threads for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestTiming)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(redirect_resolver.clone()))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    warn!("Server listening at http://{}", bind_address);

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    // 等待服务退出或关闭信号
    let stopped_by_signal = tokio::select! {
        res = &mut server_task => {
            match res {
                Ok(Ok(())) => warn!("HTTP server exited"),
                Ok(Err(e)) => error!("HTTP server failed: {}", e),
                Err(e) => error!("HTTP server task aborted: {}", e),
            }
            false
        }
        _ = lifetime::shutdown::wait_for_signal() => true,
    };

    if stopped_by_signal {
        // 先停止接收请求，再排空后台队列
        server_handle.stop(true).await;
        if let Err(e) = server_task.await {
            error!("HTTP server task aborted during shutdown: {}", e);
        }
        info!("HTTP server stopped");
    }

    lifetime::shutdown::listen_for_shutdown(ShutdownTasks {
        store: startup.store,
        tracker_worker: startup.tracker_worker,
        sweeper: startup.sweeper,
    })
    .await;

    warn!("Graceful shutdown: all tasks completed");
    Ok(())
}
