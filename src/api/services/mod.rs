pub mod fallback;
pub mod health;
pub mod redirect;
pub mod shorten;
pub mod types;

use actix_web::web;

pub use fallback::route_not_found;
pub use health::{HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use shorten::{ShortenService, json_config, shorten_routes};
pub use types::{ErrorResponse, HealthResponse, ShortenRequest, ShortenResponse};

/// 注册全部路由
///
/// 依赖 `web::Data<Arc<LinkService>>` 与 `web::Data<Arc<RedirectResolver>>`。
/// `/{code}` 必须最后注册。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health_routes())
        .service(shorten_routes())
        .service(redirect_routes())
        .default_service(web::to(route_not_found));
}
