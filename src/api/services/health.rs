use actix_web::{HttpResponse, Responder, web};
use chrono::{SecondsFormat, Utc};
use tracing::trace;

use super::types::HealthResponse;

/// Health Service
///
/// 只报告进程存活，不访问存储。
pub struct HealthService;

impl HealthService {
    pub async fn health_check() -> impl Responder {
        trace!("Received health check request");
        HttpResponse::Ok().json(HealthResponse {
            status: "OK".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }
}

pub fn health_routes() -> actix_web::Resource {
    web::resource("/health")
        .route(web::get().to(HealthService::health_check))
        .route(web::head().to(HealthService::health_check))
}
