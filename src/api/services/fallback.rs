use actix_web::{HttpRequest, HttpResponse};
use tracing::trace;

use super::types::ErrorResponse;
use crate::errors::LinkerError;

pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    trace!("No route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(ErrorResponse::new("Route not found"))
}

/// 把服务层错误转换为 JSON 响应
///
/// 存储类错误只在日志中保留细节，对客户端返回通用信息。
pub fn error_response(err: &LinkerError) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(err.status_code())
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

    let message = if err.is_store_error() {
        tracing::error!("{} [{}]", err, err.code());
        "Internal server error".to_string()
    } else {
        if status.is_server_error() {
            tracing::error!("{} [{}]", err, err.code());
        }
        err.message()
    };

    HttpResponse::build(status).json(ErrorResponse::new(message))
}
