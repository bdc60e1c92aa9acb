use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, error::InternalError, error::JsonPayloadError, web};
use tracing::debug;

use super::fallback::error_response;
use super::types::{ErrorResponse, ShortenRequest, ShortenResponse};
use crate::services::LinkService;

/// 请求体上限
const MAX_BODY_BYTES: usize = 16 * 1024;

pub struct ShortenService;

impl ShortenService {
    pub async fn shorten(
        body: web::Json<ShortenRequest>,
        link_service: web::Data<Arc<LinkService>>,
    ) -> HttpResponse {
        let req = body.into_inner();
        debug!(
            "Shorten request: url={} custom_name={:?}",
            req.original_url, req.custom_name
        );

        match link_service
            .shorten(&req.original_url, req.custom_name.as_deref())
            .await
        {
            Ok(result) => HttpResponse::Created().json(ShortenResponse {
                success: true,
                short_url: result.short_url,
                short_code: result.short_code,
            }),
            Err(e) => error_response(&e),
        }
    }
}

/// JSON 解析失败时返回 400 `{success:false, message}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            format!("Invalid request body: {}", e)
        }
        _ => "Malformed JSON request body".to_string(),
    };
    debug!("Rejected shorten body: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorResponse::new(message));
    InternalError::from_response(err, response).into()
}

pub fn shorten_routes() -> actix_web::Resource {
    web::resource("/shorten")
        .route(web::post().to(ShortenService::shorten))
        .default_service(web::to(super::route_not_found))
}
