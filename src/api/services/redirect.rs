use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, web};
use tracing::trace;

use super::fallback::error_response;
use crate::errors::LinkerError;
use crate::services::RedirectResolver;

const NOT_FOUND_PAGE: &str = include_str!("../static/not_found.html");

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        resolver: web::Data<Arc<RedirectResolver>>,
    ) -> HttpResponse {
        let code = path.into_inner();

        match resolver.resolve(&code).await {
            Ok(target) => {
                trace!("Redirecting {} -> {}", code, target);
                HttpResponse::build(StatusCode::MOVED_PERMANENTLY)
                    .insert_header((header::LOCATION, target))
                    .finish()
            }
            Err(LinkerError::NotFound(_)) => Self::not_found_response(),
            Err(e) => error_response(&e),
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
            .insert_header((header::CACHE_CONTROL, "public, max-age=60"))
            .body(NOT_FOUND_PAGE)
    }
}

pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{code}")
        .route(web::get().to(RedirectService::handle_redirect))
        .route(web::head().to(RedirectService::handle_redirect))
        .default_service(web::to(super::route_not_found))
}
