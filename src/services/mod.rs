//! Core link services
//!
//! - `reservation`: picks a short code that is free at reservation time
//! - `link_service`: the Shorten flow
//! - `redirect`: code lookup for redirects

pub mod link_service;
pub mod redirect;
pub mod reservation;

pub use link_service::{LinkService, MAX_INSERT_ATTEMPTS, ShortenResult};
pub use redirect::RedirectResolver;
pub use reservation::{AliasRequest, MAX_RANDOM_ATTEMPTS, RANDOM_CODE_LENGTH, UniquenessResolver};
