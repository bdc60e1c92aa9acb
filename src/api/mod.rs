//! HTTP surface
//!
//! - `services`: request handlers and route table
//! - `middleware`: request timing

pub mod middleware;
pub mod services;

pub use services::configure_routes;
