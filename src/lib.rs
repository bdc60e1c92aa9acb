//! Linkkeeper - a small URL shortener service
//!
//! Maps long URLs to short codes, redirects visitors with `301`, and deletes
//! aliases that have not been visited for a configurable retention period.
//!
//! # Architecture
//! - `utils`: alias codec, random codes and URL validation
//! - `storage`: the `AliasStore` interface with SeaORM and in-memory backends
//! - `services`: code reservation, the Shorten flow and redirect resolution
//! - `tasks`: access-time tracker and retention sweeper
//! - `api`: HTTP handlers and middleware
//! - `config`: static configuration
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod tasks;
pub mod utils;
