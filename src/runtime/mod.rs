//! Application lifecycle and execution modes
//!
//! - `lifetime`: startup wiring and graceful shutdown
//! - `modes`: entry points for `serve` and `sweep`

pub mod lifetime;
pub mod modes;
