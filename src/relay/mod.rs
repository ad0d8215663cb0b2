//! Relay command layer
//!
//! Turns inbound `/start`, `/subscribe`, `/unsubscribe`, `/list` and broadcast
//! events into registry and dispatcher calls.

pub mod config;
pub mod service;

pub use config::RelayConfig;
pub use service::RelayService;
