//! Relay configuration

use std::time::Duration;

use crate::auth::AllowList;
use crate::dispatch::DispatchConfig;
use crate::error::{Error, Result};
use crate::registry::RegistryConfig;

/// Environment variable naming the subscription document
pub const ENV_SUBSCRIPTIONS_FILE: &str = "SUBSCRIPTIONS_FILE";
/// Environment variable listing users allowed to broadcast
pub const ENV_ALLOWED_USER_IDS: &str = "TELEGRAM_ALLOWED_USER_IDS";
/// Environment variable with the per-send timeout in seconds (0 disables it)
pub const ENV_SEND_TIMEOUT_SECS: &str = "RELAY_SEND_TIMEOUT_SECS";
/// Environment variable toggling quarantine of corrupt documents
pub const ENV_QUARANTINE_CORRUPT: &str = "RELAY_QUARANTINE_CORRUPT";

/// Relay configuration options
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Subscription storage
    pub registry: RegistryConfig,

    /// Broadcast fan-out
    pub dispatch: DispatchConfig,

    /// Users allowed to broadcast (empty = everyone)
    pub allowed_users: AllowList,
}

impl RelayConfig {
    /// Build from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_SUBSCRIPTIONS_FILE).filter(|p| !p.trim().is_empty()) {
            config.registry = config.registry.path(path.trim());
        }

        if let Some(raw) = lookup(ENV_ALLOWED_USER_IDS) {
            config.allowed_users = AllowList::parse(&raw);
        }

        if let Some(raw) = lookup(ENV_SEND_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_SEND_TIMEOUT_SECS, raw
                ))
            })?;
            config.dispatch = if secs == 0 {
                config.dispatch.no_timeout()
            } else {
                config.dispatch.send_timeout(Duration::from_secs(secs))
            };
        }

        if let Some(raw) = lookup(ENV_QUARANTINE_CORRUPT) {
            let enabled = parse_flag(&raw).ok_or_else(|| {
                Error::Config(format!(
                    "{} must be true or false, got {:?}",
                    ENV_QUARANTINE_CORRUPT, raw
                ))
            })?;
            config.registry = config.registry.quarantine_corrupt(enabled);
        }

        Ok(config)
    }

    /// Set the registry configuration
    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Set the dispatcher configuration
    pub fn dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Set the broadcast allow-list
    pub fn allowed_users(mut self, allowed: AllowList) -> Self {
        self.allowed_users = allowed;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
