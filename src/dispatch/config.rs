//! Dispatcher configuration

use std::time::Duration;

/// Default per-send timeout
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatcher configuration options
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound for a single send; expiry counts as a transient failure
    pub send_timeout: Option<Duration>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            send_timeout: Some(DEFAULT_SEND_TIMEOUT),
        }
    }
}

impl DispatchConfig {
    /// Set the per-send timeout
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    /// Wait for the transport as long as it takes
    pub fn no_timeout(mut self) -> Self {
        self.send_timeout = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(
            DispatchConfig::default().send_timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_builder() {
        let config = DispatchConfig::default().send_timeout(Duration::from_millis(250));
        assert_eq!(config.send_timeout, Some(Duration::from_millis(250)));

        let config = config.no_timeout();
        assert!(config.send_timeout.is_none());
    }
}
