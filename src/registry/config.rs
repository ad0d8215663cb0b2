//! Registry configuration

use std::path::{Path, PathBuf};

/// Default location of the subscription document
pub const DEFAULT_STORAGE_PATH: &str = "data/subscriptions.json";

/// Registry configuration options
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Path of the JSON document holding all members
    pub path: PathBuf,

    /// Rename an unparsable document aside instead of silently overwriting it
    pub quarantine_corrupt: bool,

    /// Write indented JSON
    pub pretty: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
            quarantine_corrupt: true,
            pretty: true,
        }
    }
}

impl RegistryConfig {
    /// Create a config for the given document path
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the document path
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Choose whether corrupt documents are renamed aside
    pub fn quarantine_corrupt(mut self, enabled: bool) -> Self {
        self.quarantine_corrupt = enabled;
        self
    }

    /// Write compact JSON
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Path of the scratch file used for atomic replacement
    pub(crate) fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.path, PathBuf::from("data/subscriptions.json"));
        assert!(config.quarantine_corrupt);
        assert!(config.pretty);
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .path("/tmp/subs.json")
            .quarantine_corrupt(false)
            .compact();

        assert_eq!(config.path, PathBuf::from("/tmp/subs.json"));
        assert!(!config.quarantine_corrupt);
        assert!(!config.pretty);
    }

    #[test]
    fn test_temp_path_sits_next_to_document() {
        let config = RegistryConfig::with_path("/var/lib/relay/subscriptions.json");
        assert_eq!(
            config.temp_path(),
            PathBuf::from("/var/lib/relay/subscriptions.tmp")
        );
    }
}
