//! Crate-level error type

use thiserror::Error;

use crate::registry::RegistryError;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error
#[derive(Debug, Error)]
pub enum Error {
    /// Subscription storage failed; the mutation must be treated as not applied
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),
}
