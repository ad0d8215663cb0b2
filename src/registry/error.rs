//! Registry error types
//!
//! Error types for subscription storage operations.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for registry storage operations
///
/// A parse failure while loading is never surfaced here: a corrupt document is
/// recovered by starting empty. Everything below is fatal to the operation that
/// hit it.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The backing document exists but could not be read
    #[error("failed to read subscription file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing, syncing or renaming the document failed
    #[error("failed to write subscription file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory document could not be encoded
    #[error("failed to encode subscription document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RegistryError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::Write {
            path: path.into(),
            source,
        }
    }
}
