//! Error types for layer entry extraction and diffing.

use thiserror::Error;

/// Entry extraction errors
///
/// Every variant means the archive is unusable for the entry being read;
/// callers decide whether to abort the whole layer.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read content of '{path}': {source}")]
    StreamRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Size mismatch in '{path}': read {actual} bytes ({declared} expected)")]
    SizeMismatch {
        path: String,
        declared: u64,
        actual: u64,
    },

    #[error("Archive error: {0}")]
    Archive(#[from] std::io::Error),
}

/// Rejected [`crate::tree::entry::FileInfo`] field combinations
#[derive(Debug, Error)]
pub enum InvalidFileInfo {
    #[error("Directory '{path}' carries content fingerprint {fingerprint}")]
    DirectoryFingerprint { path: String, fingerprint: u64 },
}

/// Top-level errors surfaced by configuration and logging setup
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
