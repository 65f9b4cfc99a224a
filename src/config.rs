//! Configuration System
//!
//! Layered configuration for layer diffing: built-in defaults, then the global
//! config file, then workspace config files, then `LAYERDIFF_*` environment
//! variables. Values are resolved once and handed to constructors explicitly.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::tree::hasher::{ContentHasher, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::resolve_global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerDiffConfig {
    /// File tree defaults
    #[serde(default)]
    pub filetree: FiletreeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// File tree settings consulted when nodes and hashers are created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiletreeConfig {
    /// Collapse directories by default
    #[serde(default)]
    pub collapse_dir: bool,

    /// Read chunk size for content hashing (bytes)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for FiletreeConfig {
    fn default() -> Self {
        Self {
            collapse_dir: false,
            chunk_size: default_chunk_size(),
        }
    }
}

impl FiletreeConfig {
    /// Hasher using the configured chunk size
    pub fn hasher(&self) -> ContentHasher {
        ContentHasher::with_chunk_size(self.chunk_size)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than zero".to_string());
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!(
                "chunk_size must not exceed {} bytes, got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Filetree(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Filetree(msg) => write!(f, "Filetree: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl LayerDiffConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.filetree.validate() {
            errors.push(ValidationError::Filetree(e));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Load and validate configuration for `workspace_root`
    pub fn load(workspace_root: &Path) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(workspace_root)?;
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(config)
    }
}
