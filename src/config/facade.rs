//! Config loading entry points.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::LayerDiffConfig;
use config::{ConfigError, File, Map};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves [`LayerDiffConfig`] from all configured sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace using the process environment
    pub fn load(workspace_root: &Path) -> Result<LayerDiffConfig, ConfigError> {
        Self::load_with_env(workspace_root, None)
    }

    /// Load configuration, reading environment overrides from `vars` when given
    pub fn load_with_env(
        workspace_root: &Path,
        vars: Option<Map<String, String>>,
    ) -> Result<LayerDiffConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder, vars);

        let config: LayerDiffConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            collapse_dir = config.filetree.collapse_dir,
            chunk_size = config.filetree.chunk_size,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from a single file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<LayerDiffConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only
    pub fn defaults() -> Result<LayerDiffConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .build()?
            .try_deserialize()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
