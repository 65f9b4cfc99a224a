//! Per-node payload attached to a layer tree

use crate::config::FiletreeConfig;
use crate::tree::diff::DiffType;
use crate::tree::entry::FileInfo;
use serde::{Deserialize, Serialize};

/// UI-facing flags for one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewInfo {
    pub collapsed: bool,
    pub hidden: bool,
}

impl ViewInfo {
    pub fn new(config: &FiletreeConfig) -> Self {
        Self {
            collapsed: config.collapse_dir,
            hidden: false,
        }
    }
}

/// Payload of one tree node
///
/// Every field is an owned value, so `clone()` yields a fully independent
/// copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub view_info: ViewInfo,
    pub file_info: FileInfo,
    pub diff_type: DiffType,
}

impl NodeData {
    /// Empty node: zero-value entry, configured view defaults, `Unchanged`
    pub fn new(config: &FiletreeConfig) -> Self {
        Self {
            view_info: ViewInfo::new(config),
            file_info: FileInfo::default(),
            diff_type: DiffType::Unchanged,
        }
    }
}

impl Default for NodeData {
    fn default() -> Self {
        Self::new(&FiletreeConfig::default())
    }
}
