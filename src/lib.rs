//! Layerdiff: Content-Addressed Layer Diffing
//!
//! Fingerprints filesystem entries read from sequential archive layers,
//! classifies each path as unchanged, changed, added, or removed between two
//! snapshots, and folds those classifications up a directory tree.

pub mod config;
pub mod error;
pub mod logging;
pub mod tree;

pub use config::{FiletreeConfig, LayerDiffConfig};
pub use error::{ApiError, ExtractError};
pub use tree::{
    ContentDigest, ContentHasher, DiffType, EntryHeader, EntryKind, FileInfo, NodeData, ViewInfo,
};
