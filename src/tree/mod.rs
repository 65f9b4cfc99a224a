//! Layer File Tree
//!
//! Per-entry metadata, content fingerprints, and diff classification for
//! comparing filesystem snapshots taken from sequential archive layers.

pub mod archive;
pub mod diff;
pub mod entry;
pub mod hasher;
pub mod node;
pub mod path;

pub use diff::DiffType;
pub use entry::{EntryHeader, EntryKind, FileInfo};
pub use hasher::{ContentDigest, ContentHasher, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
pub use node::{NodeData, ViewInfo};
