//! Per-entry metadata extracted from an archive layer

use crate::error::{ExtractError, InvalidFileInfo};
use crate::tree::diff::DiffType;
use crate::tree::hasher::ContentHasher;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{debug, error};

/// Archive entry type, keyed by the native one-byte tar type flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// `'0'`, or the legacy `'\0'` flag
    #[default]
    Regular,
    HardLink,
    Symlink,
    CharDevice,
    BlockDevice,
    Directory,
    Fifo,
    /// Any other tag, kept verbatim
    Other(u8),
}

impl EntryKind {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            b'0' | b'\0' => EntryKind::Regular,
            b'1' => EntryKind::HardLink,
            b'2' => EntryKind::Symlink,
            b'3' => EntryKind::CharDevice,
            b'4' => EntryKind::BlockDevice,
            b'5' => EntryKind::Directory,
            b'6' => EntryKind::Fifo,
            other => EntryKind::Other(other),
        }
    }

    /// Native tag byte (`Regular` always maps to `'0'`)
    pub fn tag(&self) -> u8 {
        match self {
            EntryKind::Regular => b'0',
            EntryKind::HardLink => b'1',
            EntryKind::Symlink => b'2',
            EntryKind::CharDevice => b'3',
            EntryKind::BlockDevice => b'4',
            EntryKind::Directory => b'5',
            EntryKind::Fifo => b'6',
            EntryKind::Other(tag) => *tag,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// Archive-native attributes, carried through without interpretation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryHeader {
    pub mode: u32,
    pub uid: u64,
    pub gid: u64,
    /// Declared payload size in bytes
    pub size: u64,
    /// Modification time, seconds since the Unix epoch
    pub mtime: u64,
    pub link_target: Option<String>,
    pub username: Option<String>,
    pub groupname: Option<String>,
}

/// Metadata and content fingerprint for one archive entry
///
/// `path`, `kind` and the fingerprint are fixed at construction so a
/// directory can never carry content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFileInfo")]
pub struct FileInfo {
    path: String,
    kind: EntryKind,
    fingerprint: u64,
    pub header: EntryHeader,
}

/// Unchecked wire shape of [`FileInfo`]
#[derive(Deserialize)]
struct RawFileInfo {
    path: String,
    kind: EntryKind,
    fingerprint: u64,
    header: EntryHeader,
}

impl TryFrom<RawFileInfo> for FileInfo {
    type Error = InvalidFileInfo;

    fn try_from(raw: RawFileInfo) -> Result<Self, Self::Error> {
        if raw.kind.is_dir() && raw.fingerprint != 0 {
            return Err(InvalidFileInfo::DirectoryFingerprint {
                path: raw.path,
                fingerprint: raw.fingerprint,
            });
        }
        Ok(Self {
            path: raw.path,
            kind: raw.kind,
            fingerprint: raw.fingerprint,
            header: raw.header,
        })
    }
}

impl FileInfo {
    /// Build a `FileInfo` by draining `reader` with a fresh default hasher
    ///
    /// See [`FileInfo::from_stream_with`].
    pub fn from_stream<R: Read>(
        reader: R,
        kind: EntryKind,
        header: EntryHeader,
        path: impl Into<String>,
    ) -> Result<Self, ExtractError> {
        Self::from_stream_with(&mut ContentHasher::new(), reader, kind, header, path)
    }

    /// Build a `FileInfo`, hashing the payload through `hasher`
    ///
    /// Directories never touch `reader` and get fingerprint `0`. For every
    /// other kind the stream is drained and must yield exactly
    /// `header.size` bytes.
    pub fn from_stream_with<R: Read>(
        hasher: &mut ContentHasher,
        reader: R,
        kind: EntryKind,
        header: EntryHeader,
        path: impl Into<String>,
    ) -> Result<Self, ExtractError> {
        let path = path.into();
        if kind.is_dir() {
            return Ok(Self::directory(path, header));
        }

        debug!(path = %path, size = header.size, "Reading entry");
        let digest = hasher
            .hash_reader(reader)
            .map_err(|source| ExtractError::StreamRead {
                path: path.clone(),
                source,
            })?;

        if digest.bytes_read != header.size {
            error!(
                path = %path,
                declared = header.size,
                actual = digest.bytes_read,
                "Entry payload does not match declared size"
            );
            return Err(ExtractError::SizeMismatch {
                path,
                declared: header.size,
                actual: digest.bytes_read,
            });
        }

        Ok(Self {
            path,
            kind,
            fingerprint: digest.fingerprint,
            header,
        })
    }

    /// Directory entry; carries no content
    pub fn directory(path: impl Into<String>, header: EntryHeader) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            fingerprint: 0,
            header,
        }
    }

    /// Canonical path within the archive
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Content fingerprint, `0` for directories
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Compare against the same path in another layer
    ///
    /// A type change always counts as `Changed`. Directories of the same
    /// type are `Unchanged` regardless of attributes. Never returns
    /// `Added` or `Removed`.
    pub fn compare(&self, other: &FileInfo) -> DiffType {
        if self.kind != other.kind {
            return DiffType::Changed;
        }
        if !self.kind.is_dir() && self.fingerprint != other.fingerprint {
            return DiffType::Changed;
        }
        DiffType::Unchanged
    }
}
