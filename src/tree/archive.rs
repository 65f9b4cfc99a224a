//! Tar layer adapter
//!
//! Turns `tar` entries into [`FileInfo`] records. Layers are read in archive
//! order; building a tree out of them and pairing layers is left to the caller.

use crate::config::FiletreeConfig;
use crate::error::ExtractError;
use crate::tree::entry::{EntryHeader, EntryKind, FileInfo};
use crate::tree::hasher::ContentHasher;
use crate::tree::path::normalize_entry_path;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

impl From<tar::EntryType> for EntryKind {
    fn from(entry_type: tar::EntryType) -> Self {
        EntryKind::from_tag(entry_type.as_byte())
    }
}

/// Attribute overrides carried by a pax extended header
#[derive(Debug, Default)]
struct PaxOverrides {
    uid: Option<u64>,
    gid: Option<u64>,
    mtime: Option<u64>,
    username: Option<String>,
    groupname: Option<String>,
}

impl PaxOverrides {
    fn read<R: Read>(entry: &mut tar::Entry<'_, R>) -> Result<Self, ExtractError> {
        let mut overrides = PaxOverrides::default();
        let Some(extensions) = entry.pax_extensions()? else {
            return Ok(overrides);
        };

        for extension in extensions {
            let extension = extension?;
            let (Ok(key), Ok(value)) = (extension.key(), extension.value()) else {
                continue;
            };
            match key {
                "uid" => overrides.uid = pax_number(key, value),
                "gid" => overrides.gid = pax_number(key, value),
                // Fractional seconds are dropped
                "mtime" => {
                    let seconds = value.split('.').next().unwrap_or_default();
                    overrides.mtime = pax_number(key, seconds);
                }
                "uname" => overrides.username = Some(value.to_string()),
                "gname" => overrides.groupname = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(overrides)
    }
}

fn pax_number(key: &str, value: &str) -> Option<u64> {
    match value.trim().parse() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!(key, value, "Ignoring unparsable pax record");
            None
        }
    }
}

/// A numeric header field left empty (all NUL or space) reads as `0`
fn numeric_field<T: Default>(
    raw: &[u8],
    parse: impl FnOnce() -> std::io::Result<T>,
) -> std::io::Result<T> {
    if raw.iter().all(|b| *b == 0 || *b == b' ') {
        return Ok(T::default());
    }
    parse()
}

/// Copy the native attributes of a tar entry
///
/// Pax records for `uid`, `gid`, `mtime`, `uname` and `gname` win over the
/// ustar fields. Empty numeric fields are read as `0`; malformed ones fail.
pub fn entry_header<R: Read>(entry: &mut tar::Entry<'_, R>) -> Result<EntryHeader, ExtractError> {
    let pax = PaxOverrides::read(entry)?;
    let link_target = entry
        .link_name()?
        .map(|target| target.to_string_lossy().into_owned());

    let header = entry.header();
    let raw = header.as_old();
    let uid = match pax.uid {
        Some(uid) => uid,
        None => numeric_field(&raw.uid, || header.uid())?,
    };
    let gid = match pax.gid {
        Some(gid) => gid,
        None => numeric_field(&raw.gid, || header.gid())?,
    };
    let mtime = match pax.mtime {
        Some(mtime) => mtime,
        None => numeric_field(&raw.mtime, || header.mtime())?,
    };

    Ok(EntryHeader {
        mode: numeric_field(&raw.mode, || header.mode())?,
        uid,
        gid,
        size: entry.size(),
        mtime,
        link_target,
        username: pax
            .username
            .or_else(|| header.username().ok().flatten().map(str::to_string)),
        groupname: pax
            .groupname
            .or_else(|| header.groupname().ok().flatten().map(str::to_string)),
    })
}

/// Build a [`FileInfo`] from one tar entry, consuming its payload
pub fn file_info_from_tar<R: Read>(
    entry: &mut tar::Entry<'_, R>,
    hasher: &mut ContentHasher,
) -> Result<FileInfo, ExtractError> {
    let path = normalize_entry_path(&entry.path()?.to_string_lossy());
    let kind = EntryKind::from(entry.header().entry_type());
    let header = entry_header(entry)?;

    FileInfo::from_stream_with(hasher, entry, kind, header, path)
}

/// Read every entry of one tar layer
///
/// Pax global headers are skipped. The first broken entry aborts the whole
/// layer.
#[instrument(skip_all, fields(chunk_size = config.chunk_size))]
pub fn read_layer<R: Read>(reader: R, config: &FiletreeConfig) -> Result<Vec<FileInfo>, ExtractError> {
    let start = Instant::now();
    let mut hasher = config.hasher();
    let mut archive = tar::Archive::new(reader);
    let mut infos = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.header().entry_type() == tar::EntryType::XGlobalHeader {
            debug!("Skipping pax global header");
            continue;
        }
        infos.push(file_info_from_tar(&mut entry, &mut hasher)?);
    }

    info!(
        entry_count = infos.len(),
        duration_ms = start.elapsed().as_millis(),
        "Layer read"
    );
    Ok(infos)
}
