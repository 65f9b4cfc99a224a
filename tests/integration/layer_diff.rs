//! End-to-end diffing of two tar layers
//!
//! Pairs entries by path the way a tree builder would, then rolls statuses up
//! to their parent directories.

use super::test_utils::{build_layer, index_layer, Fixture};
use layerdiff::tree::archive::read_layer;
use layerdiff::{DiffType, EntryHeader, EntryKind, ExtractError, FileInfo, FiletreeConfig};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;

/// Per-path status for every path present in either layer
fn diff_layers(
    lower: &BTreeMap<String, FileInfo>,
    upper: &BTreeMap<String, FileInfo>,
) -> BTreeMap<String, DiffType> {
    let paths: BTreeSet<&String> = lower.keys().chain(upper.keys()).collect();
    paths
        .into_iter()
        .filter_map(|path| {
            DiffType::between(lower.get(path), upper.get(path)).map(|diff| (path.clone(), diff))
        })
        .collect()
}

/// Fold the statuses of a directory's direct children
fn directory_status(statuses: &BTreeMap<String, DiffType>, dir: &str) -> DiffType {
    let prefix = format!("{}/", dir);
    DiffType::merge_all(
        statuses
            .iter()
            .filter(|(path, _)| {
                path.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|(_, diff)| *diff),
    )
}

#[test]
fn test_directory_attributes_do_not_matter() {
    let lower = FileInfo::directory(
        "/etc",
        EntryHeader {
            mtime: 1,
            ..Default::default()
        },
    );
    let upper = FileInfo::directory(
        "/etc",
        EntryHeader {
            mtime: 2,
            mode: 0o700,
            ..Default::default()
        },
    );
    assert_eq!(lower.compare(&upper), DiffType::Unchanged);
}

#[test]
fn test_content_change_between_layers() {
    let lower = index_layer(&build_layer(&[Fixture::Dir("bin/"), Fixture::File("bin/sh", b"abc")]));
    let upper = index_layer(&build_layer(&[Fixture::Dir("bin/"), Fixture::File("bin/sh", b"abcd")]));

    let statuses = diff_layers(&lower, &upper);
    assert_eq!(statuses["/bin/sh"], DiffType::Changed);
    assert_eq!(statuses["/bin"], DiffType::Unchanged);
    assert_eq!(directory_status(&statuses, "/bin"), DiffType::Changed);
}

#[test]
fn test_added_and_removed_paths() {
    let lower = index_layer(&build_layer(&[
        Fixture::Dir("tmp/"),
        Fixture::File("tmp/old", b"old"),
    ]));
    let upper = index_layer(&build_layer(&[
        Fixture::Dir("tmp/"),
        Fixture::File("tmp/x", b"new"),
    ]));

    let statuses = diff_layers(&lower, &upper);
    assert_eq!(statuses["/tmp/x"], DiffType::Added);
    assert_eq!(statuses["/tmp/old"], DiffType::Removed);
    assert_eq!(directory_status(&statuses, "/tmp"), DiffType::Changed);
}

#[test]
fn test_uniform_children_keep_their_status() {
    let lower = index_layer(&build_layer(&[Fixture::Dir("opt/")]));
    let upper = index_layer(&build_layer(&[
        Fixture::Dir("opt/"),
        Fixture::File("opt/a", b"a"),
        Fixture::File("opt/b", b"b"),
    ]));

    let statuses = diff_layers(&lower, &upper);
    assert_eq!(directory_status(&statuses, "/opt"), DiffType::Added);
}

#[test]
fn test_mixed_children_fold_to_changed() {
    let children = [DiffType::Unchanged, DiffType::Unchanged, DiffType::Added];
    let folded = children
        .iter()
        .copied()
        .reduce(DiffType::merge)
        .unwrap();
    assert_eq!(folded, DiffType::Changed);
}

#[test]
fn test_identical_layers_are_unchanged() {
    let fixtures = [
        Fixture::Dir("usr/"),
        Fixture::Dir("usr/bin/"),
        Fixture::File("usr/bin/env", b"#!/bin/sh\n"),
        Fixture::Symlink("usr/bin/sh", "/bin/bash"),
    ];
    let lower = index_layer(&build_layer(&fixtures));
    let upper = index_layer(&build_layer(&fixtures));

    let statuses = diff_layers(&lower, &upper);
    assert!(statuses.values().all(|diff| *diff == DiffType::Unchanged));
    assert_eq!(directory_status(&statuses, "/usr/bin"), DiffType::Unchanged);
}

#[test]
fn test_file_replaced_by_directory() {
    let lower = index_layer(&build_layer(&[Fixture::File("data", b"")]));
    let upper = index_layer(&build_layer(&[Fixture::Dir("data/")]));

    assert_eq!(lower["/data"].kind(), EntryKind::Regular);
    assert_eq!(upper["/data"].kind(), EntryKind::Directory);
    assert_eq!(diff_layers(&lower, &upper)["/data"], DiffType::Changed);
}

#[test]
fn test_short_payload_is_fatal() {
    let header = EntryHeader {
        size: 100,
        ..Default::default()
    };
    let err = FileInfo::from_stream(
        Cursor::new(vec![7u8; 80]),
        EntryKind::Regular,
        header,
        "/short",
    )
    .unwrap_err();

    match err {
        ExtractError::SizeMismatch {
            path,
            declared,
            actual,
        } => {
            assert_eq!(path, "/short");
            assert_eq!(declared, 100);
            assert_eq!(actual, 80);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_long_payload_is_fatal() {
    let header = EntryHeader {
        size: 4,
        ..Default::default()
    };
    let err = FileInfo::from_stream(
        Cursor::new(b"abcdef".to_vec()),
        EntryKind::Regular,
        header,
        "/long",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ExtractError::SizeMismatch {
            declared: 4,
            actual: 6,
            ..
        }
    ));
}

#[test]
fn test_truncated_archive_is_fatal() {
    let mut header = tar::Header::new_gnu();
    header.set_path("etc/truncated").unwrap();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(100);
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(1_700_000_000);
    header.set_cksum();

    let mut bytes = header.as_bytes().to_vec();
    bytes.extend_from_slice(&[1u8; 80]);

    let err = read_layer(&bytes[..], &FiletreeConfig::default()).unwrap_err();
    match err {
        ExtractError::SizeMismatch {
            path,
            declared,
            actual,
        } => {
            assert_eq!(path, "/etc/truncated");
            assert_eq!(declared, 100);
            assert_eq!(actual, 80);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_out_of_range_status_renders_number() {
    assert_eq!(DiffType::label(7), "7");
}
