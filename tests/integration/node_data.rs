//! NodeData lifecycle: construction from config, population, and copying

use layerdiff::config::ConfigLoader;
use layerdiff::{DiffType, EntryHeader, EntryKind, FileInfo, FiletreeConfig, NodeData};
use std::io::Cursor;

fn populated(config: &FiletreeConfig) -> NodeData {
    let mut node = NodeData::new(config);
    let content = b"payload";
    node.file_info = FileInfo::from_stream(
        Cursor::new(content),
        EntryKind::Regular,
        EntryHeader {
            size: content.len() as u64,
            mode: 0o644,
            username: Some("root".to_string()),
            ..Default::default()
        },
        "/srv/payload",
    )
    .unwrap();
    node
}

#[test]
fn test_lifecycle() {
    let config = ConfigLoader::defaults().unwrap().filetree;
    let mut node = populated(&config);
    assert_eq!(node.diff_type, DiffType::Unchanged);

    let counterpart = populated(&config);
    node.diff_type = node.file_info.compare(&counterpart.file_info);
    assert_eq!(node.diff_type, DiffType::Unchanged);

    node.diff_type = node.diff_type.merge(DiffType::Added);
    assert_eq!(node.diff_type, DiffType::Changed);
}

#[test]
fn test_collapsed_default_flows_from_config() {
    let config = FiletreeConfig {
        collapse_dir: true,
        ..Default::default()
    };
    assert!(NodeData::new(&config).view_info.collapsed);
    assert!(!NodeData::new(&FiletreeConfig::default()).view_info.collapsed);
}

#[test]
fn test_copy_independence() {
    let source = populated(&FiletreeConfig::default());
    let mut copy = source.clone();
    assert_eq!(copy, source);

    copy.view_info.collapsed = true;
    copy.file_info = FileInfo::directory("/elsewhere", EntryHeader::default());
    copy.diff_type = DiffType::Added;

    assert!(!source.view_info.collapsed);
    assert_eq!(source.file_info.path(), "/srv/payload");
    assert_eq!(source.file_info.kind(), EntryKind::Regular);
    assert_ne!(source.file_info.fingerprint(), 0);
    assert_eq!(source.diff_type, DiffType::Unchanged);

    let mut second = source.clone();
    second.file_info.header.username = Some("nobody".to_string());
    assert_eq!(source.file_info.header.username.as_deref(), Some("root"));
    assert_eq!(second.file_info.fingerprint(), source.file_info.fingerprint());
}

#[test]
fn test_status_serializes_by_label() {
    let mut node = NodeData::default();
    node.diff_type = DiffType::Removed;
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["diff_type"], "Removed");
    assert_eq!(json["view_info"]["hidden"], false);
}
