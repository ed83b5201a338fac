use crate::common::test_utils::write_file;
use mimemagic::{MagicConfig, MagicError, MimeMagic, RuleTable};
use tempfile::TempDir;

#[test]
fn config_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "mimemagic.json",
        br#"{
            "follow_links": true,
            "atime_dirs": ["/srv/incoming"],
            "io": { "max_window": 1024 }
        }"#,
    );
    let config = MagicConfig::from_json_file(&path).unwrap();
    assert!(config.follow_links);
    assert_eq!(config.io.max_window, 1024);
    assert_eq!(config.atime_dirs.len(), 1);
    assert!(config.rule_files.is_empty());
}

#[test]
fn links_are_not_followed_by_default() {
    assert!(!MagicConfig::default().follow_links);
    let config = MagicConfig::from_json_str("{}").unwrap();
    assert!(!config.follow_links);
}

#[test]
fn missing_config_file_is_io_error() {
    let err = MagicConfig::from_json_file("/nonexistent/mimemagic.json").unwrap_err();
    assert!(matches!(err, MagicError::Io(_)));
}

#[test]
fn configured_rule_files_are_merged() {
    let dir = TempDir::new().unwrap();
    let local = write_file(&dir, "local.magic", b"0\tstring\tLOCAL\tapplication/x-local\n");
    let config = MagicConfig {
        rule_files: vec![dir.path().join("missing.magic"), local],
        ..Default::default()
    };

    let magic = MimeMagic::with_config(RuleTable::new(), config);
    assert_eq!(magic.table().len(), 1);
    assert_eq!(magic.classify(b"LOCAL data").mime_type, "application/x-local");
}

#[test]
fn builtin_rules_take_precedence_over_snippets() {
    let dir = TempDir::new().unwrap();
    let local = write_file(&dir, "png.magic", b"0\tstring\t\\x89PNG\timage/x-my-png\n");
    let config = MagicConfig {
        rule_files: vec![local],
        ..Default::default()
    };
    let magic = MimeMagic::builtin_with_config(config);
    assert_eq!(
        magic.classify(b"\x89PNG\r\n\x1a\n").mime_type,
        "image/png"
    );
}

#[test]
fn window_size_limits_what_is_examined() {
    let config = MagicConfig {
        io: mimemagic::IOConfig {
            max_window: 4,
            ..Default::default()
        },
        ..Default::default()
    };
    let (table, _) = RuleTable::parse_str("4\tstring\tTAIL\tapplication/x-tail\n");
    let narrow = MimeMagic::with_config(table.clone(), config);
    let wide = MimeMagic::new(table);

    let buf = b"\x00\x01\x02\x03TAIL";
    assert_eq!(wide.classify(buf).mime_type, "application/x-tail");
    assert_ne!(narrow.classify(buf).mime_type, "application/x-tail");
}
