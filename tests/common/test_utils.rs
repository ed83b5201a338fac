//! Shared test utilities for creating temporary files and common test operations.
//!
//! This module consolidates common test helper functions to avoid duplication
//! across test modules.

use mimemagic::{MagicConfig, MimeMagic, RuleTable};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// Creates a temporary file with the given content.
///
/// The file will be automatically cleaned up when the returned
/// `NamedTempFile` is dropped.
///
/// # Panics
///
/// Panics if the temporary file cannot be created or if writing to it fails
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file
}

/// Writes `content` to `name` inside `dir` and returns the full path.
pub fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Builds an engine from rule text, asserting that every line parsed.
pub fn engine_from_rules(rules: &str) -> MimeMagic {
    let (table, report) = RuleTable::parse_str(rules);
    assert!(report.is_clean(), "rule errors: {:?}", report.warnings);
    MimeMagic::new(table)
}

/// Engine over the built-in rules that restores access times under `dir`.
pub fn builtin_engine_for(dir: &Path) -> MimeMagic {
    let config = MagicConfig {
        atime_dirs: vec![dir.to_path_buf()],
        ..Default::default()
    };
    MimeMagic::builtin_with_config(config)
}
