//! Configuration for the sniffing front end.
//!
//! Provides centralized configuration with sensible defaults. Every field
//! has a default so partial JSON documents deserialize cleanly.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Master configuration for a [`crate::MimeMagic`] engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicConfig {
    /// I/O configuration for file reading.
    pub io: IOConfig,
    /// Whether symbolic links are resolved and their target classified.
    pub follow_links: bool,
    /// Directories whose files get their access time restored after reading.
    /// Only files directly inside one of them qualify, not subdirectories.
    pub atime_dirs: Vec<PathBuf>,
    /// Extra rule-file snippets merged after the primary database.
    pub rule_files: Vec<PathBuf>,
}

impl Default for MagicConfig {
    fn default() -> Self {
        Self {
            io: IOConfig::default(),
            follow_links: false,
            atime_dirs: vec![std::env::temp_dir()],
            rule_files: Vec::new(),
        }
    }
}

impl MagicConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// True when the directory holding `path` is one of the access-time
    /// directories.
    pub fn restores_access_time(&self, path: &Path) -> bool {
        path.parent()
            .is_some_and(|parent| self.atime_dirs.iter().any(|dir| parent == dir.as_path()))
    }
}

/// I/O configuration for file reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOConfig {
    /// Maximum number of bytes examined per query (default: 4000).
    pub max_window: usize,
    /// Maximum size of a rule file accepted by the loader (default: 16MB).
    pub max_rule_file_size: u64,
}

impl Default for IOConfig {
    fn default() -> Self {
        Self {
            max_window: 4000,
            max_rule_file_size: 16 * 1024 * 1024,
        }
    }
}
