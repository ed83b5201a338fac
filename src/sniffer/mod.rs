//! Front end: the [`MimeMagic`] engine.
//!
//! An engine owns a rule table and a configuration. Queries take `&self`,
//! keep all scratch state on the stack and never fail: I/O trouble is
//! reported through the sentinel MIME types below.
//!
//! ```no_run
//! use mimemagic::MimeMagic;
//!
//! let magic = MimeMagic::builtin();
//! let result = magic.classify_file("/bin/ls");
//! println!("{} ({}%)", result.mime_type, result.accuracy);
//! ```

pub mod config;
pub mod fs;
pub mod refine;

use crate::core::MagicResult;
use crate::error::Result;
use crate::heuristics;
use crate::magic::{LoadReport, RuleTable};
use config::MagicConfig;
use std::path::Path;
use tracing::{debug, info, warn};

pub const MIME_BINARY_UNKNOWN: &str = "application/octet-stream";
pub const MIME_BINARY_UNREADABLE: &str = "application/x-unreadable";
pub const MIME_BINARY_ZEROSIZE: &str = "application/x-zerosize";
pub const MIME_INODE_DIR: &str = "inode/directory";
pub const MIME_INODE_DIR_LOCKED: &str = "inode/directory-locked";
pub const MIME_INODE_CDEV: &str = "inode/chardevice";
pub const MIME_INODE_BDEV: &str = "inode/blockdevice";
pub const MIME_INODE_FIFO: &str = "inode/fifo";
pub const MIME_INODE_LINK: &str = "inode/link";
pub const MIME_INODE_LINK_BROKEN: &str = "inode/link-broken";
pub const MIME_INODE_SOCK: &str = "inode/socket";

/// Rule file compiled into the crate.
pub const BUILTIN_MAGIC: &str = include_str!("../../data/magic");

/// Content sniffing engine.
#[derive(Debug, Clone)]
pub struct MimeMagic {
    table: RuleTable,
    config: MagicConfig,
}

impl MimeMagic {
    pub fn new(table: RuleTable) -> Self {
        Self::with_config(table, MagicConfig::default())
    }

    /// Build an engine, merging the configured extra rule files after
    /// `table`. Extra files that can't be read are logged and skipped.
    pub fn with_config(mut table: RuleTable, config: MagicConfig) -> Self {
        for path in &config.rule_files {
            match table.merge_file(path, config.io.max_rule_file_size) {
                Ok(report) if !report.is_clean() => warn!(
                    path = %path.display(),
                    errors = report.errors,
                    "Magic snippet merged with errors"
                ),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to merge magic snippet"),
            }
        }
        Self { table, config }
    }

    /// Engine over the built-in rule database.
    pub fn builtin() -> Self {
        Self::builtin_with_config(MagicConfig::default())
    }

    pub fn builtin_with_config(config: MagicConfig) -> Self {
        let (table, report) = RuleTable::parse_str(BUILTIN_MAGIC);
        debug!(
            rules = report.rules_loaded,
            errors = report.errors,
            "Loaded built-in magic"
        );
        Self::with_config(table, config)
    }

    /// Engine over a rule file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P, config: MagicConfig) -> Result<(Self, LoadReport)> {
        let (table, report) = RuleTable::load_file(path, config.io.max_rule_file_size)?;
        Ok((Self::with_config(table, config), report))
    }

    /// Append another rule file after the current rules.
    pub fn merge_file<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport> {
        self.table.merge_file(path, self.config.io.max_rule_file_size)
    }

    pub fn merge_str(&mut self, text: &str) -> LoadReport {
        self.table.merge_str(text)
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn config(&self) -> &MagicConfig {
        &self.config
    }

    /// Classify an in-memory buffer. Only the first `max_window` bytes are
    /// examined.
    pub fn classify(&self, bytes: &[u8]) -> MagicResult {
        let window = &bytes[..bytes.len().min(self.config.io.max_window)];
        if window.is_empty() {
            return MagicResult::certain(MIME_BINARY_ZEROSIZE);
        }
        self.sniff(window)
    }

    /// Classify a buffer, refining C-like results with the file name it
    /// came from.
    pub fn classify_named(&self, bytes: &[u8], name: &str) -> MagicResult {
        refine::refine(self.classify(bytes), name)
    }

    /// Rule table, then heuristics, then unknown binary.
    fn sniff(&self, window: &[u8]) -> MagicResult {
        if let Some(result) = self.table.find_match(window) {
            return result;
        }
        if let Some(result) = heuristics::classify(window) {
            return result;
        }
        MagicResult::new(MIME_BINARY_UNKNOWN, 0)
    }
}

impl Default for MimeMagic {
    fn default() -> Self {
        let magic = Self::builtin();
        info!(rules = magic.table.len(), "Initialized built-in magic engine");
        magic
    }
}
