//! Error types for the mimemagic sniffing engine.
//!
//! Only loading problems surface as `Err`: queries never fail, they map
//! I/O trouble to sentinel MIME types instead (see [`crate::sniffer`]).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mimemagic operations.
#[derive(Debug, Error)]
pub enum MagicError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule file could not be opened or read
    #[error("can't read magic file {}: {source}", path.display())]
    RuleFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rule file exceeded the configured size limit
    #[error("magic file {} is {found} bytes, limit is {limit}", path.display())]
    RuleFileTooLarge {
        path: PathBuf,
        limit: u64,
        found: u64,
    },

    /// Configuration could not be deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for mimemagic operations
pub type Result<T> = std::result::Result<T, MagicError>;

/// Problems found while parsing one line of a magic rule file.
///
/// A line producing one of these is counted as an error and skipped;
/// the rest of the file is still loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    #[error("offset {0:?} invalid")]
    InvalidOffset(String),

    #[error("indirect offset type {0:?} invalid")]
    InvalidIndirectType(char),

    #[error("missing ')' in indirect offset")]
    MissingParen,

    #[error("indirect offset on a top-level rule")]
    IndirectOnTopLevel,

    #[error("type {0:?} invalid")]
    UnknownType(String),

    #[error("continuation level {found} follows level {previous}")]
    LevelSkip { previous: u16, found: u16 },

    #[error("continuation without a top-level rule")]
    OrphanContinuation,
}
