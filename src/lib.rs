//! Content-based MIME type sniffing.
//!
//! `mimemagic` determines the MIME type of a buffer or file from its bytes:
//! first a database of positional "magic" rules, then keyword heuristics for
//! source code and text, then structural checks (tar headers, plain text).
//! Every answer comes with an accuracy between 0 and 100.

/// Core data types module
pub mod core;
/// Error types
pub mod error;
/// Heuristic classifier for text and source code
pub mod heuristics;
/// Bounded file reading
pub mod io;
/// Logging and tracing setup
pub mod logging;
/// Magic rule parser, evaluator and match engine
pub mod magic;
/// Front-end engine
pub mod sniffer;

pub use crate::core::MagicResult;
pub use crate::error::{MagicError, ParseWarning, Result};
pub use crate::magic::{LoadReport, RuleTable};
pub use crate::sniffer::config::{IOConfig, MagicConfig};
pub use crate::sniffer::MimeMagic;
