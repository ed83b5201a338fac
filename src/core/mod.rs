//! Core data types for mimemagic.
//!
//! Rules as parsed from magic files, and the result type every query
//! returns.

pub mod result;
pub mod rule;

pub use result::{MagicResult, FULL_ACCURACY};
pub use rule::{
    ByteOrder, ExpectedValue, Indirect, IndirectWidth, MagicRule, Relation, ValueType,
    MAX_STRING_LEN, SCRATCH_WIDTH,
};
