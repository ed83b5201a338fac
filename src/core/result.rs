//! Classification result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Accuracy reported for rule-table matches and filesystem sentinels.
pub const FULL_ACCURACY: u8 = 100;

/// Outcome of one sniffing query: a MIME type and a 0–100 confidence.
///
/// Produced fresh by every query and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MagicResult {
    pub mime_type: String,
    pub accuracy: u8,
}

impl MagicResult {
    pub fn new(mime_type: impl Into<String>, accuracy: u8) -> Self {
        Self {
            mime_type: mime_type.into(),
            accuracy: accuracy.min(FULL_ACCURACY),
        }
    }

    /// A result with full accuracy.
    pub fn certain(mime_type: impl Into<String>) -> Self {
        Self::new(mime_type, FULL_ACCURACY)
    }

    pub fn into_parts(self) -> (String, u8) {
        (self.mime_type, self.accuracy)
    }

    pub fn is_text(&self) -> bool {
        self.mime_type.starts_with("text/")
    }
}

impl fmt::Display for MagicResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.mime_type, self.accuracy)
    }
}
