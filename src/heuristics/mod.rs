//! Heuristic classifier for buffers the rule table does not recognize.
//!
//! Checks run in a fixed order: troff and Fortran quick checks, C-family
//! disambiguation, the weighted language pick, the tar checksum, the
//! all-ASCII check and finally the plain text check.

pub mod keywords;
pub mod languages;
pub mod tags;
pub mod tar;
pub mod text;
pub mod tokenizer;

use crate::core::MagicResult;
use crate::magic::parser::is_c_space;
use languages::{TokenTally, C_FAMILY_ACCURACY};
use memchr::memchr;
use tracing::debug;

pub use tags::tag_strip;
pub use tar::{is_tar, TarKind};
pub use text::is_plain_text;

pub const MIME_TEXT_PLAIN: &str = "text/plain";
/// Text with escape sequences.
pub const MIME_TEXT_UNKNOWN: &str = "text/plain";
pub const MIME_APPL_TROFF: &str = "application/x-troff";
pub const MIME_APPL_TAR: &str = "application/x-tar";
pub const MIME_TEXT_FORTRAN: &str = "text/x-fortran";

/// Starting accuracy of the text classifier.
pub const ASCII_ACCURACY: u8 = 70;
/// Accuracy of the tar and all-ASCII verdicts.
pub const STRUCTURE_ACCURACY: u8 = 90;

const ESC: u8 = 0x1B;

/// Outcome of the keyword-driven classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsciiVerdict {
    Classified(MagicResult),
    /// Nothing matched; `accuracy` is what the plain text check reports.
    Declined { accuracy: u8 },
}

/// Troff and Fortran checks on the first bytes.
pub fn quick_literal(buf: &[u8]) -> Option<&'static str> {
    match buf.first()? {
        b'.' => {
            let at = 1 + buf[1..].iter().take_while(|&&b| is_c_space(b)).count();
            let first = *buf.get(at)?;
            let second = *buf.get(at + 1)?;
            let is_troff = (first.is_ascii_alphanumeric() || first == b'\\')
                && second.is_ascii_alphanumeric();
            is_troff.then_some(MIME_APPL_TROFF)
        }
        b'c' | b'C' => buf
            .get(1)
            .is_some_and(|&b| is_c_space(b))
            .then_some(MIME_TEXT_FORTRAN),
        _ => None,
    }
}

/// Classify a buffer by its keywords and structure.
pub fn classify_ascii(buf: &[u8]) -> AsciiVerdict {
    let mut accuracy = ASCII_ACCURACY;
    if let Some(mime) = quick_literal(buf) {
        return AsciiVerdict::Classified(MagicResult::new(mime, accuracy));
    }

    let tally = TokenTally::scan(buf);
    if tally.has_c_family() {
        accuracy = C_FAMILY_ACCURACY;
        if let Some(mime) = tally.c_family_pick() {
            return AsciiVerdict::Classified(MagicResult::new(mime, accuracy));
        }
    }
    if let Some((mime, weighted)) = tally.weighted_pick() {
        return AsciiVerdict::Classified(MagicResult::new(mime, weighted));
    }

    match is_tar(buf) {
        TarKind::None => {}
        kind => {
            debug!(?kind, "Tar header checksum matched");
            return AsciiVerdict::Classified(MagicResult::new(MIME_APPL_TAR, STRUCTURE_ACCURACY));
        }
    }

    if buf.is_ascii() {
        let mime = if memchr(ESC, buf).is_some() {
            MIME_TEXT_UNKNOWN
        } else {
            MIME_TEXT_PLAIN
        };
        return AsciiVerdict::Classified(MagicResult::new(mime, STRUCTURE_ACCURACY));
    }

    AsciiVerdict::Declined { accuracy }
}

/// Run the heuristic chain; `None` when every check declines.
pub fn classify(buf: &[u8]) -> Option<MagicResult> {
    match classify_ascii(buf) {
        AsciiVerdict::Classified(result) => Some(result),
        AsciiVerdict::Declined { accuracy } => {
            is_plain_text(buf).then(|| MagicResult::new(MIME_TEXT_PLAIN, accuracy))
        }
    }
}
