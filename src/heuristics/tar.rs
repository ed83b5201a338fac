//! Tar header checksum validation.

use crate::magic::parser::is_c_space;

/// Size of one tar header record.
pub const RECORD_SIZE: usize = 512;

const CHECKSUM_OFFSET: usize = 148;
const CHECKSUM_LEN: usize = 8;
const MAGIC_OFFSET: usize = 257;
const GNU_MAGIC: &[u8; 8] = b"ustar  \0";

/// Kind of tar header found at the start of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarKind {
    None,
    /// Valid checksum, pre-POSIX layout.
    OldTar,
    /// Valid checksum and the `ustar` magic.
    PosixTar,
}

/// Validate the header checksum of a tar record at the start of `buf`.
pub fn is_tar(buf: &[u8]) -> TarKind {
    let Some(header) = buf.get(..RECORD_SIZE) else {
        return TarKind::None;
    };
    let checksum_field = &header[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN];
    let Some(recorded) = from_oct(checksum_field) else {
        return TarKind::None;
    };

    let total: u64 = header.iter().map(|&b| u64::from(b)).sum();
    let field: u64 = checksum_field.iter().map(|&b| u64::from(b)).sum();
    let sum = total - field + u64::from(b' ') * CHECKSUM_LEN as u64;
    if sum != recorded {
        return TarKind::None;
    }

    if &header[MAGIC_OFFSET..MAGIC_OFFSET + GNU_MAGIC.len()] == GNU_MAGIC {
        TarKind::PosixTar
    } else {
        TarKind::OldTar
    }
}

/// Parse a space-padded octal field. `None` for an all-blank field or one
/// ending on something other than a space or NUL.
fn from_oct(field: &[u8]) -> Option<u64> {
    let start = field.iter().position(|&b| !is_c_space(b))?;
    let digits = &field[start..];
    let end = digits
        .iter()
        .position(|b| !(b'0'..=b'7').contains(b))
        .unwrap_or(digits.len());
    let value = digits[..end]
        .iter()
        .fold(0u64, |acc, &d| (acc << 3) | u64::from(d - b'0'));
    match digits.get(end) {
        Some(&b) if b != 0 && !is_c_space(b) => None,
        _ => Some(value),
    }
}
