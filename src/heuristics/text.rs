//! Plain text check for buffers the keyword classifier declined.

use memchr::memchr;

/// Longest line accepted in a plain text file.
pub const TEXT_MAX_LINE_LEN: usize = 300;

/// Control characters that do not appear in text. Backspace, tab, newline,
/// vertical tab, form feed, carriage return and escape are allowed.
fn is_binary_byte(b: u8) -> bool {
    b < 8 || (b > 13 && b < 32 && b != 27) || b == 0x7F
}

/// True when `buf` looks like text: no binary control bytes and no line
/// longer than [`TEXT_MAX_LINE_LEN`]. A final unterminated line passes only
/// if it starts within the last `TEXT_MAX_LINE_LEN` bytes.
pub fn is_plain_text(buf: &[u8]) -> bool {
    if buf.iter().any(|&b| is_binary_byte(b)) {
        return false;
    }
    let mut start = 0;
    while start < buf.len() {
        match memchr(b'\n', &buf[start..]) {
            Some(len) if len > TEXT_MAX_LINE_LEN => return false,
            Some(len) => start += len + 1,
            None => return start + TEXT_MAX_LINE_LEN >= buf.len(),
        }
    }
    true
}
