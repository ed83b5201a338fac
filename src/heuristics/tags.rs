//! ID3v2 tag detection.
//!
//! MP3 files often carry an ID3v2 tag in front of the first audio frame.
//! The front end skips it and sniffs what follows.

/// Size of the ID3v2 header, and of the optional footer.
pub const ID3_HEADER_LEN: usize = 10;

const FOOTER_FLAG: u8 = 0x10;
const MIN_PROBE_LEN: usize = 40;

/// Number of bytes taken by a leading ID3v2 tag, or 0 when there is none.
pub fn tag_strip(buf: &[u8]) -> usize {
    if buf.len() < MIN_PROBE_LEN || !buf.starts_with(b"ID3") {
        return 0;
    }
    let version = buf[3];
    let flags = buf[5];
    if version > 4 || flags & 0x0F != 0 {
        return 0;
    }

    let mut size = ID3_HEADER_LEN + syncsafe(&buf[6..10]);
    if flags & FOOTER_FLAG != 0 {
        size += ID3_HEADER_LEN;
    }
    size
}

/// 28-bit integer stored 7 bits per byte.
fn syncsafe(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .fold(0, |acc, &b| (acc << 7) | usize::from(b & 0x7F))
}
