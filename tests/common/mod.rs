//! Common test utilities and helpers.
//!
//! This module provides shared functionality and fixtures for the
//! integration tests.

pub mod test_utils;

/// Synthetic file contents
pub mod fixtures {
    /// PNG signature followed by the start of an IHDR chunk.
    pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x10\0\0\0\x10\x08\x06\0\0\0";

    pub const JAVA_SOURCE: &[u8] = b"import java.util.List;
import java.util.ArrayList;

public class Hello {
    public static void main(String[] args) {
        List<String> names = new ArrayList<>();
    }
}
";

    pub const C_SOURCE: &[u8] = b"/* point.c */
struct point {
    int x;
    int y;
};

extern struct point origin;
";

    /// Minimal little-endian ELF header with the given `e_type`.
    pub fn elf_header(e_type: u16) -> Vec<u8> {
        let mut h = vec![0u8; 64];
        h[..4].copy_from_slice(b"\x7fELF");
        h[4] = 2; // 64-bit
        h[5] = 1; // little endian
        h[6] = 1;
        h[16..18].copy_from_slice(&e_type.to_le_bytes());
        h[18..20].copy_from_slice(&0x3Eu16.to_le_bytes());
        h
    }

    /// ID3v2.3 tag of `body_len` bytes (no footer) followed by `rest`.
    pub fn id3_tagged(body_len: usize, rest: &[u8]) -> Vec<u8> {
        let mut buf = b"ID3\x03\x00\x00".to_vec();
        let size = body_len as u32;
        buf.extend_from_slice(&[
            ((size >> 21) & 0x7F) as u8,
            ((size >> 14) & 0x7F) as u8,
            ((size >> 7) & 0x7F) as u8,
            (size & 0x7F) as u8,
        ]);
        buf.resize(10 + body_len, 0);
        buf.extend_from_slice(rest);
        buf
    }

    /// GNU tar header for a five byte file, checksum filled in.
    pub fn tar_header() -> Vec<u8> {
        let mut h = vec![0u8; 512];
        h[..9].copy_from_slice(b"hello.txt");
        h[100..108].copy_from_slice(b"0000644\0");
        h[124..136].copy_from_slice(b"00000000005\0");
        h[156] = b'0';
        h[257..265].copy_from_slice(b"ustar  \0");
        h[148..156].copy_from_slice(b"        ");
        let sum: u32 = h.iter().map(|&b| u32::from(b)).sum();
        h[148..156].copy_from_slice(format!("{:06o}\0 ", sum).as_bytes());
        h
    }
}
