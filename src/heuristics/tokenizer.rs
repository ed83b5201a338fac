//! Splits a text buffer into keyword candidates.

/// Bytes that separate tokens.
fn is_delimiter(b: u8) -> bool {
    matches!(b, b'\n' | 0 | b'\t' | b' ' | b'\r' | 0x0C | b',' | b';' | b'>')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a [u8],
    /// True for the first token of the buffer, for any token preceded by a
    /// newline since the previous token, and for a token ended by a newline.
    pub starts_line: bool,
}

/// Iterator over the tokens of a buffer.
pub struct Tokenizer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let mut starts_line = self.pos == 0;
        while let Some(&b) = self.data.get(self.pos) {
            if !is_delimiter(b) {
                break;
            }
            if b == b'\n' {
                starts_line = true;
            }
            self.pos += 1;
        }

        let start = self.pos;
        while self.data.get(self.pos).is_some_and(|&b| !is_delimiter(b)) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        // The terminating newline is left unconsumed so the next token sees it too.
        if self.data.get(self.pos) == Some(&b'\n') {
            starts_line = true;
        }
        Some(Token {
            text: &self.data[start..self.pos],
            starts_line,
        })
    }
}
