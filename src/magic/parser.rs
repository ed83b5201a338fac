//! Rule grammar parser.
//!
//! One line of a magic file becomes one [`MagicRule`]:
//!
//! ```text
//! >>(0x3c.l+4) ubelong&0xffff0000 =0x50450000 application/x-ms-dos-executable
//! ^^ ^^^^^^^^^ ^^^^^^^^^^^^^^^^^^ ^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//! |  offset    type and mask      relation    description
//! level                           and value
//! ```
//!
//! Numbers follow C `strtol` base-0 rules: `0x` prefix for hex, a leading
//! `0` for octal, decimal otherwise, with an optional sign.

use crate::core::{
    ExpectedValue, Indirect, IndirectWidth, MagicRule, Relation, ValueType, MAX_STRING_LEN,
};
use crate::error::ParseWarning;
use crate::magic::eval::sign_extend;
use tracing::warn;

/// Longest description kept from a rule line; the rest is dropped.
pub const MAX_DESC_LEN: usize = 49;

/// C `isspace`: space, `\t`, `\n`, `\v`, `\f`, `\r`.
pub(crate) fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Parse a C `strtol(s, &end, 0)` integer from the start of `s`.
///
/// Returns the value and the number of bytes consumed; 0 consumed means no
/// number was found. Out-of-range values saturate like `strtol`.
pub(crate) fn parse_c_long(s: &[u8]) -> (i64, usize) {
    let mut i = 0;
    while i < s.len() && is_c_space(s[i]) {
        i += 1;
    }
    let negative = match s.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let hex_prefix = s.get(i) == Some(&b'0')
        && matches!(s.get(i + 1), Some(b'x') | Some(b'X'))
        && s.get(i + 2).is_some_and(|b| b.is_ascii_hexdigit());
    let radix: u32 = if hex_prefix {
        i += 2;
        16
    } else if s.get(i) == Some(&b'0') {
        8
    } else {
        10
    };

    let digits_start = i;
    let mut magnitude: u64 = 0;
    let mut overflow = false;
    while let Some(d) = s.get(i).and_then(|&b| (b as char).to_digit(radix)) {
        match magnitude
            .checked_mul(u64::from(radix))
            .and_then(|m| m.checked_add(u64::from(d)))
        {
            Some(m) => magnitude = m,
            None => overflow = true,
        }
        i += 1;
    }
    if i == digits_start {
        return (0, 0);
    }

    let value = if negative {
        if overflow || magnitude > i64::MAX as u64 + 1 {
            i64::MIN
        } else {
            (magnitude as i64).wrapping_neg()
        }
    } else if overflow || magnitude > i64::MAX as u64 {
        i64::MAX
    } else {
        magnitude as i64
    };
    (value, i)
}

/// Number of leading `>` on a line, after leading whitespace.
pub fn continuation_level(line: &[u8]) -> u16 {
    let start = line.iter().position(|&b| !is_c_space(b)).unwrap_or(line.len());
    line[start..].iter().take_while(|&&b| b == b'>').count() as u16
}

/// Cursor over the bytes of a single line.
struct Cursor<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<u8> {
        self.line.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.line.get(self.pos + ahead).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn rest(&self) -> &'a [u8] {
        &self.line[self.pos.min(self.line.len())..]
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(is_c_space) {
            self.bump();
        }
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Option<i64> {
        let (value, used) = parse_c_long(self.rest());
        self.pos += used;
        (used > 0).then_some(value)
    }

    /// The current whitespace-delimited token, for error messages.
    fn token(&self) -> String {
        let rest = self.rest();
        let end = rest.iter().position(|&b| is_c_space(b)).unwrap_or(rest.len());
        String::from_utf8_lossy(&rest[..end]).into_owned()
    }
}

/// Parse one line of a magic file.
///
/// Blank lines and `#` comments give `Ok(None)`. The returned rule has
/// `line` set to 0; loaders fill in the real line number.
pub fn parse_line(line: &[u8]) -> Result<Option<MagicRule>, ParseWarning> {
    let mut line = line;
    while let Some((&last, head)) = line.split_last() {
        if last == b'\n' || last == b'\r' {
            line = head;
        } else {
            break;
        }
    }

    let mut cur = Cursor { line, pos: 0 };
    cur.skip_spaces();
    match cur.peek() {
        None | Some(b'#') => return Ok(None),
        Some(_) => {}
    }

    let mut level: u16 = 0;
    while cur.eat(b'>') {
        level = level.saturating_add(1);
    }

    let indirect = cur.peek() == Some(b'(');
    if indirect {
        if level == 0 {
            return Err(ParseWarning::IndirectOnTopLevel);
        }
        cur.bump();
    }

    let offset_token = cur.token();
    let offset = cur
        .number()
        .ok_or(ParseWarning::InvalidOffset(offset_token))?;
    let offset = i64::from(offset as i32);

    let indirect = if indirect {
        Some(parse_indirect(&mut cur)?)
    } else {
        None
    };
    while cur.peek().is_some_and(|b| b.is_ascii_digit()) {
        cur.bump();
    }
    cur.skip_spaces();

    let unsigned = cur.eat(b'u');
    let value_type = ValueType::KEYWORDS
        .iter()
        .find(|(keyword, _)| cur.rest().starts_with(keyword.as_bytes()))
        .map(|(keyword, t)| (keyword.len(), *t));
    let value_type = match value_type {
        Some((len, t)) => {
            cur.pos += len;
            t
        }
        None => return Err(ParseWarning::UnknownType(cur.token())),
    };

    let mask = if cur.eat(b'&') {
        let raw = cur.number().unwrap_or(0);
        sign_extend(value_type, unsigned, raw as u64)
    } else {
        u64::MAX
    };
    cur.skip_spaces();

    let relation = match cur.peek() {
        Some(b @ (b'>' | b'<' | b'&' | b'^' | b'=')) => {
            cur.bump();
            Relation::from_byte(b).unwrap_or(Relation::Equal)
        }
        Some(b'!') if !value_type.is_string() => {
            cur.bump();
            Relation::NotEqual
        }
        Some(b'x') if cur.peek_at(1).map_or(true, is_c_space) => {
            cur.bump();
            Relation::Any
        }
        _ => Relation::Equal,
    };

    let value = if relation == Relation::Any {
        ExpectedValue::None
    } else {
        cur.skip_spaces();
        if value_type.is_string() {
            ExpectedValue::Bytes(parse_string(&mut cur))
        } else {
            let raw = cur.number().unwrap_or(0);
            ExpectedValue::Number(sign_extend(value_type, unsigned, raw as u64))
        }
    };

    cur.skip_spaces();
    let no_space = if cur.eat(0x08) {
        true
    } else if cur.peek() == Some(b'\\') && cur.peek_at(1) == Some(b'b') {
        cur.pos += 2;
        true
    } else {
        false
    };
    let description = parse_description(&mut cur);

    Ok(Some(MagicRule {
        level,
        indirect: indirect.map(|(width, offset)| Indirect { width, offset }),
        offset,
        value_type,
        mask,
        relation,
        value,
        unsigned,
        description,
        no_space,
        line: 0,
    }))
}

/// Parse `[.l|.s|.b][+-n])` after the base offset of an indirect rule.
fn parse_indirect(cur: &mut Cursor<'_>) -> Result<(IndirectWidth, i64), ParseWarning> {
    let mut width = IndirectWidth::Long;
    if cur.eat(b'.') {
        width = match cur.peek() {
            Some(b'l') => IndirectWidth::Long,
            Some(b's') => IndirectWidth::Short,
            Some(b'b') => IndirectWidth::Byte,
            Some(other) => return Err(ParseWarning::InvalidIndirectType(other as char)),
            None => return Err(ParseWarning::MissingParen),
        };
        cur.bump();
    }

    let negative = cur.peek() == Some(b'-');
    if matches!(cur.peek(), Some(b'+' | b'-')) {
        cur.bump();
    }
    let mut sub_offset = 0;
    if cur.peek().is_some_and(|b| b.is_ascii_digit()) {
        let n = cur.number().unwrap_or(0);
        sub_offset = if negative { n.wrapping_neg() } else { n };
    }

    if !cur.eat(b')') {
        return Err(ParseWarning::MissingParen);
    }
    Ok((width, sub_offset))
}

/// Decode a backslash-escaped string literal up to unescaped whitespace.
fn parse_string(cur: &mut Cursor<'_>) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(c) = cur.peek() {
        if is_c_space(c) {
            break;
        }
        if out.len() >= MAX_STRING_LEN {
            warn!(
                literal = %String::from_utf8_lossy(cur.line),
                max = MAX_STRING_LEN,
                "String too long, truncated"
            );
            while cur.peek().is_some_and(|b| !is_c_space(b)) {
                cur.bump();
            }
            break;
        }
        cur.bump();
        if c != b'\\' {
            out.push(c);
            continue;
        }

        let Some(escaped) = cur.peek() else {
            break;
        };
        cur.bump();
        let byte = match escaped {
            b'n' => b'\n',
            b'r' => b'\r',
            b'b' => 0x08,
            b't' => b'\t',
            b'f' => 0x0C,
            b'v' => 0x0B,
            b'0'..=b'7' => {
                let mut val = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match cur.peek() {
                        Some(d @ b'0'..=b'7') => {
                            val = (val << 3) | u32::from(d - b'0');
                            cur.bump();
                        }
                        _ => break,
                    }
                }
                val as u8
            }
            b'x' => {
                let mut val: Option<u32> = None;
                for _ in 0..3 {
                    match cur.peek().and_then(|d| (d as char).to_digit(16)) {
                        Some(d) => {
                            val = Some((val.unwrap_or(0) << 4) | d);
                            cur.bump();
                        }
                        None => break,
                    }
                }
                val.map_or(b'x', |v| v as u8)
            }
            other => other,
        };
        out.push(byte);
    }
    out
}

/// Copy the description up to an unescaped `#`, keeping at most
/// [`MAX_DESC_LEN`] bytes and trimming trailing whitespace.
fn parse_description(cur: &mut Cursor<'_>) -> String {
    let mut out = Vec::new();
    while let Some(c) = cur.peek() {
        if c == b'#' || out.len() >= MAX_DESC_LEN {
            break;
        }
        if c == b'\\' && cur.peek_at(1) == Some(b'#') {
            cur.bump();
        }
        out.push(cur.peek().unwrap_or(c));
        cur.bump();
    }
    while out.last().copied().is_some_and(is_c_space) {
        out.pop();
    }
    String::from_utf8_lossy(&out).into_owned()
}
