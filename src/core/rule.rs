//! Magic rule representation.
//!
//! A [`MagicRule`] is one parsed line of a magic file: a positional test
//! against the sniffed bytes, plus the description (a MIME type) reported
//! when the test and its ancestors match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the scratch window a rule reads from the buffer. Reads near the
/// end of the buffer are zero-padded up to this width.
pub const SCRATCH_WIDTH: usize = 64;

/// Longest string literal a rule may carry.
pub const MAX_STRING_LEN: usize = SCRATCH_WIDTH - 1;

/// Byte order used to decode a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    Big,
    Little,
    /// Order of the host running the query.
    Native,
}

/// Declared type of the value a rule tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Byte,
    Short,
    Long,
    String,
    Date,
    BeShort,
    BeLong,
    BeDate,
    LeShort,
    LeLong,
    LeDate,
}

impl ValueType {
    /// Keywords in lookup order. Matching is by prefix, so the order is
    /// part of the grammar.
    pub const KEYWORDS: [(&'static str, ValueType); 11] = [
        ("byte", ValueType::Byte),
        ("short", ValueType::Short),
        ("long", ValueType::Long),
        ("string", ValueType::String),
        ("date", ValueType::Date),
        ("beshort", ValueType::BeShort),
        ("belong", ValueType::BeLong),
        ("bedate", ValueType::BeDate),
        ("leshort", ValueType::LeShort),
        ("lelong", ValueType::LeLong),
        ("ledate", ValueType::LeDate),
    ];

    /// Number of bytes a numeric value occupies; 0 for strings.
    pub fn width(self) -> usize {
        match self {
            ValueType::Byte => 1,
            ValueType::Short | ValueType::BeShort | ValueType::LeShort => 2,
            ValueType::Long
            | ValueType::BeLong
            | ValueType::LeLong
            | ValueType::Date
            | ValueType::BeDate
            | ValueType::LeDate => 4,
            ValueType::String => 0,
        }
    }

    pub fn byte_order(self) -> ByteOrder {
        match self {
            ValueType::BeShort | ValueType::BeLong | ValueType::BeDate => ByteOrder::Big,
            ValueType::LeShort | ValueType::LeLong | ValueType::LeDate => ByteOrder::Little,
            _ => ByteOrder::Native,
        }
    }

    pub fn keyword(self) -> &'static str {
        Self::KEYWORDS
            .iter()
            .find(|(_, t)| *t == self)
            .map(|(k, _)| *k)
            .unwrap_or("?")
    }

    pub fn is_string(self) -> bool {
        self == ValueType::String
    }
}

/// Comparison applied between the (masked) buffer value and the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// `=`
    Equal,
    /// `!`
    NotEqual,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `&`: every bit of the expected value is set.
    AllSet,
    /// `^`: at least one bit of the expected value is clear.
    NotAllSet,
    /// `x`: always matches.
    Any,
}

impl Relation {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'=' => Some(Relation::Equal),
            b'!' => Some(Relation::NotEqual),
            b'>' => Some(Relation::Greater),
            b'<' => Some(Relation::Less),
            b'&' => Some(Relation::AllSet),
            b'^' => Some(Relation::NotAllSet),
            b'x' => Some(Relation::Any),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Relation::Equal => '=',
            Relation::NotEqual => '!',
            Relation::Greater => '>',
            Relation::Less => '<',
            Relation::AllSet => '&',
            Relation::NotAllSet => '^',
            Relation::Any => 'x',
        }
    }
}

/// Width of the pointer read for indirect addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndirectWidth {
    Byte,
    Short,
    Long,
}

impl IndirectWidth {
    pub fn width(self) -> usize {
        match self {
            IndirectWidth::Byte => 1,
            IndirectWidth::Short => 2,
            IndirectWidth::Long => 4,
        }
    }
}

/// `>(offset.t+sub)` addressing: the value at `offset` plus `offset` here is
/// where the real test happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indirect {
    pub width: IndirectWidth,
    pub offset: i64,
}

/// The value a rule expects to find.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpectedValue {
    /// Numeric value, already sign-extended (or truncated, if unsigned) to
    /// the declared width.
    Number(u64),
    /// Decoded string literal; its length is the number of bytes compared.
    Bytes(Vec<u8>),
    /// No value: the relation is `x`.
    None,
}

/// One parsed line of a magic file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MagicRule {
    /// Continuation level: number of leading `>`.
    pub level: u16,
    pub indirect: Option<Indirect>,
    pub offset: i64,
    pub value_type: ValueType,
    /// Applied to the buffer value after sign extension.
    pub mask: u64,
    pub relation: Relation,
    pub value: ExpectedValue,
    pub unsigned: bool,
    /// May be empty: such rules only gate deeper continuations.
    pub description: String,
    /// Set by a leading `\b` in the description.
    pub no_space: bool,
    /// 1-based line number in the source it was parsed from.
    pub line: usize,
}

impl MagicRule {
    pub fn is_continuation(&self) -> bool {
        self.level > 0
    }
}

impl fmt::Display for MagicRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.level {
            f.write_str(">")?;
        }
        match self.indirect {
            Some(ind) => {
                let t = match ind.width {
                    IndirectWidth::Byte => 'b',
                    IndirectWidth::Short => 's',
                    IndirectWidth::Long => 'l',
                };
                write!(f, "({}.{}{:+})", self.offset, t, ind.offset)?
            }
            None => write!(f, "{}", self.offset)?,
        }
        write!(
            f,
            " {}{}",
            if self.unsigned { "u" } else { "" },
            self.value_type.keyword()
        )?;
        if self.mask != u64::MAX {
            write!(f, "&{:#x}", self.mask)?;
        }
        write!(f, " {}", self.relation.symbol())?;
        match &self.value {
            ExpectedValue::Number(n) => write!(f, "{:#x}", n)?,
            ExpectedValue::Bytes(b) => write!(f, "{}", b.escape_ascii())?,
            ExpectedValue::None => {}
        }
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}
