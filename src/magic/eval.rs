//! Byte evaluator: decode the value a rule points at and compare it.
//!
//! Decoding never panics. Negative offsets and reads past the end of the
//! buffer yield `None`, which the match engine treats as a non-match.

use crate::core::{ByteOrder, ExpectedValue, MagicRule, Relation, ValueType, SCRATCH_WIDTH};
use tracing::{error, trace};

/// A value read from the sniffed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Raw unsigned value, zero-extended from the declared width.
    Number(u64),
    /// Scratch window starting at the rule offset, zero-padded.
    Bytes([u8; SCRATCH_WIDTH]),
}

/// Sign-extend `raw` from the width of `value_type`, or truncate it to that
/// width when `unsigned` is set. Strings pass through untouched.
pub fn sign_extend(value_type: ValueType, unsigned: bool, raw: u64) -> u64 {
    let width = value_type.width();
    if width == 0 {
        return raw;
    }
    let bits = (width * 8) as u32;
    if unsigned {
        raw & (u64::MAX >> (64 - bits))
    } else {
        (((raw << (64 - bits)) as i64) >> (64 - bits)) as u64
    }
}

/// Copy up to [`SCRATCH_WIDTH`] bytes at `offset` into a zeroed window.
fn window_at(buf: &[u8], offset: usize) -> [u8; SCRATCH_WIDTH] {
    let mut window = [0u8; SCRATCH_WIDTH];
    if offset < buf.len() {
        let end = buf.len().min(offset + SCRATCH_WIDTH);
        window[..end - offset].copy_from_slice(&buf[offset..end]);
    }
    window
}

fn read_number(window: &[u8; SCRATCH_WIDTH], width: usize, order: ByteOrder) -> u64 {
    let w2 = [window[0], window[1]];
    let w4 = [window[0], window[1], window[2], window[3]];
    match (width, order) {
        (1, _) => u64::from(window[0]),
        (2, ByteOrder::Big) => u64::from(u16::from_be_bytes(w2)),
        (2, ByteOrder::Little) => u64::from(u16::from_le_bytes(w2)),
        (2, ByteOrder::Native) => u64::from(u16::from_ne_bytes(w2)),
        (_, ByteOrder::Big) => u64::from(u32::from_be_bytes(w4)),
        (_, ByteOrder::Little) => u64::from(u32::from_le_bytes(w4)),
        (_, ByteOrder::Native) => u64::from(u32::from_ne_bytes(w4)),
    }
}

/// Bytes that must be present at the final offset for the rule to apply.
fn needed_bytes(rule: &MagicRule) -> usize {
    match (&rule.value, rule.value_type) {
        (ExpectedValue::Bytes(literal), ValueType::String) => literal.len(),
        _ => rule.value_type.width(),
    }
}

/// Read the value `rule` tests from `buf`.
pub fn decode(rule: &MagicRule, buf: &[u8]) -> Option<Value> {
    let mut offset = usize::try_from(rule.offset).ok()?;
    let first_width = match rule.indirect {
        Some(ind) => ind.width.width(),
        None => rule.value_type.width(),
    };
    if offset.checked_add(first_width)? > buf.len() {
        return None;
    }
    let mut window = window_at(buf, offset);

    if let Some(ind) = rule.indirect {
        let pointer = read_number(&window, ind.width.width(), rule.value_type.byte_order());
        let target = (pointer as i64).checked_add(ind.offset)?;
        offset = usize::try_from(target).ok()?;
        if offset.checked_add(needed_bytes(rule))? > buf.len() {
            return None;
        }
        window = window_at(buf, offset);
    }

    Some(match rule.value_type {
        ValueType::String => Value::Bytes(window),
        t => Value::Number(read_number(&window, t.width(), t.byte_order())),
    })
}

/// Difference of the first mismatching byte, `data - literal`; 0 when the
/// whole literal matches.
fn string_difference(window: &[u8; SCRATCH_WIDTH], literal: &[u8]) -> i64 {
    literal
        .iter()
        .zip(window.iter())
        .map(|(&want, &got)| i64::from(got) - i64::from(want))
        .find(|&d| d != 0)
        .unwrap_or(0)
}

/// Apply the rule's mask and relation to a decoded value.
pub fn compare(rule: &MagicRule, value: &Value) -> bool {
    if rule.relation == Relation::Any {
        return true;
    }
    let (v, l) = match (value, &rule.value) {
        (Value::Number(raw), ExpectedValue::Number(expected)) => (
            sign_extend(rule.value_type, rule.unsigned, *raw) & rule.mask,
            *expected,
        ),
        (Value::Bytes(window), ExpectedValue::Bytes(literal)) => {
            ((string_difference(window, literal) as u64) & rule.mask, 0)
        }
        _ => {
            error!(
                line = rule.line,
                relation = %rule.relation.symbol(),
                "Value kind does not fit rule type"
            );
            return false;
        }
    };

    let matched = match rule.relation {
        Relation::Equal => v == l,
        Relation::NotEqual => v != l,
        Relation::Greater if rule.unsigned => v > l,
        Relation::Greater => (v as i64) > (l as i64),
        Relation::Less if rule.unsigned => v < l,
        Relation::Less => (v as i64) < (l as i64),
        Relation::AllSet => v & l == l,
        Relation::NotAllSet => v & l != l,
        Relation::Any => true,
    };
    trace!(line = rule.line, v, l, matched, "Compared");
    matched
}

/// Decode and compare in one step.
pub fn evaluate(rule: &MagicRule, buf: &[u8]) -> bool {
    decode(rule, buf).is_some_and(|value| compare(rule, &value))
}
