//! Field Coercion: raw subfield bytes to typed values.
//!
//! A [`RawField`] is split into subfield groups according to its static
//! [`FieldSchema`] and each subfield is coerced independently. Repeating
//! fields (`SG2D`, `ATTF`, `FSPT`, ...) produce one row per group.
//!
//! Coercion never fails on bad data. Problems are recorded in the
//! [`WarningCollector`] and the best available value is kept:
//!
//! - a field without its field terminator is split using the bytes present
//!   (`UNTERMINATED_FIELD`)
//! - a field shorter than its directory entry, or ending inside a group, is
//!   coerced up to the last complete subfield (`FIELD_LEN_MISMATCH`)
//! - text that cannot be decoded, or a real number that does not parse,
//!   degrades to text (`BAD_ENCODING`)

use crate::catalog::AttributeType;
use crate::encoding::{decode_text, LexicalLevel};
use crate::error::Result;
use crate::reader::{RawField, FIELD_TERMINATOR};
use crate::schema::{FieldSchema, SubfieldFormat};
use crate::warning::{Severity, WarningCode, WarningCollector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// A typed subfield or attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoercedValue {
    /// Integer (binary integers, enumerated attribute values)
    Integer(i64),
    /// Real number (float attributes, scaled depths)
    Real(f64),
    /// Free or coded text
    Text(String),
    /// List of values (list attributes such as `COLOUR`)
    List(Vec<String>),
    /// Raw bit field (`NAME`, `LNAM`)
    Bytes(Vec<u8>),
}

impl CoercedValue {
    /// The value as an integer, if it is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CoercedValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a real number. Integers convert.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CoercedValue::Real(v) => Some(*v),
            CoercedValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The value as text, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CoercedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a list, if it is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            CoercedValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// The raw bytes of a bit field.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            CoercedValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Whether the value carries no information (empty text, list or bytes).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            CoercedValue::Text(s) => s.is_empty(),
            CoercedValue::List(items) => items.is_empty(),
            CoercedValue::Bytes(b) => b.is_empty(),
            CoercedValue::Integer(_) | CoercedValue::Real(_) => false,
        }
    }
}

impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedValue::Integer(v) => write!(f, "{v}"),
            CoercedValue::Real(v) => write!(f, "{v}"),
            CoercedValue::Text(s) => f.write_str(s),
            CoercedValue::List(items) => f.write_str(&items.join(",")),
            CoercedValue::Bytes(b) => {
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            },
        }
    }
}

/// One subfield group.
pub type Row = SmallVec<[CoercedValue; 4]>;

/// A field split into typed subfield groups.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedField {
    /// Field tag
    pub tag: String,
    /// Schema the field was coerced with
    pub schema: &'static FieldSchema,
    rows: Vec<Row>,
}

impl CoercedField {
    /// All groups. Non-repeating fields have at most one.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no group could be coerced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A subfield of the first group.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&CoercedValue> {
        self.value_in(0, label)
    }

    /// A subfield of group `row`.
    #[must_use]
    pub fn value_in(&self, row: usize, label: &str) -> Option<&CoercedValue> {
        let idx = self.schema.index_of(label)?;
        self.rows.get(row)?.get(idx)
    }

    /// An integer subfield of the first group.
    #[must_use]
    pub fn int(&self, label: &str) -> Option<i64> {
        self.value(label).and_then(CoercedValue::as_i64)
    }

    /// A text subfield of the first group.
    #[must_use]
    pub fn text(&self, label: &str) -> Option<&str> {
        self.value(label).and_then(CoercedValue::as_str)
    }

    /// A real subfield of the first group.
    #[must_use]
    pub fn real(&self, label: &str) -> Option<f64> {
        self.value(label).and_then(CoercedValue::as_f64)
    }

    /// Iterate one subfield across all groups.
    pub fn column<'s>(&'s self, label: &str) -> impl Iterator<Item = &'s CoercedValue> + 's {
        let idx = self.schema.index_of(label);
        self.rows
            .iter()
            .filter_map(move |row| idx.and_then(|i| row.get(i)))
    }
}

/// Coerce a raw field with its schema.
///
/// `level` is the lexical level of the field's variable-length text
/// subfields. `record_id` attributes warnings to a record.
///
/// # Errors
///
/// Only returns an error when the warning collector promotes a warning in
/// strict mode.
pub fn coerce_field(
    raw: &RawField<'_>,
    schema: &'static FieldSchema,
    level: LexicalLevel,
    warnings: &mut WarningCollector,
    record_id: Option<u32>,
) -> Result<CoercedField> {
    let mut warn = |code: WarningCode, message: String| -> Result<()> {
        match record_id {
            Some(id) => warnings.push_for(id, Severity::Warning, code, message),
            None => warnings.push(Severity::Warning, code, message),
        }
    };

    if raw.is_clipped() {
        warn(
            WarningCode::FieldLenMismatch,
            format!(
                "{} declares {} bytes but only {} are present",
                raw.tag,
                raw.declared_len,
                raw.bytes.len()
            ),
        )?;
    }

    let content = match strip_terminator(raw.bytes, level) {
        Some(content) => content,
        None => {
            warn(
                WarningCode::UnterminatedField,
                format!("{} has no field terminator", raw.tag),
            )?;
            raw.bytes
        },
    };

    let mut rows = Vec::new();
    let mut pos = 0;
    let mut bad_text = 0usize;
    loop {
        let mut row = Row::new();
        for def in schema.subfields {
            let rest = &content[pos.min(content.len())..];
            let (value, consumed) = match def.format.width() {
                Some(width) => {
                    if rest.len() < width {
                        break;
                    }
                    (decode_fixed(&rest[..width], def.format, &mut bad_text), width)
                },
                None => {
                    if rest.is_empty() && row.is_empty() {
                        break;
                    }
                    let (len, consumed) = level.find_unit_end(rest);
                    (decode_variable(&rest[..len], def.format, level, &mut bad_text), consumed)
                },
            };
            row.push(value);
            pos += consumed;
        }

        let complete = row.len() == schema.subfields.len();
        if !complete {
            if !row.is_empty() || pos < content.len() {
                warn(
                    WarningCode::FieldLenMismatch,
                    format!(
                        "{} ends inside a subfield group at byte {pos} of {}",
                        raw.tag,
                        content.len()
                    ),
                )?;
            }
            if !row.is_empty() && !schema.repeating {
                rows.push(row);
            }
            break;
        }
        rows.push(row);
        if !schema.repeating || pos >= content.len() {
            break;
        }
    }

    if !schema.repeating && pos < content.len() {
        warn(
            WarningCode::FieldLenMismatch,
            format!(
                "{} has {} unexpected trailing bytes",
                raw.tag,
                content.len() - pos
            ),
        )?;
    }
    if bad_text > 0 {
        warn(
            WarningCode::BadEncoding,
            format!("{} has {bad_text} undecodable subfield(s), kept as text", raw.tag),
        )?;
    }

    Ok(CoercedField {
        tag: raw.tag.to_string(),
        schema,
        rows,
    })
}

/// Strip the field terminator, or `None` if it is missing.
fn strip_terminator(bytes: &[u8], level: LexicalLevel) -> Option<&[u8]> {
    if level == LexicalLevel::Ucs2 && bytes.ends_with(&[FIELD_TERMINATOR, 0x00]) {
        return Some(&bytes[..bytes.len() - 2]);
    }
    bytes.strip_suffix(&[FIELD_TERMINATOR])
}

fn decode_fixed(bytes: &[u8], format: SubfieldFormat, bad_text: &mut usize) -> CoercedValue {
    match format {
        SubfieldFormat::Unsigned(_) => CoercedValue::Integer(
            bytes
                .iter()
                .rev()
                .fold(0i64, |acc, &b| (acc << 8) | i64::from(b)),
        ),
        SubfieldFormat::Signed(_) => CoercedValue::Integer(read_signed(bytes)),
        SubfieldFormat::Bits(_) => CoercedValue::Bytes(bytes.to_vec()),
        _ => decode_variable(bytes, format, LexicalLevel::Ascii, bad_text),
    }
}

fn decode_variable(
    bytes: &[u8],
    format: SubfieldFormat,
    level: LexicalLevel,
    bad_text: &mut usize,
) -> CoercedValue {
    let level = if matches!(format, SubfieldFormat::Text) {
        level
    } else {
        LexicalLevel::Ascii
    };
    let decoded = decode_text(bytes, level);
    if decoded.had_errors {
        *bad_text += 1;
    }
    match format {
        SubfieldFormat::Real | SubfieldFormat::FixedReal(_) => {
            let trimmed = decoded.text.trim();
            if trimmed.is_empty() {
                CoercedValue::Text(String::new())
            } else if let Ok(v) = trimmed.parse::<f64>() {
                CoercedValue::Real(v)
            } else {
                *bad_text += 1;
                CoercedValue::Text(decoded.text)
            }
        },
        _ => CoercedValue::Text(decoded.text),
    }
}

/// Little-endian two's complement integer of 1 to 8 bytes.
fn read_signed(bytes: &[u8]) -> i64 {
    let Some(&last) = bytes.last() else {
        return 0;
    };
    let fill = if last & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buf = [fill; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    i64::from_le_bytes(buf)
}

/// Coerce an attribute value according to its catalog type.
///
/// Returns `None` when the text does not parse as the declared type; the
/// caller then keeps the text and records `BAD_ATTRIBUTE_VALUE`. An empty
/// value means "unknown" and is always kept as empty text.
///
/// # Examples
///
/// ```
/// use s57chart::catalog::AttributeType;
/// use s57chart::coerce::{coerce_attribute_value, CoercedValue};
///
/// assert_eq!(
///     coerce_attribute_value("5.0", AttributeType::Float),
///     Some(CoercedValue::Real(5.0))
/// );
/// assert_eq!(
///     coerce_attribute_value("1,3", AttributeType::List),
///     Some(CoercedValue::List(vec!["1".to_string(), "3".to_string()]))
/// );
/// assert_eq!(coerce_attribute_value("deep", AttributeType::Float), None);
/// ```
#[must_use]
pub fn coerce_attribute_value(text: &str, ty: AttributeType) -> Option<CoercedValue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(CoercedValue::Text(String::new()));
    }
    match ty {
        AttributeType::Float => trimmed.parse::<f64>().ok().map(CoercedValue::Real),
        AttributeType::Integer | AttributeType::Enumerated => {
            trimmed.parse::<i64>().ok().map(CoercedValue::Integer)
        },
        AttributeType::List => {
            let items: Vec<String> = trimmed.split(',').map(|s| s.trim().to_string()).collect();
            if items.iter().any(String::is_empty) {
                None
            } else {
                Some(CoercedValue::List(items))
            }
        },
        AttributeType::CodedString | AttributeType::FreeText => {
            Some(CoercedValue::Text(text.to_string()))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::RecoveryMode;
    use crate::schema::{ATTF, DSPM, FRID, SG2D};

    fn collector() -> WarningCollector {
        WarningCollector::new(RecoveryMode::Permissive, 100)
    }

    fn field<'a>(tag: &'a str, bytes: &'a [u8]) -> RawField<'a> {
        RawField {
            tag,
            declared_len: bytes.len(),
            bytes,
        }
    }

    #[test]
    fn test_coerce_fixed_field() {
        let bytes = [100, 7, 0, 0, 0, 3, 1, 42, 0, 1, 0, 1, 0x1E];
        let mut w = collector();
        let f = coerce_field(&field("FRID", &bytes), &FRID, LexicalLevel::Ascii, &mut w, None)
            .unwrap();
        assert_eq!(f.int("RCNM"), Some(100));
        assert_eq!(f.int("RCID"), Some(7));
        assert_eq!(f.int("PRIM"), Some(3));
        assert_eq!(f.int("OBJL"), Some(42));
        assert_eq!(f.int("RUIN"), Some(1));
        assert!(w.is_empty());
    }

    #[test]
    fn test_coerce_repeating_signed() {
        let mut bytes = Vec::new();
        for (y, x) in [(-10i32, 20i32), (30, -40)] {
            bytes.extend_from_slice(&y.to_le_bytes());
            bytes.extend_from_slice(&x.to_le_bytes());
        }
        bytes.push(0x1E);
        let mut w = collector();
        let f = coerce_field(&field("SG2D", &bytes), &SG2D, LexicalLevel::Ascii, &mut w, None)
            .unwrap();
        assert_eq!(f.len(), 2);
        let ys: Vec<i64> = f.column("YCOO").filter_map(CoercedValue::as_i64).collect();
        assert_eq!(ys, vec![-10, 30]);
        assert_eq!(f.value_in(1, "XCOO"), Some(&CoercedValue::Integer(-40)));
    }

    #[test]
    fn test_coerce_attribute_groups() {
        let bytes = b"\x57\x00DEPTH AREA\x1f\x57\x00\x1f\x1e";
        let mut w = collector();
        let f = coerce_field(&field("ATTF", bytes), &ATTF, LexicalLevel::Latin1, &mut w, None)
            .unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.text("ATVL"), Some("DEPTH AREA"));
        assert_eq!(f.value_in(1, "ATVL"), Some(&CoercedValue::Text(String::new())));
        assert!(w.is_empty());
    }

    #[test]
    fn test_unterminated_field_uses_available_bytes() {
        let bytes = [1u8, 0, 0, 0, 2, 0, 0, 0];
        let mut w = collector();
        let f = coerce_field(&field("SG2D", &bytes), &SG2D, LexicalLevel::Ascii, &mut w, Some(9))
            .unwrap();
        assert_eq!(f.len(), 1);
        assert_eq!(w.count(WarningCode::UnterminatedField), 1);
        assert_eq!(w.warnings()[0].record_id, Some(9));
    }

    #[test]
    fn test_partial_group_is_len_mismatch() {
        let bytes = [1u8, 0, 0, 0, 2, 0, 0, 0, 9, 9, 0x1E];
        let mut w = collector();
        let f = coerce_field(&field("SG2D", &bytes), &SG2D, LexicalLevel::Ascii, &mut w, None)
            .unwrap();
        assert_eq!(f.len(), 1);
        assert_eq!(w.count(WarningCode::FieldLenMismatch), 1);
    }

    #[test]
    fn test_clipped_field_is_len_mismatch() {
        let bytes = [1u8, 0, 0, 0, 2, 0, 0, 0, 0x1E];
        let raw = RawField {
            tag: "SG2D",
            declared_len: 17,
            bytes: &bytes,
        };
        let mut w = collector();
        coerce_field(&raw, &SG2D, LexicalLevel::Ascii, &mut w, None).unwrap();
        assert_eq!(w.count(WarningCode::FieldLenMismatch), 1);
    }

    #[test]
    fn test_dspm_trailing_text() {
        let mut bytes = vec![20, 1, 0, 0, 0, 2, 12, 12];
        bytes.extend_from_slice(&50_000u32.to_le_bytes());
        bytes.extend_from_slice(&[1, 1, 1, 1]);
        bytes.extend_from_slice(&10_000_000u32.to_le_bytes());
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(b"\x1f\x1e");
        let mut w = collector();
        let f = coerce_field(&field("DSPM", &bytes), &DSPM, LexicalLevel::Ascii, &mut w, None)
            .unwrap();
        assert_eq!(f.int("CSCL"), Some(50_000));
        assert_eq!(f.int("COMF"), Some(10_000_000));
        assert_eq!(f.int("SOMF"), Some(10));
        assert_eq!(f.text("COMT"), Some(""));
        assert!(w.is_empty());
    }

    #[test]
    fn test_bad_encoding_falls_back_to_text() {
        let bytes = b"\x57\x00caf\xe9\x1f\x1e";
        let mut w = collector();
        let f = coerce_field(&field("ATTF", bytes), &ATTF, LexicalLevel::Ascii, &mut w, None)
            .unwrap();
        assert_eq!(f.text("ATVL"), Some("café"));
        assert_eq!(w.count(WarningCode::BadEncoding), 1);
    }

    #[test]
    fn test_read_signed() {
        assert_eq!(read_signed(&(-5i32).to_le_bytes()), -5);
        assert_eq!(read_signed(&[0xFF]), -1);
        assert_eq!(read_signed(&[0x7F]), 127);
    }

    #[test]
    fn test_attribute_types() {
        assert_eq!(
            coerce_attribute_value("12", AttributeType::Enumerated),
            Some(CoercedValue::Integer(12))
        );
        assert_eq!(
            coerce_attribute_value("", AttributeType::Float),
            Some(CoercedValue::Text(String::new()))
        );
        assert_eq!(coerce_attribute_value("1,,3", AttributeType::List), None);
        assert_eq!(
            coerce_attribute_value("Shoal", AttributeType::FreeText),
            Some(CoercedValue::Text("Shoal".to_string()))
        );
    }
}
