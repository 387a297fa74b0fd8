//! Character decoding for S-57 lexical levels.
//!
//! S-57 text subfields are written at one of three lexical levels, declared
//! per data set in the DSSI field:
//!
//! - Level 0: ASCII
//! - Level 1: ISO 8859-1 (Latin-1)
//! - Level 2: UCS-2, little-endian, with two-byte unit and field terminators
//!
//! ATTF values use the ATTF lexical level (`AALL`), NATF values the national
//! level (`NALL`). All other text subfields are level 0.
//!
//! Decoding never fails: undecodable input is replaced lossily and flagged so
//! the caller can record a `BAD_ENCODING` warning. Decoded text is normalised
//! to Unicode NFC.

use encoding_rs::{UTF_16LE, WINDOWS_1252};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Lexical level of a text subfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LexicalLevel {
    /// Level 0: ASCII text
    #[default]
    Ascii,
    /// Level 1: ISO 8859-1 text
    Latin1,
    /// Level 2: UCS-2 text
    Ucs2,
}

impl LexicalLevel {
    /// Map a DSSI `AALL`/`NALL` value to a level. Unknown values fall back to Latin-1.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => LexicalLevel::Ascii,
            2 => LexicalLevel::Ucs2,
            _ => LexicalLevel::Latin1,
        }
    }

    /// Width of one code unit in bytes.
    #[must_use]
    pub fn unit_width(self) -> usize {
        match self {
            LexicalLevel::Ucs2 => 2,
            _ => 1,
        }
    }

    /// Find the end of a unit-terminated subfield starting at `bytes[0]`.
    ///
    /// Returns `(content_len, consumed_len)`; `consumed_len` includes the
    /// terminator when one was found.
    #[must_use]
    pub fn find_unit_end(self, bytes: &[u8]) -> (usize, usize) {
        match self {
            LexicalLevel::Ucs2 => {
                let mut i = 0;
                while i + 1 < bytes.len() {
                    if bytes[i] == 0x1F && bytes[i + 1] == 0x00 {
                        return (i, i + 2);
                    }
                    i += 2;
                }
                // A level 2 field may still close with a single-byte terminator.
                match memchr::memchr(0x1F, bytes) {
                    Some(pos) if pos % 2 == 0 => (pos, pos + 1),
                    _ => (bytes.len(), bytes.len()),
                }
            },
            _ => match memchr::memchr(0x1F, bytes) {
                Some(pos) => (pos, pos + 1),
                None => (bytes.len(), bytes.len()),
            },
        }
    }
}

/// Decoded text and whether decoding had to replace anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The decoded, NFC-normalised text
    pub text: String,
    /// Whether the input was not valid at its lexical level
    pub had_errors: bool,
}

/// Decode subfield bytes at a lexical level.
///
/// # Examples
///
/// ```
/// use s57chart::encoding::{decode_text, LexicalLevel};
///
/// let decoded = decode_text(&[0x48, 0x00, 0xE9, 0x00], LexicalLevel::Ucs2);
/// assert_eq!(decoded.text, "Hé");
/// assert!(!decoded.had_errors);
/// ```
#[must_use]
pub fn decode_text(bytes: &[u8], level: LexicalLevel) -> DecodedText {
    let (text, had_errors) = match level {
        LexicalLevel::Ascii => {
            if bytes.is_ascii() {
                (String::from_utf8_lossy(bytes).into_owned(), false)
            } else {
                let (cow, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
                (cow.into_owned(), true)
            }
        },
        LexicalLevel::Latin1 => {
            let (cow, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (cow.into_owned(), had_errors)
        },
        LexicalLevel::Ucs2 => {
            let (cow, had_errors) = UTF_16LE.decode_without_bom_handling(bytes);
            (cow.into_owned(), had_errors || bytes.len() % 2 != 0)
        },
    };
    DecodedText {
        text: text.nfc().collect(),
        had_errors,
    }
}
