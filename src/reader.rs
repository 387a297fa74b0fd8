//! Reading ISO 8211 logical records from a byte buffer.
//!
//! This module provides [`RecordReader`], a lazy iterator over the logical
//! records of one buffer. Each item is either a [`RawRecord`] (leader,
//! directory, and borrowed field bytes, with no subfield interpretation yet)
//! or a [`RecordError`] describing a record that failed structural
//! validation. After an error the reader has already resynchronised on the
//! next plausible record start, so iteration simply continues.
//!
//! # Examples
//!
//! ```
//! use s57chart::reader::RecordReader;
//! use s57chart::writer::CellWriter;
//!
//! let mut writer = CellWriter::new();
//! writer.push_record(&[("0001", vec![1, 0])]);
//! let bytes = writer.into_bytes();
//!
//! for item in RecordReader::new(&bytes) {
//!     let record = item?;
//!     assert_eq!(record.directory.len(), 1);
//! }
//! # Ok::<(), s57chart::reader::RecordError>(())
//! ```

use crate::error::ChartError;
use crate::leader::{Leader, LEADER_LEN};
use crate::recovery::resync_offset;
use crate::warning::WarningCode;
use std::fmt;

/// The ISO 8211 field terminator.
pub const FIELD_TERMINATOR: u8 = 0x1E;
/// The ISO 8211 unit (subfield) terminator.
pub const UNIT_TERMINATOR: u8 = 0x1F;

/// One directory entry: where a field lives inside the field area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Field tag
    pub tag: String,
    /// Declared field length in bytes, including the field terminator
    pub length: usize,
    /// Field position relative to the base address
    pub position: usize,
}

/// A structurally valid logical record, borrowing its bytes from the input.
#[derive(Debug, Clone)]
pub struct RawRecord<'a> {
    /// Byte offset of the record within the buffer
    pub offset: usize,
    /// Position of the record in the buffer (0 = first)
    pub index: usize,
    /// Decoded leader
    pub leader: Leader,
    /// Directory entries in file order
    pub directory: Vec<DirectoryEntry>,
    bytes: &'a [u8],
}

/// Raw bytes of one field. Never outlives its [`RawRecord`].
#[derive(Debug, Clone, Copy)]
pub struct RawField<'r> {
    /// Field tag
    pub tag: &'r str,
    /// Length declared by the directory
    pub declared_len: usize,
    /// Bytes actually available, clipped to the record end
    pub bytes: &'r [u8],
}

impl RawField<'_> {
    /// Whether fewer bytes were available than the directory declared.
    #[must_use]
    pub fn is_clipped(&self) -> bool {
        self.bytes.len() < self.declared_len
    }
}

impl<'a> RawRecord<'a> {
    /// The record's complete bytes, leader included.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Whether this is the data descriptive record.
    #[must_use]
    pub fn is_ddr(&self) -> bool {
        self.leader.is_ddr()
    }

    /// Iterate the fields in directory order.
    pub fn fields(&self) -> impl Iterator<Item = RawField<'_>> {
        self.directory.iter().map(move |entry| self.field_at(entry))
    }

    /// The first field with the given tag.
    #[must_use]
    pub fn field(&self, tag: &str) -> Option<RawField<'_>> {
        self.directory
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| self.field_at(entry))
    }

    fn field_at<'r>(&'r self, entry: &'r DirectoryEntry) -> RawField<'r> {
        let start = self.leader.base_address as usize + entry.position;
        let end = (start + entry.length).min(self.bytes.len());
        RawField {
            tag: &entry.tag,
            declared_len: entry.length,
            bytes: &self.bytes[start.min(end)..end],
        }
    }
}

/// A record that failed structural validation.
#[derive(Debug)]
pub struct RecordError {
    /// Byte offset where the rejected record started
    pub offset: usize,
    /// Position of the rejected record in the buffer
    pub index: usize,
    /// Warning code to report the rejection under
    pub code: WarningCode,
    /// Offset reading resumed at, if any record start was found
    pub resumed_at: Option<usize>,
    /// The structural error itself
    pub error: ChartError,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {} at offset {}: {}", self.index, self.offset, self.error)?;
        match self.resumed_at {
            Some(next) => write!(f, " (resumed at offset {next})"),
            None => write!(f, " (no further record found)"),
        }
    }
}

impl std::error::Error for RecordError {}

/// Lazy, restartable iterator over the logical records of a buffer.
#[derive(Debug, Clone)]
pub struct RecordReader<'a> {
    buffer: &'a [u8],
    pos: usize,
    index: usize,
}

impl<'a> RecordReader<'a> {
    /// Create a reader positioned at the start of `buffer`.
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        RecordReader {
            buffer,
            pos: 0,
            index: 0,
        }
    }

    /// Rewind to the start of the buffer.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.index = 0;
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn fail(&mut self, code: WarningCode, error: ChartError, declared: Option<usize>) -> RecordError {
        let offset = self.pos;
        let index = self.index;
        self.index += 1;
        let resumed_at = if code == WarningCode::TruncatedLeader {
            None
        } else {
            resync_offset(self.buffer, offset, declared)
        };
        self.pos = resumed_at.unwrap_or(self.buffer.len());
        RecordError {
            offset,
            index,
            code,
            resumed_at,
            error,
        }
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = Result<RawRecord<'a>, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.buffer.len().checked_sub(self.pos)?;
        if remaining == 0 {
            return None;
        }
        if remaining < LEADER_LEN {
            let err = ChartError::TruncatedRecord(format!(
                "{remaining} trailing bytes cannot hold a leader"
            ));
            return Some(Err(self.fail(WarningCode::TruncatedLeader, err, None)));
        }

        let leader_bytes = &self.buffer[self.pos..self.pos + LEADER_LEN];
        let leader = match Leader::from_bytes(leader_bytes) {
            Ok(leader) => leader,
            Err(e) => {
                let declared = declared_length(leader_bytes);
                return Some(Err(self.fail(WarningCode::RecordSkipped, e, declared)));
            },
        };
        let declared = Some(leader.record_length as usize);
        if let Err(e) = leader.validate() {
            return Some(Err(self.fail(WarningCode::RecordSkipped, e, declared)));
        }

        let record_length = leader.record_length as usize;
        if record_length > remaining {
            let err = ChartError::TruncatedRecord(format!(
                "Record declares {record_length} bytes but only {remaining} remain"
            ));
            return Some(Err(self.fail(WarningCode::RecordSkipped, err, None)));
        }

        let bytes = &self.buffer[self.pos..self.pos + record_length];
        let directory = match parse_directory(bytes, &leader) {
            Ok(directory) => directory,
            Err(e) => return Some(Err(self.fail(WarningCode::RecordSkipped, e, declared))),
        };

        let record = RawRecord {
            offset: self.pos,
            index: self.index,
            leader,
            directory,
            bytes,
        };
        tracing::trace!(
            offset = record.offset,
            fields = record.directory.len(),
            "read record"
        );
        self.pos += record_length;
        self.index += 1;
        Some(Ok(record))
    }
}

/// Record length digits of a leader that otherwise failed to parse.
fn declared_length(leader_bytes: &[u8]) -> Option<usize> {
    let digits = &leader_bytes[..5];
    if digits.iter().all(u8::is_ascii_digit) {
        std::str::from_utf8(digits).ok()?.parse().ok()
    } else {
        None
    }
}

/// Walk the directory until the field terminator.
fn parse_directory(record: &[u8], leader: &Leader) -> Result<Vec<DirectoryEntry>, ChartError> {
    let base = leader.base_address as usize;
    let map = leader.entry_map;
    let entry_len = map.entry_len();
    let tag_size = usize::from(map.tag_size);
    let len_size = usize::from(map.length_size);
    let field_area = record.len() - base;

    let mut entries = Vec::new();
    let mut pos = LEADER_LEN;
    loop {
        if pos >= base {
            return Err(ChartError::InvalidDirectory(format!(
                "Directory runs past base address {base} without a terminator"
            )));
        }
        if record[pos] == FIELD_TERMINATOR {
            break;
        }
        if pos + entry_len > base {
            return Err(ChartError::InvalidDirectory(format!(
                "Incomplete directory entry at byte {pos}"
            )));
        }

        let chunk = &record[pos..pos + entry_len];
        let tag = String::from_utf8_lossy(&chunk[..tag_size]).to_string();
        let length = parse_number(&chunk[tag_size..tag_size + len_size])?;
        let position = parse_number(&chunk[tag_size + len_size..])?;
        if position >= field_area && length > 0 {
            return Err(ChartError::InvalidField(format!(
                "Field {tag} starts at {position}, past the {field_area}-byte field area"
            )));
        }
        entries.push(DirectoryEntry {
            tag,
            length,
            position,
        });
        pos += entry_len;
    }

    if pos + 1 != base {
        return Err(ChartError::InvalidDirectory(format!(
            "Directory ends at byte {} but base address is {base}",
            pos + 1
        )));
    }
    Ok(entries)
}

/// Parse a directory number from ASCII digits.
fn parse_number(bytes: &[u8]) -> Result<usize, ChartError> {
    let mut result = 0usize;
    for &byte in bytes {
        if byte.is_ascii_digit() {
            result = result * 10 + usize::from(byte - b'0');
        } else {
            return Err(ChartError::InvalidDirectory(format!(
                "Invalid numeric directory entry: '{}'",
                String::from_utf8_lossy(bytes)
            )));
        }
    }
    Ok(result)
}
