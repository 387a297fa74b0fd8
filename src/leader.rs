//! ISO 8211 record leader parsing.
//!
//! The leader is a 24-byte fixed-length header at the start of every ISO 8211
//! logical record. It declares the record length, where the field area
//! begins, and the widths of the directory entries that follow it.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Interchange level (`3` in the DDR, blank in data records)
//! - Position 6: Leader identifier (`L` = DDR, `D` or `R` = data record)
//! - Position 7: Inline code extension indicator
//! - Position 8: Version number
//! - Position 9: Application indicator
//! - Positions 10-11: Field control length (`09` in the DDR)
//! - Positions 12-16: Base address of field area (5 digits)
//! - Positions 17-19: Extended character set indicator
//! - Positions 20-23: Entry map (size of field length, size of field position,
//!   reserved, size of field tag)

use crate::error::{ChartError, Result};
use serde::{Deserialize, Serialize};

/// Length of every ISO 8211 leader.
pub const LEADER_LEN: usize = 24;

/// Widths of the three parts of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMap {
    /// Digits used for a field length (position 20)
    pub length_size: u8,
    /// Digits used for a field position (position 21)
    pub position_size: u8,
    /// Characters used for a field tag (position 23)
    pub tag_size: u8,
}

impl EntryMap {
    /// Total width of one directory entry.
    #[must_use]
    pub fn entry_len(&self) -> usize {
        usize::from(self.length_size) + usize::from(self.position_size) + usize::from(self.tag_size)
    }
}

impl Default for EntryMap {
    /// The entry map S-57 producers write: 3-digit lengths, 4-digit positions, 4-character tags.
    fn default() -> Self {
        EntryMap {
            length_size: 3,
            position_size: 4,
            tag_size: 4,
        }
    }
}

/// ISO 8211 leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: u32,
    /// Interchange level - position 5
    pub interchange_level: char,
    /// Leader identifier - position 6
    pub leader_id: char,
    /// Inline code extension indicator - position 7
    pub inline_code_extension: char,
    /// Version number - position 8
    pub version: char,
    /// Application indicator - position 9
    pub application_indicator: char,
    /// Field control length - positions 10-11 (0 when blank)
    pub field_control_length: u8,
    /// Base address of field area (5 digits) - positions 12-16
    pub base_address: u32,
    /// Extended character set indicator - positions 17-19
    pub extended_charset: String,
    /// Directory entry widths - positions 20-23
    pub entry_map: EntryMap,
}

impl Leader {
    /// Leader for a data descriptive record.
    #[must_use]
    pub fn for_ddr(record_length: u32, base_address: u32, entry_map: EntryMap) -> Self {
        Leader {
            record_length,
            interchange_level: '3',
            leader_id: 'L',
            inline_code_extension: 'E',
            version: '1',
            application_indicator: ' ',
            field_control_length: 9,
            base_address,
            extended_charset: " ! ".to_string(),
            entry_map,
        }
    }

    /// Leader for a data record.
    #[must_use]
    pub fn for_data_record(record_length: u32, base_address: u32, entry_map: EntryMap) -> Self {
        Leader {
            record_length,
            interchange_level: ' ',
            leader_id: 'D',
            inline_code_extension: ' ',
            version: ' ',
            application_indicator: ' ',
            field_control_length: 0,
            base_address,
            extended_charset: "   ".to_string(),
            entry_map,
        }
    }

    /// Whether this leader introduces the data descriptive record.
    #[must_use]
    pub fn is_ddr(&self) -> bool {
        self.leader_id == 'L'
    }

    /// Parse a leader from 24 bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are too short or a numeric position
    /// holds something other than digits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < LEADER_LEN {
            return Err(ChartError::InvalidLeader(format!(
                "Leader must be at least {LEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let record_length = parse_digits(&bytes[0..5])?;
        let field_control_length = if &bytes[10..12] == b"  " {
            0
        } else {
            u8::try_from(parse_digits(&bytes[10..12])?).map_err(|_| {
                ChartError::InvalidLeader("Field control length out of range".to_string())
            })?
        };
        let base_address = parse_digits(&bytes[12..17])?;

        let entry_map = EntryMap {
            length_size: entry_size(bytes[20], 20)?,
            position_size: entry_size(bytes[21], 21)?,
            tag_size: entry_size(bytes[23], 23)?,
        };

        Ok(Leader {
            record_length,
            interchange_level: bytes[5] as char,
            leader_id: bytes[6] as char,
            inline_code_extension: bytes[7] as char,
            version: bytes[8] as char,
            application_indicator: bytes[9] as char,
            field_control_length,
            base_address,
            extended_charset: String::from_utf8_lossy(&bytes[17..20]).to_string(),
            entry_map,
        })
    }

    /// Validate the leader's internal consistency.
    ///
    /// Checks the leader identifier, that the record length covers at least
    /// the leader, and that the base address leaves room for a directory and
    /// does not point past the end of the record.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.leader_id, 'L' | 'D' | 'R') {
            return Err(ChartError::InvalidLeader(format!(
                "Unknown leader identifier '{}'",
                self.leader_id
            )));
        }
        if (self.record_length as usize) < LEADER_LEN {
            return Err(ChartError::InvalidLeader(format!(
                "Record length must be at least {LEADER_LEN}, got {}",
                self.record_length
            )));
        }
        // Leader plus at least the directory terminator.
        if (self.base_address as usize) <= LEADER_LEN {
            return Err(ChartError::InvalidLeader(format!(
                "Base address must be greater than {LEADER_LEN}, got {}",
                self.base_address
            )));
        }
        if self.base_address > self.record_length {
            return Err(ChartError::InvalidLeader(format!(
                "Base address {} exceeds record length {}",
                self.base_address, self.record_length
            )));
        }
        Ok(())
    }

    /// Serialize leader to 24 bytes
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric value does not fit its positions.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        if self.record_length > 99_999 || self.base_address > 99_999 {
            return Err(ChartError::InvalidLeader(format!(
                "Record length {} or base address {} exceeds 5 digits",
                self.record_length, self.base_address
            )));
        }
        let mut bytes = Vec::with_capacity(LEADER_LEN);
        bytes.extend_from_slice(format!("{:05}", self.record_length).as_bytes());
        bytes.push(self.interchange_level as u8);
        bytes.push(self.leader_id as u8);
        bytes.push(self.inline_code_extension as u8);
        bytes.push(self.version as u8);
        bytes.push(self.application_indicator as u8);
        if self.field_control_length == 0 {
            bytes.extend_from_slice(b"  ");
        } else {
            bytes.extend_from_slice(format!("{:02}", self.field_control_length).as_bytes());
        }
        bytes.extend_from_slice(format!("{:05}", self.base_address).as_bytes());

        let charset = self.extended_charset.as_bytes();
        if charset.len() != 3 {
            return Err(ChartError::InvalidLeader(format!(
                "Extended character set indicator must be 3 characters, got {}",
                charset.len()
            )));
        }
        bytes.extend_from_slice(charset);
        bytes.push(b'0' + self.entry_map.length_size);
        bytes.push(b'0' + self.entry_map.position_size);
        bytes.push(b'0');
        bytes.push(b'0' + self.entry_map.tag_size);

        Ok(bytes)
    }
}

/// Parse an ASCII number from bytes
fn parse_digits(bytes: &[u8]) -> Result<u32> {
    let mut result = 0u32;
    for &byte in bytes {
        if byte.is_ascii_digit() {
            result = result * 10 + u32::from(byte - b'0');
        } else {
            return Err(ChartError::InvalidLeader(format!(
                "Invalid numeric field: '{}'",
                String::from_utf8_lossy(bytes)
            )));
        }
    }
    Ok(result)
}

fn entry_size(byte: u8, position: usize) -> Result<u8> {
    match byte {
        b'1'..=b'9' => Ok(byte - b'0'),
        _ => Err(ChartError::InvalidLeader(format!(
            "Invalid entry map size at position {position}: '{}'",
            byte as char
        ))),
    }
}
