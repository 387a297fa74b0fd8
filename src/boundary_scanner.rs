//! Record start detection for resynchronisation after a corrupted record.
//!
//! ISO 8211 records have no record terminator: a record ends where its
//! leader says it ends. Once a leader is unreadable that information is
//! lost, so this scanner looks for the next offset that can plausibly start
//! a record. Every record ends with the field terminator (0x1E) of its last
//! field, so candidates are the offsets directly after a 0x1E byte. The
//! SIMD-accelerated `memchr` crate locates those bytes.
//!
//! # Example
//!
//! ```
//! use s57chart::boundary_scanner::RecordBoundaryScanner;
//!
//! let mut buffer = b"garbage\x1e".to_vec();
//! buffer.extend_from_slice(b"00026 D     00025   3404\x1e\x1e");
//! let scanner = RecordBoundaryScanner::new();
//! assert_eq!(scanner.next_candidate(&buffer, 0), Some(8));
//! ```

use crate::leader::{Leader, LEADER_LEN};

/// The ISO 8211 field terminator.
const FIELD_TERMINATOR: u8 = 0x1E;

/// Scanner locating plausible record starts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordBoundaryScanner {
    require_data_record: bool,
}

impl RecordBoundaryScanner {
    /// Create a scanner accepting any valid leader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            require_data_record: false,
        }
    }

    /// Only accept data record leaders (`D`/`R`), never a DDR.
    ///
    /// A cell has one DDR at its start, so a DDR-looking leader in the middle
    /// of a buffer is almost certainly a false positive.
    #[must_use]
    pub fn data_records_only(mut self) -> Self {
        self.require_data_record = true;
        self
    }

    /// Find the first plausible record start at or after `from`.
    ///
    /// Only offsets directly following a field terminator are considered.
    /// A candidate must decode as a leader that passes validation and whose
    /// declared record fits in the buffer.
    #[must_use]
    pub fn next_candidate(&self, buffer: &[u8], from: usize) -> Option<usize> {
        if from >= buffer.len() {
            return None;
        }
        memchr::memchr_iter(FIELD_TERMINATOR, &buffer[from..])
            .map(|pos| from + pos + 1)
            .find(|&candidate| self.is_record_start(buffer, candidate))
    }

    /// Count plausible record starts after `from`, for diagnostics.
    #[must_use]
    pub fn count_candidates(&self, buffer: &[u8], from: usize) -> usize {
        let mut count = 0;
        let mut pos = from;
        while let Some(next) = self.next_candidate(buffer, pos) {
            count += 1;
            pos = next;
        }
        count
    }

    fn is_record_start(&self, buffer: &[u8], pos: usize) -> bool {
        let Some(bytes) = buffer.get(pos..pos + LEADER_LEN) else {
            return false;
        };
        let Ok(leader) = Leader::from_bytes(bytes) else {
            return false;
        };
        if self.require_data_record && leader.is_ddr() {
            return false;
        }
        leader.validate().is_ok() && pos + leader.record_length as usize <= buffer.len()
    }
}
