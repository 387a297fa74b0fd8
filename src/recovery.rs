//! Recovery strategies for malformed records.
//!
//! A single corrupted record must not invalidate a whole chart. When the
//! record reader rejects a record it asks this module where the next record
//! most likely starts, and continues from there.
//!
//! Two strategies are tried in order:
//!
//! 1. If the rejected leader still declares a plausible record length, skip
//!    exactly that many bytes.
//! 2. Otherwise scan forward for the next offset that decodes as a valid
//!    leader (see [`boundary_scanner`](crate::boundary_scanner)).

use crate::boundary_scanner::RecordBoundaryScanner;
use crate::leader::{Leader, LEADER_LEN};
use serde::{Deserialize, Serialize};

/// Strategy for handling malformed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryMode {
    /// Strict mode: the first error-severity warning aborts the parse.
    Strict,
    /// Permissive mode: record everything, never fail on data quality (default)
    #[default]
    Permissive,
}

/// Compute where reading should resume after the record at `offset` was rejected.
///
/// `declared_len` is the record length the rejected leader declared, if its
/// digits could be read at all. Returns `None` when no further record start
/// can be found.
#[must_use]
pub fn resync_offset(buffer: &[u8], offset: usize, declared_len: Option<usize>) -> Option<usize> {
    if let Some(len) = declared_len {
        let next = offset.saturating_add(len);
        if len >= LEADER_LEN && next <= buffer.len() && plausible_start(buffer, next) {
            return Some(next);
        }
    }
    RecordBoundaryScanner::new().next_candidate(buffer, offset + 1)
}

/// Whether a record could start at `pos` (or `pos` is the clean end of the buffer).
fn plausible_start(buffer: &[u8], pos: usize) -> bool {
    if pos == buffer.len() {
        return true;
    }
    buffer
        .get(pos..pos + LEADER_LEN)
        .is_some_and(|bytes| Leader::from_bytes(bytes).and_then(|l| l.validate()).is_ok())
}
