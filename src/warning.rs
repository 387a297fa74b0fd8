//! Severity-classified, capped sink for non-fatal parsing anomalies.
//!
//! Every stage of a parse receives the same [`WarningCollector`]. In
//! permissive mode the collector only records; in strict mode the first
//! error-severity warning is turned into a [`ChartError::Strict`] and the parse
//! stops there.
//!
//! The collector is owned by a single parse invocation. It is never shared
//! between parses, so independent parses on different threads need no locking.
//!
//! # Examples
//!
//! ```
//! use s57chart::recovery::RecoveryMode;
//! use s57chart::warning::{Severity, WarningCode, WarningCollector};
//!
//! let mut warnings = WarningCollector::new(RecoveryMode::Permissive, 10);
//! warnings
//!     .push(Severity::Warning, WarningCode::UnknownObjCode, "code 9999")
//!     .unwrap();
//! assert_eq!(warnings.len(), 1);
//! ```

use crate::error::{ChartError, Result};
use crate::recovery::RecoveryMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of warnings retained per parse.
pub const DEFAULT_WARNING_CAP: usize = 1_000;

/// Warning severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational: data was normalised (e.g. a ring was closed).
    Info,
    /// Data was degraded or ignored but the chart is still usable.
    Warning,
    /// A record or update was rejected. Fatal in strict mode.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Closed enumeration of warning codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// A record failed structural validation and was skipped.
    RecordSkipped,
    /// Trailing bytes too short to hold a leader.
    TruncatedLeader,
    /// A field is missing its field terminator.
    UnterminatedField,
    /// A field's declared length differs from its content.
    FieldLenMismatch,
    /// A field tag not present in the static schema.
    UnknownFieldTag,
    /// Text that could not be decoded at its lexical level.
    BadEncoding,
    /// An attribute value that failed its typed coercion.
    BadAttributeValue,
    /// An object class code missing from the catalog.
    UnknownObjCode,
    /// An attribute code missing from the catalog.
    UnknownAttrCode,
    /// A required attribute of the object class is absent.
    MissingRequiredAttr,
    /// A depth value outside the configured sane range.
    DepthOutOfRange,
    /// A scale factor was not present and a default was used.
    ScaleDefaulted,
    /// A spatial pointer refers to a record that does not exist.
    DanglingPointer,
    /// A geometry has too few coordinates for its type.
    CoordCountMismatch,
    /// An open area ring was closed automatically.
    PolygonClosedAuto,
    /// An area had more than one exterior ring; only the first is kept.
    ExtraExteriorRing,
    /// A feature with no resolvable geometry was dropped.
    NoGeometry,
    /// A feature record without spatial primitive was dropped.
    NonSpatialFeature,
    /// An update buffer does not follow the last applied update.
    UpdateGap,
    /// An update buffer is older than the last applied update.
    UpdateStale,
    /// An update buffer belongs to another cell.
    UpdateCellMismatch,
    /// An update record's version does not follow the current version.
    VersionMismatch,
    /// An update targets a record that does not exist.
    UpdateTargetMissing,
    /// An insert targets a record that already exists.
    DuplicateRecord,
}

impl WarningCode {
    /// The canonical upper-case name of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCode::RecordSkipped => "RECORD_SKIPPED",
            WarningCode::TruncatedLeader => "TRUNCATED_LEADER",
            WarningCode::UnterminatedField => "UNTERMINATED_FIELD",
            WarningCode::FieldLenMismatch => "FIELD_LEN_MISMATCH",
            WarningCode::UnknownFieldTag => "UNKNOWN_FIELD_TAG",
            WarningCode::BadEncoding => "BAD_ENCODING",
            WarningCode::BadAttributeValue => "BAD_ATTRIBUTE_VALUE",
            WarningCode::UnknownObjCode => "UNKNOWN_OBJ_CODE",
            WarningCode::UnknownAttrCode => "UNKNOWN_ATTR_CODE",
            WarningCode::MissingRequiredAttr => "MISSING_REQUIRED_ATTR",
            WarningCode::DepthOutOfRange => "DEPTH_OUT_OF_RANGE",
            WarningCode::ScaleDefaulted => "SCALE_DEFAULTED",
            WarningCode::DanglingPointer => "DANGLING_POINTER",
            WarningCode::CoordCountMismatch => "COORD_COUNT_MISMATCH",
            WarningCode::PolygonClosedAuto => "POLYGON_CLOSED_AUTO",
            WarningCode::ExtraExteriorRing => "EXTRA_EXTERIOR_RING",
            WarningCode::NoGeometry => "NO_GEOMETRY",
            WarningCode::NonSpatialFeature => "NON_SPATIAL_FEATURE",
            WarningCode::UpdateGap => "UPDATE_GAP",
            WarningCode::UpdateStale => "UPDATE_STALE",
            WarningCode::UpdateCellMismatch => "UPDATE_CELL_MISMATCH",
            WarningCode::VersionMismatch => "VERSION_MISMATCH",
            WarningCode::UpdateTargetMissing => "UPDATE_TARGET_MISSING",
            WarningCode::DuplicateRecord => "DUPLICATE_RECORD",
        }
    }

    /// Whether the code belongs to update sequencing.
    #[must_use]
    pub fn is_sequencing(self) -> bool {
        matches!(
            self,
            WarningCode::UpdateGap
                | WarningCode::UpdateStale
                | WarningCode::UpdateCellMismatch
                | WarningCode::VersionMismatch
        )
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-fatal anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Severity of the anomaly.
    pub severity: Severity,
    /// Machine-readable code.
    pub code: WarningCode,
    /// Human-readable description.
    pub message: String,
    /// Record the anomaly is attributed to, if any.
    pub record_id: Option<u32>,
}

impl Warning {
    /// Create a warning without record attribution.
    pub fn new(severity: Severity, code: WarningCode, message: impl Into<String>) -> Self {
        Warning {
            severity,
            code,
            message: message.into(),
            record_id: None,
        }
    }

    /// Attribute the warning to a record.
    #[must_use]
    pub fn for_record(mut self, record_id: u32) -> Self {
        self.record_id = Some(record_id);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record_id {
            Some(id) => write!(f, "[{}] {} (record {id}): {}", self.severity, self.code, self.message),
            None => write!(f, "[{}] {}: {}", self.severity, self.code, self.message),
        }
    }
}

/// Bounded per-parse warning sink.
#[derive(Debug, Clone)]
pub struct WarningCollector {
    mode: RecoveryMode,
    cap: usize,
    warnings: Vec<Warning>,
    dropped: usize,
}

impl WarningCollector {
    /// Create a collector for one parse.
    #[must_use]
    pub fn new(mode: RecoveryMode, cap: usize) -> Self {
        WarningCollector {
            mode,
            cap,
            warnings: Vec::new(),
            dropped: 0,
        }
    }

    /// The recovery mode this collector enforces.
    #[must_use]
    pub fn mode(&self) -> RecoveryMode {
        self.mode
    }

    /// Record a warning.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ChartError::Strict`] for the first
    /// error-severity warning. The warning is recorded before the error is
    /// returned so it stays observable.
    pub fn record(&mut self, warning: Warning) -> Result<()> {
        let promote = self.mode == RecoveryMode::Strict && warning.severity == Severity::Error;
        tracing::trace!(code = %warning.code, severity = %warning.severity, "{}", warning.message);

        if self.warnings.len() < self.cap {
            if promote {
                self.warnings.push(warning.clone());
            } else {
                self.warnings.push(warning);
                return Ok(());
            }
        } else {
            if self.dropped == 0 {
                tracing::warn!(cap = self.cap, "warning cap reached, further warnings are dropped");
            }
            self.dropped += 1;
            if !promote {
                return Ok(());
            }
        }
        Err(ChartError::Strict(warning))
    }

    /// Record a warning built from its parts.
    ///
    /// # Errors
    ///
    /// See [`record`](Self::record).
    pub fn push(
        &mut self,
        severity: Severity,
        code: WarningCode,
        message: impl Into<String>,
    ) -> Result<()> {
        self.record(Warning::new(severity, code, message))
    }

    /// Record a warning attributed to a record.
    ///
    /// # Errors
    ///
    /// See [`record`](Self::record).
    pub fn push_for(
        &mut self,
        record_id: u32,
        severity: Severity,
        code: WarningCode,
        message: impl Into<String>,
    ) -> Result<()> {
        self.record(Warning::new(severity, code, message).for_record(record_id))
    }

    /// Number of retained warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether no warning was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Whether the cap was reached and warnings were dropped.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.dropped > 0
    }

    /// Number of warnings dropped after the cap was reached.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Retained warnings in the order they were recorded.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Count of retained warnings with the given code.
    #[must_use]
    pub fn count(&self, code: WarningCode) -> usize {
        self.warnings.iter().filter(|w| w.code == code).count()
    }

    /// Consume the collector into a report.
    #[must_use]
    pub fn into_report(self) -> WarningReport {
        WarningReport {
            warnings: self.warnings,
            dropped: self.dropped,
        }
    }
}

/// Warnings retained by a finished parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningReport {
    /// Retained warnings.
    pub warnings: Vec<Warning>,
    /// Warnings dropped after the cap was reached.
    pub dropped: usize,
}

impl WarningReport {
    /// Whether warnings were dropped.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.dropped > 0
    }

    /// Count of retained warnings with the given severity.
    #[must_use]
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.warnings.iter().filter(|w| w.severity == severity).count()
    }

    /// Count of retained warnings with the given code.
    #[must_use]
    pub fn count(&self, code: WarningCode) -> usize {
        self.warnings.iter().filter(|w| w.code == code).count()
    }

    /// Iterate the retained warnings.
    pub fn iter(&self) -> std::slice::Iter<'_, Warning> {
        self.warnings.iter()
    }

    /// Number of retained warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether nothing was retained or dropped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.dropped == 0
    }
}
