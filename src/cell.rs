//! Decoding a whole cell or update file, and the record arenas features are built from.
//!
//! [`Cell::decode`] runs the record reader over one buffer and turns every
//! data record into a typed [`S57Record`](crate::record::S57Record). Records
//! rejected by the reader are recorded as warnings and skipped; only an
//! unreadable first record or a missing `DSID` fails the buffer.
//!
//! [`RecordStore`] holds feature and vector records in flat arenas keyed by
//! their native identifiers. Update files edit the store; features are
//! materialised from it afterwards.

use crate::ddr::DataDescriptiveRecord;
use crate::error::{ChartError, Result};
use crate::reader::RecordReader;
use crate::record::{
    decode_record, DatasetIdentification, DatasetParameters, DatasetStructure, FeatureRecord,
    S57Record, SpatialRecord, TextLevels, VectorId,
};
use crate::warning::{Severity, WarningCode, WarningCollector};
use indexmap::IndexMap;

/// A decoded base cell or update file.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Data descriptive record, if present
    pub ddr: Option<DataDescriptiveRecord>,
    /// Dataset identification
    pub identification: DatasetIdentification,
    /// Dataset structure information
    pub structure: Option<DatasetStructure>,
    /// Dataset parameters
    pub parameters: Option<DatasetParameters>,
    /// Feature records in file order
    pub features: Vec<FeatureRecord>,
    /// Vector records in file order
    pub spatials: Vec<SpatialRecord>,
}

impl Cell {
    /// Decode one buffer.
    ///
    /// # Errors
    ///
    /// - [`ChartError::UnreadableFirstRecord`] if the first record fails structural validation
    /// - [`ChartError::MissingDatasetIdentity`] if no `DSID` record was decoded
    /// - [`ChartError::Strict`] when strict mode promotes a warning
    pub fn decode(bytes: &[u8], warnings: &mut WarningCollector) -> Result<Self> {
        let mut ddr = None;
        let mut identification = None;
        let mut structure = None;
        let mut parameters = None;
        let mut features = Vec::new();
        let mut spatials = Vec::new();
        let mut levels = TextLevels::default();
        let mut records = 0usize;

        for item in RecordReader::new(bytes) {
            let raw = match item {
                Ok(raw) => raw,
                Err(e) if e.index == 0 => {
                    return Err(ChartError::UnreadableFirstRecord(Box::new(e.error)));
                },
                Err(e) => {
                    warnings.push(Severity::Error, e.code, e.to_string())?;
                    continue;
                },
            };
            records += 1;

            if raw.is_ddr() {
                if ddr.is_none() {
                    ddr = Some(DataDescriptiveRecord::parse(&raw, warnings)?);
                }
                continue;
            }

            match decode_record(&raw, levels, warnings)? {
                Some(S57Record::Identification(id, dssi)) => {
                    if let Some(dssi) = dssi {
                        levels = TextLevels {
                            attf: dssi.attf_level,
                            natf: dssi.natf_level,
                        };
                    }
                    structure = dssi.or(structure);
                    identification.get_or_insert(id);
                },
                Some(S57Record::Parameters(p)) => {
                    parameters.get_or_insert(p);
                },
                Some(S57Record::Feature(f)) => features.push(f),
                Some(S57Record::Spatial(s)) => spatials.push(s),
                None => {},
            }
        }

        let identification = identification.ok_or_else(|| {
            ChartError::MissingDatasetIdentity(format!(
                "no DSID record among {records} readable records"
            ))
        })?;
        tracing::debug!(
            cell = identification.cell_name(),
            records,
            features = features.len(),
            spatials = spatials.len(),
            "decoded cell"
        );

        Ok(Cell {
            ddr,
            identification,
            structure,
            parameters,
            features,
            spatials,
        })
    }
}

/// Flat arenas of feature and vector records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    /// Feature records by `RCID`, in insertion order
    pub features: IndexMap<u32, FeatureRecord>,
    /// Vector records by id, in insertion order
    pub spatials: IndexMap<VectorId, SpatialRecord>,
}

impl RecordStore {
    /// Load the records of a base cell.
    ///
    /// A repeated identifier keeps the first record and is reported as
    /// `DUPLICATE_RECORD`.
    ///
    /// # Errors
    ///
    /// Only returns an error when the collector promotes a warning in strict mode.
    pub fn from_cell(cell: Cell, warnings: &mut WarningCollector) -> Result<Self> {
        let mut store = RecordStore::default();
        for spatial in cell.spatials {
            let id = spatial.id;
            if store.spatials.contains_key(&id) {
                warnings.push(
                    Severity::Warning,
                    WarningCode::DuplicateRecord,
                    format!("{id} appears more than once, keeping the first"),
                )?;
                continue;
            }
            store.spatials.insert(id, spatial);
        }
        for feature in cell.features {
            let rcid = feature.rcid;
            if store.features.contains_key(&rcid) {
                warnings.push_for(
                    rcid,
                    Severity::Warning,
                    WarningCode::DuplicateRecord,
                    format!("feature {rcid} appears more than once, keeping the first"),
                )?;
                continue;
            }
            store.features.insert(rcid, feature);
        }
        Ok(store)
    }

    /// Look up a vector record.
    #[must_use]
    pub fn spatial(&self, id: VectorId) -> Option<&SpatialRecord> {
        self.spatials.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Orientation, RecordInstruction, Usage};
    use crate::recovery::RecoveryMode;
    use crate::writer::{CellWriter, RecordFields};

    fn collector() -> WarningCollector {
        WarningCollector::new(RecoveryMode::Permissive, 100)
    }

    fn small_cell() -> CellWriter {
        let mut w = CellWriter::new();
        w.push_ddr();
        w.push(&RecordFields::new(1).dsid(1, "TEST0001", "1", "0", "20240101", 550).dssi(1, 1));
        w.push(&RecordFields::new(2).dspm(1, 2, 12, 12, 10_000, 10_000_000, 10));
        w.push(
            &RecordFields::new(3)
                .vrid(VectorId::isolated_node(1), 1, RecordInstruction::Insert)
                .sg2d(&[(420_000_000, -700_000_000)]),
        );
        w.push(
            &RecordFields::new(4)
                .frid(10, 1, 75, 1, RecordInstruction::Insert)
                .attf(&[(75, "1")])
                .fspt(&[(VectorId::isolated_node(1), Orientation::NotApplicable, Usage::NotApplicable)]),
        );
        w
    }

    #[test]
    fn test_decode_cell() {
        let bytes = small_cell().into_bytes();
        let mut w = collector();
        let cell = Cell::decode(&bytes, &mut w).unwrap();
        assert!(cell.ddr.is_some());
        assert_eq!(cell.identification.cell_name(), "TEST0001");
        assert_eq!(cell.parameters.unwrap().comf, Some(10_000_000));
        assert_eq!(cell.features.len(), 1);
        assert_eq!(cell.spatials.len(), 1);
        assert!(w.is_empty(), "{:?}", w.warnings());
    }

    #[test]
    fn test_unreadable_first_record() {
        let mut bytes = small_cell().into_bytes();
        bytes[0..5].copy_from_slice(b"ABCDE");
        let err = Cell::decode(&bytes, &mut collector()).unwrap_err();
        assert!(matches!(err, ChartError::UnreadableFirstRecord(_)), "{err}");
    }

    #[test]
    fn test_missing_dsid() {
        let mut w = CellWriter::new();
        w.push_ddr();
        w.push(&RecordFields::new(2).dspm(1, 2, 12, 12, 10_000, 10_000_000, 10));
        let err = Cell::decode(&w.into_bytes(), &mut collector()).unwrap_err();
        assert!(matches!(err, ChartError::MissingDatasetIdentity(_)));
    }

    #[test]
    fn test_corrupt_record_is_skipped() {
        let mut writer = small_cell();
        writer.push_raw(b"00099 X     00030   3404garbage\x1e");
        let bytes = writer.into_bytes();
        let mut w = collector();
        let cell = Cell::decode(&bytes, &mut w).unwrap();
        assert_eq!(cell.features.len(), 1);
        assert_eq!(w.count(WarningCode::RecordSkipped), 1);
    }

    #[test]
    fn test_duplicate_feature_keeps_first() {
        let mut writer = small_cell();
        writer.push(
            &RecordFields::new(5)
                .frid(10, 1, 17, 1, RecordInstruction::Insert)
                .fspt(&[(VectorId::isolated_node(1), Orientation::NotApplicable, Usage::NotApplicable)]),
        );
        let mut w = collector();
        let cell = Cell::decode(&writer.into_bytes(), &mut w).unwrap();
        let store = RecordStore::from_cell(cell, &mut w).unwrap();
        assert_eq!(store.features.len(), 1);
        assert_eq!(store.features[&10].objl, 75);
        assert_eq!(w.count(WarningCode::DuplicateRecord), 1);
    }
}
