//! Data Descriptive Record parsing.
//!
//! The first record of an ISO 8211 file describes every field the data
//! records may carry: field controls, a human-readable name, the subfield
//! labels (array descriptor) and the subfield formats (format controls).
//!
//! S-57 fixes these formats, so decoding always uses the static
//! [`schema`](crate::schema) table. The DDR is kept for inspection and to
//! report fields the table does not know.

use crate::error::Result;
use crate::reader::{RawRecord, FIELD_TERMINATOR, UNIT_TERMINATOR};
use crate::schema::schema_for;
use crate::warning::{Severity, WarningCode, WarningCollector};
use serde::{Deserialize, Serialize};

/// Description of one field in the DDR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Field tag
    pub tag: String,
    /// Field controls (data structure, data type, ...)
    pub field_controls: String,
    /// Field name
    pub name: String,
    /// Array descriptor, e.g. `*YCOO!XCOO`
    pub array_descriptor: String,
    /// Format controls, e.g. `(b24,b24)`
    pub format_controls: String,
}

/// A parsed data descriptive record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDescriptiveRecord {
    /// Field descriptions in directory order, the `0000` control field excluded
    pub fields: Vec<FieldDescription>,
}

impl DataDescriptiveRecord {
    /// Parse the DDR.
    ///
    /// Every described tag missing from the static schema is reported once as
    /// an `UNKNOWN_FIELD_TAG` info warning.
    ///
    /// # Errors
    ///
    /// Only returns an error when the collector promotes a warning in strict mode.
    pub fn parse(raw: &RawRecord<'_>, warnings: &mut WarningCollector) -> Result<Self> {
        let control_len = usize::from(raw.leader.field_control_length);
        let mut fields = Vec::with_capacity(raw.directory.len());

        for field in raw.fields() {
            if field.tag == "0000" {
                continue;
            }
            let bytes = field.bytes.strip_suffix(&[FIELD_TERMINATOR]).unwrap_or(field.bytes);
            let split = control_len.min(bytes.len());
            let (controls, rest) = bytes.split_at(split);
            let mut parts = rest.split(|&b| b == UNIT_TERMINATOR);
            let mut next = || {
                parts
                    .next()
                    .map(|p| String::from_utf8_lossy(p).into_owned())
                    .unwrap_or_default()
            };
            let description = FieldDescription {
                tag: field.tag.to_string(),
                field_controls: String::from_utf8_lossy(controls).into_owned(),
                name: next(),
                array_descriptor: next(),
                format_controls: next(),
            };

            match schema_for(field.tag) {
                Some(schema) => {
                    if schema.format_controls() != description.format_controls {
                        tracing::debug!(
                            tag = field.tag,
                            declared = %description.format_controls,
                            "DDR format differs from the S-57 schema, using the schema"
                        );
                    }
                },
                None => warnings.push(
                    Severity::Info,
                    WarningCode::UnknownFieldTag,
                    format!("DDR describes unknown field {}", field.tag),
                )?,
            }
            fields.push(description);
        }

        Ok(DataDescriptiveRecord { fields })
    }

    /// The description of a tag.
    #[must_use]
    pub fn field(&self, tag: &str) -> Option<&FieldDescription> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::RecordReader;
    use crate::recovery::RecoveryMode;
    use crate::writer::CellWriter;

    #[test]
    fn test_parse_written_ddr() {
        let mut writer = CellWriter::new();
        writer.push_ddr();
        let bytes = writer.into_bytes();
        let raw = RecordReader::new(&bytes).next().unwrap().unwrap();
        let mut warnings = WarningCollector::new(RecoveryMode::Permissive, 10);
        let ddr = DataDescriptiveRecord::parse(&raw, &mut warnings).unwrap();

        let frid = ddr.field("FRID").unwrap();
        assert_eq!(frid.name, "Feature record identifier field");
        assert_eq!(frid.array_descriptor, "RCNM!RCID!PRIM!GRUP!OBJL!RVER!RUIN");
        assert_eq!(frid.format_controls, "(b11,b14,b11,b11,b12,b12,b11)");
        assert_eq!(frid.field_controls, "1500;&   ");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unknown_described_field() {
        let mut writer = CellWriter::new();
        writer.push_record(&[("QQQQ", b"1600;&   Private\x1fA!B\x1f(A,A)".to_vec())]);
        let mut bytes = writer.into_bytes();
        bytes[6] = b'L';
        bytes[10..12].copy_from_slice(b"09");
        let raw = RecordReader::new(&bytes).next().unwrap().unwrap();
        let mut warnings = WarningCollector::new(RecoveryMode::Permissive, 10);
        let ddr = DataDescriptiveRecord::parse(&raw, &mut warnings).unwrap();
        assert_eq!(ddr.fields[0].name, "Private");
        assert_eq!(warnings.count(WarningCode::UnknownFieldTag), 1);
    }
}
