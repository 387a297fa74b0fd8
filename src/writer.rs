//! Writing ISO 8211 / S-57 cells.
//!
//! This module provides [`CellWriter`], which encodes logical records with
//! correct leaders and directories, and [`RecordFields`], a builder for the
//! binary S-57 fields a record carries. Together they produce synthetic
//! cells and update files for tests, benchmarks and tooling.
//!
//! # Examples
//!
//! ```
//! use s57chart::record::{Orientation, RecordInstruction, Usage, VectorId};
//! use s57chart::writer::{CellWriter, RecordFields};
//!
//! let mut writer = CellWriter::new();
//! writer.push_ddr();
//! writer.push(
//!     &RecordFields::new(1)
//!         .dsid(1, "US5MA22M", "1", "0", "20240101", 550)
//!         .dssi(1, 2),
//! );
//! writer.push(
//!     &RecordFields::new(2)
//!         .frid(1, 1, 75, 1, RecordInstruction::Insert)
//!         .attf(&[(75, "1")])
//!         .fspt(&[(VectorId::isolated_node(1), Orientation::NotApplicable, Usage::NotApplicable)]),
//! );
//! let bytes = writer.finish()?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), s57chart::error::ChartError>(())
//! ```

use crate::encoding::LexicalLevel;
use crate::error::{ChartError, Result};
use crate::leader::{EntryMap, Leader, LEADER_LEN};
use crate::reader::{FIELD_TERMINATOR, UNIT_TERMINATOR};
use crate::record::{
    Orientation, RecordInstruction, Topology, Usage, VectorId, RCNM_DSID, RCNM_DSPM, RCNM_FEATURE,
};
use crate::schema::ALL_FIELDS;
use encoding_rs::WINDOWS_1252;

/// Encoder for a sequence of ISO 8211 logical records.
///
/// Records are appended one at a time. A record that cannot be encoded
/// (its length does not fit the five-digit leader) is left out and the
/// error is reported by [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct CellWriter {
    bytes: Vec<u8>,
    records_written: usize,
    error: Option<ChartError>,
}

impl CellWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the data descriptive record describing every known field.
    pub fn push_ddr(&mut self) -> &mut Self {
        let mut control = b"0000;&   ".to_vec();
        // Field tree: every field hangs off the record identifier.
        for schema in ALL_FIELDS.iter().skip(1) {
            control.extend_from_slice(b"0001");
            control.extend_from_slice(schema.tag.as_bytes());
        }

        let mut fields: Vec<(&str, Vec<u8>)> = vec![("0000", control)];
        for schema in &ALL_FIELDS {
            let mut desc = schema.field_controls().as_bytes().to_vec();
            desc.extend_from_slice(schema.name.as_bytes());
            desc.push(UNIT_TERMINATOR);
            desc.extend_from_slice(schema.array_descriptor().as_bytes());
            desc.push(UNIT_TERMINATOR);
            desc.extend_from_slice(schema.format_controls().as_bytes());
            fields.push((schema.tag, desc));
        }
        self.encode(true, &fields);
        self
    }

    /// Append a data record. Each field gets its field terminator appended.
    pub fn push_record(&mut self, fields: &[(&str, Vec<u8>)]) -> &mut Self {
        self.encode(false, fields);
        self
    }

    /// Append a data record built with [`RecordFields`].
    pub fn push(&mut self, fields: &RecordFields) -> &mut Self {
        let borrowed: Vec<(&str, Vec<u8>)> = fields
            .fields
            .iter()
            .map(|(tag, bytes)| (*tag, bytes.clone()))
            .collect();
        self.encode(false, &borrowed);
        self
    }

    /// Append bytes verbatim, e.g. to inject corruption.
    pub fn push_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Number of records encoded so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Current encoded length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing was written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The encoded bytes, ignoring records that could not be encoded.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns the first encoding error, if any record was left out.
    pub fn finish(self) -> Result<Vec<u8>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.bytes),
        }
    }

    fn encode(&mut self, ddr: bool, fields: &[(&str, Vec<u8>)]) {
        match encode_record(ddr, fields) {
            Ok(bytes) => {
                self.bytes.extend_from_slice(&bytes);
                self.records_written += 1;
            },
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(e);
                }
            },
        }
    }
}

/// Encode one logical record with the narrowest entry map that fits.
fn encode_record(ddr: bool, fields: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut data_area = Vec::new();
    let mut entries = Vec::with_capacity(fields.len());
    for (tag, bytes) in fields {
        entries.push((*tag, bytes.len() + 1, data_area.len()));
        data_area.extend_from_slice(bytes);
        data_area.push(FIELD_TERMINATOR);
    }

    let max_len = entries.iter().map(|e| e.1).max().unwrap_or(0);
    let max_pos = entries.iter().map(|e| e.2).max().unwrap_or(0);
    let tag_size = entries.iter().map(|e| e.0.len()).max().unwrap_or(4).max(1);
    let entry_map = EntryMap {
        length_size: digits(max_len),
        position_size: digits(max_pos),
        tag_size: u8::try_from(tag_size)
            .ok()
            .filter(|&n| n <= 9)
            .ok_or_else(|| ChartError::InvalidField(format!("Tag of {tag_size} characters")))?,
    };

    let mut directory = Vec::with_capacity(entries.len() * entry_map.entry_len() + 1);
    for (tag, len, pos) in &entries {
        directory.extend_from_slice(tag.as_bytes());
        directory.extend_from_slice(
            format!("{len:0width$}", width = usize::from(entry_map.length_size)).as_bytes(),
        );
        directory.extend_from_slice(
            format!("{pos:0width$}", width = usize::from(entry_map.position_size)).as_bytes(),
        );
    }
    directory.push(FIELD_TERMINATOR);

    let base_address = LEADER_LEN + directory.len();
    let record_length = base_address + data_area.len();
    let too_long = || ChartError::InvalidLeader(format!("Record of {record_length} bytes is too long"));
    let record_length_u32 = u32::try_from(record_length).map_err(|_| too_long())?;
    let base_u32 = u32::try_from(base_address).map_err(|_| too_long())?;
    let leader = if ddr {
        Leader::for_ddr(record_length_u32, base_u32, entry_map)
    } else {
        Leader::for_data_record(record_length_u32, base_u32, entry_map)
    };

    let mut out = leader.as_bytes()?;
    out.extend_from_slice(&directory);
    out.extend_from_slice(&data_area);
    Ok(out)
}

fn digits(n: usize) -> u8 {
    let mut d = 1;
    let mut rest = n / 10;
    while rest > 0 {
        d += 1;
        rest /= 10;
    }
    d
}

/// Builder for the fields of one S-57 data record.
///
/// Fields are kept in the order they are added. Content is encoded without
/// the field terminator; [`CellWriter`] appends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    fields: Vec<(&'static str, Vec<u8>)>,
}

impl RecordFields {
    /// Start a record with its ISO 8211 record identifier (`0001`).
    #[must_use]
    pub fn new(record_id: u16) -> Self {
        RecordFields {
            fields: vec![("0001", record_id.to_le_bytes().to_vec())],
        }
    }

    /// Start a record without a record identifier field.
    #[must_use]
    pub fn empty() -> Self {
        RecordFields { fields: Vec::new() }
    }

    /// Append an arbitrary field.
    #[must_use]
    pub fn raw(mut self, tag: &'static str, bytes: Vec<u8>) -> Self {
        self.fields.push((tag, bytes));
        self
    }

    /// Fields added so far.
    #[must_use]
    pub fn fields(&self) -> &[(&'static str, Vec<u8>)] {
        &self.fields
    }

    /// Data set identification field.
    #[must_use]
    pub fn dsid(
        self,
        rcid: u32,
        cell_name: &str,
        edition: &str,
        update: &str,
        issue_date: &str,
        agency: u16,
    ) -> Self {
        let mut b = vec![RCNM_DSID];
        b.extend_from_slice(&rcid.to_le_bytes());
        b.push(1); // EXPP: new data set
        b.push(5); // INTU: harbour
        push_text(&mut b, &format!("{cell_name}.000"));
        push_text(&mut b, edition);
        push_text(&mut b, update);
        b.extend_from_slice(&fixed_text(issue_date, 8));
        b.extend_from_slice(&fixed_text(issue_date, 8));
        b.extend_from_slice(b"03.1");
        b.push(1); // PRSP: ENC
        push_text(&mut b, "");
        push_text(&mut b, "2.0");
        b.push(1); // PROF: EN
        b.extend_from_slice(&agency.to_le_bytes());
        push_text(&mut b, "");
        self.raw("DSID", b)
    }

    /// Data set structure information field with the ATTF and NATF lexical levels.
    #[must_use]
    pub fn dssi(self, aall: u8, nall: u8) -> Self {
        let mut b = vec![2, aall, nall];
        for _ in 0..8 {
            b.extend_from_slice(&0u32.to_le_bytes());
        }
        self.raw("DSSI", b)
    }

    /// Data set parameter field.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn dspm(self, rcid: u32, hdat: u8, vdat: u8, sdat: u8, cscl: u32, comf: u32, somf: u32) -> Self {
        let mut b = vec![RCNM_DSPM];
        b.extend_from_slice(&rcid.to_le_bytes());
        b.extend_from_slice(&[hdat, vdat, sdat]);
        b.extend_from_slice(&cscl.to_le_bytes());
        b.extend_from_slice(&[1, 1, 1, 2]); // DUNI, HUNI, PUNI, COUN
        b.extend_from_slice(&comf.to_le_bytes());
        b.extend_from_slice(&somf.to_le_bytes());
        push_text(&mut b, "");
        self.raw("DSPM", b)
    }

    /// Feature record identifier field.
    #[must_use]
    pub fn frid(self, rcid: u32, prim: u8, objl: u16, rver: u16, ruin: RecordInstruction) -> Self {
        let mut b = vec![RCNM_FEATURE];
        b.extend_from_slice(&rcid.to_le_bytes());
        b.push(prim);
        b.push(2); // GRUP
        b.extend_from_slice(&objl.to_le_bytes());
        b.extend_from_slice(&rver.to_le_bytes());
        b.push(ruin.code());
        self.raw("FRID", b)
    }

    /// Feature object identifier field.
    #[must_use]
    pub fn foid(self, agency: u16, fidn: u32, fids: u16) -> Self {
        let mut b = agency.to_le_bytes().to_vec();
        b.extend_from_slice(&fidn.to_le_bytes());
        b.extend_from_slice(&fids.to_le_bytes());
        self.raw("FOID", b)
    }

    /// Feature attribute field, encoded at lexical level 1.
    #[must_use]
    pub fn attf(self, attributes: &[(u16, &str)]) -> Self {
        let b = encode_attributes(attributes, LexicalLevel::Latin1);
        self.raw("ATTF", b)
    }

    /// National attribute field, encoded at the given lexical level.
    #[must_use]
    pub fn natf(self, attributes: &[(u16, &str)], level: LexicalLevel) -> Self {
        let b = encode_attributes(attributes, level);
        self.raw("NATF", b)
    }

    /// Feature to spatial record pointer field.
    #[must_use]
    pub fn fspt(self, pointers: &[(VectorId, Orientation, Usage)]) -> Self {
        let mut b = Vec::with_capacity(pointers.len() * 8);
        for (id, ornt, usag) in pointers {
            b.extend_from_slice(&id.to_name());
            b.push(ornt.code());
            b.push(usag.code());
            b.push(255); // MASK
        }
        self.raw("FSPT", b)
    }

    /// Feature to spatial record pointer control field (updates).
    #[must_use]
    pub fn fspc(self, instruction: RecordInstruction, index: u16, count: u16) -> Self {
        self.raw("FSPC", control(instruction, index, count))
    }

    /// Vector record identifier field.
    #[must_use]
    pub fn vrid(self, id: VectorId, rver: u16, ruin: RecordInstruction) -> Self {
        let mut b = id.to_name().to_vec();
        b.extend_from_slice(&rver.to_le_bytes());
        b.push(ruin.code());
        self.raw("VRID", b)
    }

    /// Vector attribute field.
    #[must_use]
    pub fn attv(self, attributes: &[(u16, &str)]) -> Self {
        let b = encode_attributes(attributes, LexicalLevel::Ascii);
        self.raw("ATTV", b)
    }

    /// Vector record pointer field.
    #[must_use]
    pub fn vrpt(self, pointers: &[(VectorId, Orientation, Topology)]) -> Self {
        let mut b = Vec::with_capacity(pointers.len() * 9);
        for (id, ornt, topi) in pointers {
            b.extend_from_slice(&id.to_name());
            b.push(ornt.code());
            b.push(Usage::NotApplicable.code());
            b.push(topi.code());
            b.push(255); // MASK
        }
        self.raw("VRPT", b)
    }

    /// Vector record pointer control field (updates).
    #[must_use]
    pub fn vrpc(self, instruction: RecordInstruction, index: u16, count: u16) -> Self {
        self.raw("VRPC", control(instruction, index, count))
    }

    /// Coordinate control field (updates).
    #[must_use]
    pub fn sgcc(self, instruction: RecordInstruction, index: u16, count: u16) -> Self {
        self.raw("SGCC", control(instruction, index, count))
    }

    /// 2-D coordinate field from raw `(y, x)` pairs.
    #[must_use]
    pub fn sg2d(self, coords: &[(i32, i32)]) -> Self {
        let mut b = Vec::with_capacity(coords.len() * 8);
        for (y, x) in coords {
            b.extend_from_slice(&y.to_le_bytes());
            b.extend_from_slice(&x.to_le_bytes());
        }
        self.raw("SG2D", b)
    }

    /// 3-D coordinate field from raw `(y, x, depth)` triples.
    #[must_use]
    pub fn sg3d(self, soundings: &[(i32, i32, i32)]) -> Self {
        let mut b = Vec::with_capacity(soundings.len() * 12);
        for (y, x, z) in soundings {
            b.extend_from_slice(&y.to_le_bytes());
            b.extend_from_slice(&x.to_le_bytes());
            b.extend_from_slice(&z.to_le_bytes());
        }
        self.raw("SG3D", b)
    }
}

fn control(instruction: RecordInstruction, index: u16, count: u16) -> Vec<u8> {
    let mut b = vec![instruction.code()];
    b.extend_from_slice(&index.to_le_bytes());
    b.extend_from_slice(&count.to_le_bytes());
    b
}

fn push_text(buf: &mut Vec<u8>, text: &str) {
    buf.extend_from_slice(text.as_bytes());
    buf.push(UNIT_TERMINATOR);
}

fn fixed_text(text: &str, width: usize) -> Vec<u8> {
    let mut b: Vec<u8> = text.bytes().take(width).collect();
    b.resize(width, b' ');
    b
}

fn encode_attributes(attributes: &[(u16, &str)], level: LexicalLevel) -> Vec<u8> {
    let mut b = Vec::new();
    for (code, value) in attributes {
        b.extend_from_slice(&code.to_le_bytes());
        match level {
            LexicalLevel::Ucs2 => {
                for unit in value.encode_utf16() {
                    b.extend_from_slice(&unit.to_le_bytes());
                }
                b.extend_from_slice(&[UNIT_TERMINATOR, 0x00]);
            },
            LexicalLevel::Latin1 => {
                let (encoded, _, _) = WINDOWS_1252.encode(value);
                b.extend_from_slice(&encoded);
                b.push(UNIT_TERMINATOR);
            },
            LexicalLevel::Ascii => push_text(&mut b, value),
        }
    }
    b
}
