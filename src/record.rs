//! Typed S-57 records.
//!
//! A data record's coerced fields are turned into one of four record kinds:
//! dataset identification (`DSID` + `DSSI`), dataset parameters (`DSPM`),
//! feature records (`FRID` and friends) and vector (spatial) records (`VRID`
//! and friends). Attribute values stay as text here; their typed coercion
//! happens in the feature builder, which knows the catalog.
//!
//! Vector records reference each other and are referenced by features only
//! through [`VectorId`]s, never through live references. Relationships are
//! resolved by id lookup when features are built.

use crate::coerce::{coerce_field, CoercedField, CoercedValue};
use crate::encoding::LexicalLevel;
use crate::error::Result;
use crate::reader::RawRecord;
use crate::recovery::RecoveryMode;
use crate::schema::schema_for;
use crate::warning::{Severity, WarningCode, WarningCollector};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record name of the dataset identification record.
pub const RCNM_DSID: u8 = 10;
/// Record name of the dataset parameter record.
pub const RCNM_DSPM: u8 = 20;
/// Record name of feature records.
pub const RCNM_FEATURE: u8 = 100;
/// Record name of isolated nodes.
pub const RCNM_ISOLATED_NODE: u8 = 110;
/// Record name of connected nodes.
pub const RCNM_CONNECTED_NODE: u8 = 120;
/// Record name of edges.
pub const RCNM_EDGE: u8 = 130;
/// Record name of faces.
pub const RCNM_FACE: u8 = 140;

/// Identifier of a vector record: record name plus record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VectorId {
    /// Record name (110 isolated node, 120 connected node, 130 edge, 140 face)
    pub rcnm: u8,
    /// Record identification number
    pub rcid: u32,
}

impl VectorId {
    /// Create an id from its parts.
    #[must_use]
    pub fn new(rcnm: u8, rcid: u32) -> Self {
        VectorId { rcnm, rcid }
    }

    /// An isolated node id.
    #[must_use]
    pub fn isolated_node(rcid: u32) -> Self {
        Self::new(RCNM_ISOLATED_NODE, rcid)
    }

    /// A connected node id.
    #[must_use]
    pub fn connected_node(rcid: u32) -> Self {
        Self::new(RCNM_CONNECTED_NODE, rcid)
    }

    /// An edge id.
    #[must_use]
    pub fn edge(rcid: u32) -> Self {
        Self::new(RCNM_EDGE, rcid)
    }

    /// A face id.
    #[must_use]
    pub fn face(rcid: u32) -> Self {
        Self::new(RCNM_FACE, rcid)
    }

    /// Decode a 40-bit `NAME`: RCNM byte followed by a little-endian RCID.
    #[must_use]
    pub fn from_name(bytes: &[u8]) -> Option<Self> {
        let [rcnm, a, b, c, d] = <[u8; 5]>::try_from(bytes.get(..5)?).ok()?;
        Some(VectorId {
            rcnm,
            rcid: u32::from_le_bytes([a, b, c, d]),
        })
    }

    /// Encode as a 40-bit `NAME`.
    #[must_use]
    pub fn to_name(self) -> [u8; 5] {
        let [a, b, c, d] = self.rcid.to_le_bytes();
        [self.rcnm, a, b, c, d]
    }

    /// Whether the id names an isolated or connected node.
    #[must_use]
    pub fn is_node(self) -> bool {
        matches!(self.rcnm, RCNM_ISOLATED_NODE | RCNM_CONNECTED_NODE)
    }

    /// Whether the id names an edge.
    #[must_use]
    pub fn is_edge(self) -> bool {
        self.rcnm == RCNM_EDGE
    }
}

impl fmt::Display for VectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.rcnm {
            RCNM_ISOLATED_NODE => "isolated node",
            RCNM_CONNECTED_NODE => "connected node",
            RCNM_EDGE => "edge",
            RCNM_FACE => "face",
            _ => "vector",
        };
        write!(f, "{kind} {}", self.rcid)
    }
}

/// Geometric primitive of a feature (`PRIM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    /// 1: point
    Point,
    /// 2: line
    Line,
    /// 3: area
    Area,
    /// 255: no geometry
    None,
}

impl Primitive {
    /// Decode a `PRIM` code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Primitive::Point),
            2 => Some(Primitive::Line),
            3 => Some(Primitive::Area),
            255 => Some(Primitive::None),
            _ => None,
        }
    }
}

/// Record update instruction (`RUIN`, and the `*UI` subfields of control fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordInstruction {
    /// 1: insert
    Insert,
    /// 2: delete
    Delete,
    /// 3: modify
    Modify,
}

impl RecordInstruction {
    /// Decode an instruction code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(RecordInstruction::Insert),
            2 => Some(RecordInstruction::Delete),
            3 => Some(RecordInstruction::Modify),
            _ => None,
        }
    }

    /// The instruction code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            RecordInstruction::Insert => 1,
            RecordInstruction::Delete => 2,
            RecordInstruction::Modify => 3,
        }
    }
}

/// Traversal direction of a pointer (`ORNT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// 1: forward
    Forward,
    /// 2: reverse
    Reverse,
    /// 255 (or anything else): not applicable
    NotApplicable,
}

impl Orientation {
    /// Decode an `ORNT` code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Orientation::Forward,
            2 => Orientation::Reverse,
            _ => Orientation::NotApplicable,
        }
    }

    /// The `ORNT` code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Orientation::Forward => 1,
            Orientation::Reverse => 2,
            Orientation::NotApplicable => 255,
        }
    }
}

/// Role of an edge in an area boundary (`USAG`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Usage {
    /// 1: exterior boundary
    Exterior,
    /// 2: interior boundary
    Interior,
    /// 3: exterior boundary truncated by the data limit
    ExteriorTruncated,
    /// 255 (or anything else): not applicable
    NotApplicable,
}

impl Usage {
    /// Decode a `USAG` code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Usage::Exterior,
            2 => Usage::Interior,
            3 => Usage::ExteriorTruncated,
            _ => Usage::NotApplicable,
        }
    }

    /// The `USAG` code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Usage::Exterior => 1,
            Usage::Interior => 2,
            Usage::ExteriorTruncated => 3,
            Usage::NotApplicable => 255,
        }
    }
}

/// Topology indicator of a vector pointer (`TOPI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// 1: beginning node
    BeginNode,
    /// 2: end node
    EndNode,
    /// 3: left face
    LeftFace,
    /// 4: right face
    RightFace,
    /// 5: containing face
    ContainingFace,
    /// 255 (or anything else): not applicable
    NotApplicable,
}

impl Topology {
    /// Decode a `TOPI` code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Topology::BeginNode,
            2 => Topology::EndNode,
            3 => Topology::LeftFace,
            4 => Topology::RightFace,
            5 => Topology::ContainingFace,
            _ => Topology::NotApplicable,
        }
    }

    /// The `TOPI` code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Topology::BeginNode => 1,
            Topology::EndNode => 2,
            Topology::LeftFace => 3,
            Topology::RightFace => 4,
            Topology::ContainingFace => 5,
            Topology::NotApplicable => 255,
        }
    }
}

/// A feature-to-spatial pointer (`FSPT` group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePointer {
    /// Referenced vector record
    pub target: VectorId,
    /// Traversal direction
    pub orientation: Orientation,
    /// Boundary role
    pub usage: Usage,
    /// Masking indicator
    pub mask: u8,
}

/// A vector-to-vector pointer (`VRPT` group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorPointer {
    /// Referenced vector record
    pub target: VectorId,
    /// Traversal direction
    pub orientation: Orientation,
    /// Boundary role
    pub usage: Usage,
    /// Topology indicator
    pub topology: Topology,
}

/// A feature-to-feature relationship (`FFPT` group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRelation {
    /// Long name of the related feature (`LNAM`, 8 bytes)
    pub lnam: Vec<u8>,
    /// Relationship indicator (`RIND`)
    pub relationship: u8,
}

/// List edit carried by a pointer or coordinate control field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateControl {
    /// Insert, delete or modify
    pub instruction: RecordInstruction,
    /// 1-based position of the first affected entry
    pub index: usize,
    /// Number of affected entries
    pub count: usize,
}

/// Feature object identifier (`FOID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    /// Producing agency
    pub agency: u16,
    /// Feature identification number
    pub fidn: u32,
    /// Feature identification subdivision
    pub fids: u16,
}

/// A decoded feature record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Record identification number
    pub rcid: u32,
    /// Raw geometric primitive code
    pub prim: u8,
    /// Group
    pub group: u8,
    /// Object class code
    pub objl: u16,
    /// Record version
    pub rver: u16,
    /// Update instruction
    pub ruin: RecordInstruction,
    /// Object identifier
    pub object_id: Option<ObjectId>,
    /// Attribute codes and raw text values
    pub attributes: Vec<(u16, String)>,
    /// National attribute codes and raw text values
    pub national_attributes: Vec<(u16, String)>,
    /// Spatial pointers in order
    pub spatial: Vec<FeaturePointer>,
    /// Spatial pointer edit (updates only)
    pub spatial_control: Option<UpdateControl>,
    /// Related features
    pub related: Vec<FeatureRelation>,
    /// Related feature edit (updates only)
    pub related_control: Option<UpdateControl>,
}

impl FeatureRecord {
    /// The geometric primitive, if the code is valid.
    #[must_use]
    pub fn primitive(&self) -> Option<Primitive> {
        Primitive::from_code(self.prim)
    }
}

/// A decoded vector (spatial) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialRecord {
    /// Vector record id
    pub id: VectorId,
    /// Record version
    pub rver: u16,
    /// Update instruction
    pub ruin: RecordInstruction,
    /// Attribute codes and raw text values
    pub attributes: Vec<(u16, String)>,
    /// Pointers to other vector records (edge begin/end nodes)
    pub pointers: Vec<VectorPointer>,
    /// Pointer edit (updates only)
    pub pointer_control: Option<UpdateControl>,
    /// Raw `(y, x)` coordinates
    pub coords: Vec<(i32, i32)>,
    /// Raw `(y, x, depth)` soundings
    pub soundings: Vec<(i32, i32, i32)>,
    /// Coordinate edit (updates only)
    pub coord_control: Option<UpdateControl>,
}

impl SpatialRecord {
    /// The begin and end nodes of an edge, in that order.
    #[must_use]
    pub fn end_nodes(&self) -> (Option<VectorId>, Option<VectorId>) {
        let find = |topology: Topology| {
            self.pointers
                .iter()
                .find(|p| p.topology == topology)
                .map(|p| p.target)
        };
        let begin = find(Topology::BeginNode).or_else(|| self.pointers.first().map(|p| p.target));
        let end = find(Topology::EndNode).or_else(|| {
            self.pointers
                .get(1)
                .or_else(|| self.pointers.first())
                .map(|p| p.target)
        });
        (begin, end)
    }
}

/// Dataset identification (`DSID`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetIdentification {
    /// Record identification number
    pub rcid: u32,
    /// Exchange purpose (1 new, 2 revision)
    pub exchange_purpose: u8,
    /// Intended usage (navigational purpose, 1 to 6)
    pub intended_usage: u8,
    /// Data set name, e.g. `US5MA22M.000`
    pub dataset_name: String,
    /// Edition number
    pub edition: String,
    /// Update number
    pub update: String,
    /// Update application date
    pub update_date: String,
    /// Issue date
    pub issue_date: String,
    /// Edition number of S-57
    pub s57_edition: String,
    /// Producing agency
    pub agency: u16,
    /// Comment
    pub comment: String,
}

impl DatasetIdentification {
    /// Cell name: the data set name without its extension.
    #[must_use]
    pub fn cell_name(&self) -> &str {
        self.dataset_name
            .rsplit_once('.')
            .map_or(self.dataset_name.as_str(), |(stem, _)| stem)
    }

    /// Numeric update number; blank means 0.
    #[must_use]
    pub fn update_number(&self) -> Option<u32> {
        let trimmed = self.update.trim();
        if trimmed.is_empty() {
            Some(0)
        } else {
            trimmed.parse().ok()
        }
    }
}

/// Dataset structure information (`DSSI`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetStructure {
    /// Data structure code
    pub structure: u8,
    /// Lexical level of `ATTF` values
    pub attf_level: LexicalLevel,
    /// Lexical level of `NATF` values
    pub natf_level: LexicalLevel,
}

/// Dataset parameters (`DSPM`). Absent or zero values are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetParameters {
    /// Horizontal geodetic datum
    pub hdat: Option<u8>,
    /// Vertical datum
    pub vdat: Option<u8>,
    /// Sounding datum
    pub sdat: Option<u8>,
    /// Compilation scale denominator
    pub cscl: Option<u32>,
    /// Coordinate multiplication factor
    pub comf: Option<u32>,
    /// 3-D (sounding) multiplication factor
    pub somf: Option<u32>,
}

/// One decoded data record.
#[derive(Debug, Clone, PartialEq)]
pub enum S57Record {
    /// `DSID` record, with its `DSSI` field when present
    Identification(DatasetIdentification, Option<DatasetStructure>),
    /// `DSPM` record
    Parameters(DatasetParameters),
    /// Feature record
    Feature(FeatureRecord),
    /// Vector record
    Spatial(SpatialRecord),
}

/// Lexical levels in force while decoding a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextLevels {
    /// Level of `ATTF` values
    pub attf: LexicalLevel,
    /// Level of `NATF` values
    pub natf: LexicalLevel,
}

const IDENTIFIERS: [&str; 4] = ["FRID", "VRID", "DSID", "DSPM"];

/// Decode one data record.
///
/// Returns `Ok(None)` (with a warning) for a record without any identifier
/// field. Unknown field tags are reported and ignored.
///
/// # Errors
///
/// Only returns an error when the collector promotes a warning in strict mode.
pub fn decode_record(
    raw: &RawRecord<'_>,
    levels: TextLevels,
    warnings: &mut WarningCollector,
) -> Result<Option<S57Record>> {
    let Some(ident_tag) = IDENTIFIERS.iter().find(|tag| raw.field(tag).is_some()) else {
        warnings.push(
            Severity::Error,
            WarningCode::RecordSkipped,
            format!("record {} at offset {} has no identifier field", raw.index, raw.offset),
        )?;
        return Ok(None);
    };

    // RCID is read up front so every warning, the identifier's own included,
    // can name the record. Problems in the identifier are reported once, below.
    let mut record_id = None;
    if let (Some(field), Some(schema)) = (raw.field(ident_tag), schema_for(ident_tag)) {
        let mut scratch = WarningCollector::new(RecoveryMode::Permissive, usize::MAX);
        let ident = coerce_field(&field, schema, LexicalLevel::Ascii, &mut scratch, None)?;
        record_id = ident.int("RCID").and_then(|v| u32::try_from(v).ok());
    }

    let mut fields: Vec<CoercedField> = Vec::with_capacity(raw.directory.len());
    for field in raw.fields() {
        if field.tag == "0001" {
            continue;
        }
        let Some(schema) = schema_for(field.tag) else {
            let message = format!("field {} is not part of S-57 and was ignored", field.tag);
            match record_id {
                Some(id) => warnings.push_for(id, Severity::Info, WarningCode::UnknownFieldTag, message)?,
                None => warnings.push(Severity::Info, WarningCode::UnknownFieldTag, message)?,
            }
            continue;
        };
        let level = match field.tag {
            "ATTF" => levels.attf,
            "NATF" => levels.natf,
            _ => LexicalLevel::Ascii,
        };
        fields.push(coerce_field(&field, schema, level, warnings, record_id)?);
    }

    let record = match *ident_tag {
        "FRID" => S57Record::Feature(feature_record(&fields)),
        "VRID" => S57Record::Spatial(spatial_record(&fields)),
        "DSID" => {
            let structure = find(&fields, "DSSI").map(dataset_structure);
            S57Record::Identification(dataset_identification(&fields), structure)
        },
        _ => S57Record::Parameters(find(&fields, "DSPM").map(dataset_parameters).unwrap_or_default()),
    };
    Ok(Some(record))
}

fn find<'f>(fields: &'f [CoercedField], tag: &str) -> Option<&'f CoercedField> {
    fields.iter().find(|f| f.tag == tag)
}

fn all<'f>(fields: &'f [CoercedField], tag: &'f str) -> impl Iterator<Item = &'f CoercedField> + 'f {
    fields.iter().filter(move |f| f.tag == tag)
}

fn int_or<T: TryFrom<i64> + Default>(field: Option<&CoercedField>, label: &str) -> T {
    field
        .and_then(|f| f.int(label))
        .and_then(|v| T::try_from(v).ok())
        .unwrap_or_default()
}

fn row_int<T: TryFrom<i64> + Default>(row: &[CoercedValue], idx: usize) -> T {
    row.get(idx)
        .and_then(CoercedValue::as_i64)
        .and_then(|v| T::try_from(v).ok())
        .unwrap_or_default()
}

fn text_of(field: Option<&CoercedField>, label: &str) -> String {
    field
        .and_then(|f| f.value(label))
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn control(field: Option<&CoercedField>, ui: &str, ix: &str, n: &str) -> Option<UpdateControl> {
    let field = field?;
    let instruction = RecordInstruction::from_code(u8::try_from(field.int(ui)?).ok()?)?;
    Some(UpdateControl {
        instruction,
        index: usize::try_from(field.int(ix)?).ok()?,
        count: usize::try_from(field.int(n)?).ok()?,
    })
}

fn attributes(fields: &[CoercedField], tag: &str) -> Vec<(u16, String)> {
    all(fields, tag)
        .flat_map(|f| f.rows().iter())
        .map(|row| {
            let code = row_int::<u16>(row, 0);
            let value = row.get(1).map(ToString::to_string).unwrap_or_default();
            (code, value)
        })
        .collect()
}

fn feature_record(fields: &[CoercedField]) -> FeatureRecord {
    let frid = find(fields, "FRID");
    let foid = find(fields, "FOID");
    let spatial = all(fields, "FSPT")
        .flat_map(|f| f.rows().iter())
        .filter_map(|row| {
            let target = VectorId::from_name(row.first()?.as_bytes()?)?;
            Some(FeaturePointer {
                target,
                orientation: Orientation::from_code(row_int(row, 1)),
                usage: Usage::from_code(row_int(row, 2)),
                mask: row_int(row, 3),
            })
        })
        .collect();
    let related = all(fields, "FFPT")
        .flat_map(|f| f.rows().iter())
        .filter_map(|row| {
            Some(FeatureRelation {
                lnam: row.first()?.as_bytes()?.to_vec(),
                relationship: row_int(row, 1),
            })
        })
        .collect();

    FeatureRecord {
        rcid: int_or(frid, "RCID"),
        prim: int_or(frid, "PRIM"),
        group: int_or(frid, "GRUP"),
        objl: int_or(frid, "OBJL"),
        rver: int_or(frid, "RVER"),
        ruin: ruin(frid),
        object_id: foid.map(|f| ObjectId {
            agency: int_or(Some(f), "AGEN"),
            fidn: int_or(Some(f), "FIDN"),
            fids: int_or(Some(f), "FIDS"),
        }),
        attributes: attributes(fields, "ATTF"),
        national_attributes: attributes(fields, "NATF"),
        spatial,
        spatial_control: control(find(fields, "FSPC"), "FSUI", "FSIX", "NSPT"),
        related,
        related_control: control(find(fields, "FFPC"), "FFUI", "FFIX", "NFPT"),
    }
}

fn spatial_record(fields: &[CoercedField]) -> SpatialRecord {
    let vrid = find(fields, "VRID");
    let pointers = all(fields, "VRPT")
        .flat_map(|f| f.rows().iter())
        .filter_map(|row| {
            let target = VectorId::from_name(row.first()?.as_bytes()?)?;
            Some(VectorPointer {
                target,
                orientation: Orientation::from_code(row_int(row, 1)),
                usage: Usage::from_code(row_int(row, 2)),
                topology: Topology::from_code(row_int(row, 3)),
            })
        })
        .collect();
    let coords = all(fields, "SG2D")
        .flat_map(|f| f.rows().iter())
        .map(|row| (row_int(row, 0), row_int(row, 1)))
        .collect();
    let soundings = all(fields, "SG3D")
        .flat_map(|f| f.rows().iter())
        .map(|row| (row_int(row, 0), row_int(row, 1), row_int(row, 2)))
        .collect();

    SpatialRecord {
        id: VectorId::new(int_or(vrid, "RCNM"), int_or(vrid, "RCID")),
        rver: int_or(vrid, "RVER"),
        ruin: ruin(vrid),
        attributes: attributes(fields, "ATTV"),
        pointers,
        pointer_control: control(find(fields, "VRPC"), "VPUI", "VPIX", "NVPT"),
        coords,
        soundings,
        coord_control: control(find(fields, "SGCC"), "CCUI", "CCIX", "CCNC"),
    }
}

fn ruin(field: Option<&CoercedField>) -> RecordInstruction {
    RecordInstruction::from_code(int_or(field, "RUIN")).unwrap_or(RecordInstruction::Insert)
}

fn dataset_identification(fields: &[CoercedField]) -> DatasetIdentification {
    let dsid = find(fields, "DSID");
    DatasetIdentification {
        rcid: int_or(dsid, "RCID"),
        exchange_purpose: int_or(dsid, "EXPP"),
        intended_usage: int_or(dsid, "INTU"),
        dataset_name: text_of(dsid, "DSNM").trim().to_string(),
        edition: text_of(dsid, "EDTN").trim().to_string(),
        update: text_of(dsid, "UPDN").trim().to_string(),
        update_date: text_of(dsid, "UADT").trim().to_string(),
        issue_date: text_of(dsid, "ISDT").trim().to_string(),
        s57_edition: text_of(dsid, "STED").trim().to_string(),
        agency: int_or(dsid, "AGEN"),
        comment: text_of(dsid, "COMT"),
    }
}

fn dataset_structure(dssi: &CoercedField) -> DatasetStructure {
    DatasetStructure {
        structure: int_or(Some(dssi), "DSTR"),
        attf_level: dssi.int("AALL").map_or(LexicalLevel::Latin1, LexicalLevel::from_code),
        natf_level: dssi.int("NALL").map_or(LexicalLevel::Latin1, LexicalLevel::from_code),
    }
}

fn dataset_parameters(dspm: &CoercedField) -> DatasetParameters {
    fn nonzero<T: TryFrom<i64>>(field: &CoercedField, label: &str) -> Option<T> {
        field
            .int(label)
            .filter(|&v| v != 0)
            .and_then(|v| T::try_from(v).ok())
    }
    DatasetParameters {
        hdat: nonzero(dspm, "HDAT"),
        vdat: nonzero(dspm, "VDAT"),
        sdat: nonzero(dspm, "SDAT"),
        cscl: nonzero(dspm, "CSCL"),
        comf: nonzero(dspm, "COMF"),
        somf: nonzero(dspm, "SOMF"),
    }
}
