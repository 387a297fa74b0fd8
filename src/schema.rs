//! Static S-57 field schema for the binary implementation.
//!
//! Field formats are fixed by the S-57 product specification, so they are
//! taken from this table rather than from the DDR in each file. A DDR that
//! disagrees with the table does not change how a field is decoded.

/// Format of one subfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubfieldFormat {
    /// `b1w`: unsigned little-endian integer of `w` bytes
    Unsigned(u8),
    /// `b2w`: signed little-endian integer of `w` bytes
    Signed(u8),
    /// `B(n)`: bit field of `n` bits
    Bits(u16),
    /// `A`: variable-length text ending in a unit terminator
    Text,
    /// `A(n)`: fixed-length text
    FixedText(u16),
    /// `R`: variable-length real number ending in a unit terminator
    Real,
    /// `R(n)`: fixed-length real number
    FixedReal(u16),
}

impl SubfieldFormat {
    /// Fixed width in bytes, or `None` for unit-terminated formats.
    #[must_use]
    pub fn width(self) -> Option<usize> {
        match self {
            SubfieldFormat::Unsigned(w) | SubfieldFormat::Signed(w) => Some(usize::from(w)),
            SubfieldFormat::Bits(n) => Some(usize::from(n) / 8),
            SubfieldFormat::FixedText(n) | SubfieldFormat::FixedReal(n) => Some(usize::from(n)),
            SubfieldFormat::Text | SubfieldFormat::Real => None,
        }
    }

    /// Whether the subfield carries character data.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(
            self,
            SubfieldFormat::Text
                | SubfieldFormat::FixedText(_)
                | SubfieldFormat::Real
                | SubfieldFormat::FixedReal(_)
        )
    }

    /// The ISO 8211 format control for this subfield, e.g. `b14`.
    #[must_use]
    pub fn control(self) -> String {
        match self {
            SubfieldFormat::Unsigned(w) => format!("b1{w}"),
            SubfieldFormat::Signed(w) => format!("b2{w}"),
            SubfieldFormat::Bits(n) => format!("B({n})"),
            SubfieldFormat::Text => "A".to_string(),
            SubfieldFormat::FixedText(n) => format!("A({n})"),
            SubfieldFormat::Real => "R".to_string(),
            SubfieldFormat::FixedReal(n) => format!("R({n})"),
        }
    }
}

/// One subfield: label and format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubfieldDef {
    /// Subfield label (e.g. `RCID`)
    pub label: &'static str,
    /// Subfield format
    pub format: SubfieldFormat,
}

/// Layout of one field.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldSchema {
    /// Field tag
    pub tag: &'static str,
    /// Field name as written in the DDR
    pub name: &'static str,
    /// Subfields in order
    pub subfields: &'static [SubfieldDef],
    /// Whether the subfield group repeats until the field terminator
    pub repeating: bool,
}

impl FieldSchema {
    /// Index of a subfield within one group.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.subfields.iter().position(|s| s.label == label)
    }

    /// Whether every subfield has a fixed width.
    #[must_use]
    pub fn is_fixed_width(&self) -> bool {
        self.subfields.iter().all(|s| s.format.width().is_some())
    }

    /// ISO 8211 array descriptor, e.g. `*YCOO!XCOO`.
    #[must_use]
    pub fn array_descriptor(&self) -> String {
        let labels: Vec<&str> = self.subfields.iter().map(|s| s.label).collect();
        let joined = labels.join("!");
        if self.repeating {
            format!("*{joined}")
        } else {
            joined
        }
    }

    /// ISO 8211 format controls, e.g. `(b11,b14,A)`.
    #[must_use]
    pub fn format_controls(&self) -> String {
        let mut out = String::from("(");
        for (i, sub) in self.subfields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&sub.format.control());
        }
        out.push(')');
        out
    }

    /// ISO 8211 field controls for the DDR field description.
    #[must_use]
    pub fn field_controls(&self) -> &'static str {
        let all_binary = self.subfields.iter().all(|s| !s.format.is_text());
        match (self.repeating, all_binary, self.subfields.len()) {
            (_, true, 1) => "0500;&   ",
            (true, true, _) => "2500;&   ",
            (true, false, _) => "2600;&   ",
            (false, true, _) => "1500;&   ",
            (false, false, _) => "1600;&   ",
        }
    }
}

macro_rules! sub {
    ($label:literal, $fmt:expr) => {
        SubfieldDef {
            label: $label,
            format: $fmt,
        }
    };
}

use SubfieldFormat::{Bits, FixedReal, FixedText, Signed, Text, Unsigned};

/// ISO 8211 record identifier.
pub static RECORD_ID: FieldSchema = FieldSchema {
    tag: "0001",
    name: "ISO/IEC 8211 Record Identifier",
    subfields: &[sub!("RID", Unsigned(2))],
    repeating: false,
};

/// Data set identification.
pub static DSID: FieldSchema = FieldSchema {
    tag: "DSID",
    name: "Data set identification field",
    subfields: &[
        sub!("RCNM", Unsigned(1)),
        sub!("RCID", Unsigned(4)),
        sub!("EXPP", Unsigned(1)),
        sub!("INTU", Unsigned(1)),
        sub!("DSNM", Text),
        sub!("EDTN", Text),
        sub!("UPDN", Text),
        sub!("UADT", FixedText(8)),
        sub!("ISDT", FixedText(8)),
        sub!("STED", FixedReal(4)),
        sub!("PRSP", Unsigned(1)),
        sub!("PSDN", Text),
        sub!("PRED", Text),
        sub!("PROF", Unsigned(1)),
        sub!("AGEN", Unsigned(2)),
        sub!("COMT", Text),
    ],
    repeating: false,
};

/// Data set structure information.
pub static DSSI: FieldSchema = FieldSchema {
    tag: "DSSI",
    name: "Data set structure information field",
    subfields: &[
        sub!("DSTR", Unsigned(1)),
        sub!("AALL", Unsigned(1)),
        sub!("NALL", Unsigned(1)),
        sub!("NOMR", Unsigned(4)),
        sub!("NOCR", Unsigned(4)),
        sub!("NOGR", Unsigned(4)),
        sub!("NOLR", Unsigned(4)),
        sub!("NOIN", Unsigned(4)),
        sub!("NOCN", Unsigned(4)),
        sub!("NOED", Unsigned(4)),
        sub!("NOFA", Unsigned(4)),
    ],
    repeating: false,
};

/// Data set parameter.
pub static DSPM: FieldSchema = FieldSchema {
    tag: "DSPM",
    name: "Data set parameter field",
    subfields: &[
        sub!("RCNM", Unsigned(1)),
        sub!("RCID", Unsigned(4)),
        sub!("HDAT", Unsigned(1)),
        sub!("VDAT", Unsigned(1)),
        sub!("SDAT", Unsigned(1)),
        sub!("CSCL", Unsigned(4)),
        sub!("DUNI", Unsigned(1)),
        sub!("HUNI", Unsigned(1)),
        sub!("PUNI", Unsigned(1)),
        sub!("COUN", Unsigned(1)),
        sub!("COMF", Unsigned(4)),
        sub!("SOMF", Unsigned(4)),
        sub!("COMT", Text),
    ],
    repeating: false,
};

/// Feature record identifier.
pub static FRID: FieldSchema = FieldSchema {
    tag: "FRID",
    name: "Feature record identifier field",
    subfields: &[
        sub!("RCNM", Unsigned(1)),
        sub!("RCID", Unsigned(4)),
        sub!("PRIM", Unsigned(1)),
        sub!("GRUP", Unsigned(1)),
        sub!("OBJL", Unsigned(2)),
        sub!("RVER", Unsigned(2)),
        sub!("RUIN", Unsigned(1)),
    ],
    repeating: false,
};

/// Feature object identifier.
pub static FOID: FieldSchema = FieldSchema {
    tag: "FOID",
    name: "Feature object identifier field",
    subfields: &[
        sub!("AGEN", Unsigned(2)),
        sub!("FIDN", Unsigned(4)),
        sub!("FIDS", Unsigned(2)),
    ],
    repeating: false,
};

/// Feature record attribute.
pub static ATTF: FieldSchema = FieldSchema {
    tag: "ATTF",
    name: "Feature record attribute field",
    subfields: &[sub!("ATTL", Unsigned(2)), sub!("ATVL", Text)],
    repeating: true,
};

/// Feature record national attribute.
pub static NATF: FieldSchema = FieldSchema {
    tag: "NATF",
    name: "Feature record national attribute field",
    subfields: &[sub!("ATTL", Unsigned(2)), sub!("ATVL", Text)],
    repeating: true,
};

/// Feature record to feature object pointer control.
pub static FFPC: FieldSchema = FieldSchema {
    tag: "FFPC",
    name: "Feature record to feature object pointer control field",
    subfields: &[
        sub!("FFUI", Unsigned(1)),
        sub!("FFIX", Unsigned(2)),
        sub!("NFPT", Unsigned(2)),
    ],
    repeating: false,
};

/// Feature record to feature object pointer.
pub static FFPT: FieldSchema = FieldSchema {
    tag: "FFPT",
    name: "Feature record to feature object pointer field",
    subfields: &[
        sub!("LNAM", Bits(64)),
        sub!("RIND", Unsigned(1)),
        sub!("COMT", Text),
    ],
    repeating: true,
};

/// Feature record to spatial record pointer control.
pub static FSPC: FieldSchema = FieldSchema {
    tag: "FSPC",
    name: "Feature record to spatial record pointer control field",
    subfields: &[
        sub!("FSUI", Unsigned(1)),
        sub!("FSIX", Unsigned(2)),
        sub!("NSPT", Unsigned(2)),
    ],
    repeating: false,
};

/// Feature record to spatial record pointer.
pub static FSPT: FieldSchema = FieldSchema {
    tag: "FSPT",
    name: "Feature record to spatial record pointer field",
    subfields: &[
        sub!("NAME", Bits(40)),
        sub!("ORNT", Unsigned(1)),
        sub!("USAG", Unsigned(1)),
        sub!("MASK", Unsigned(1)),
    ],
    repeating: true,
};

/// Vector record identifier.
pub static VRID: FieldSchema = FieldSchema {
    tag: "VRID",
    name: "Vector record identifier field",
    subfields: &[
        sub!("RCNM", Unsigned(1)),
        sub!("RCID", Unsigned(4)),
        sub!("RVER", Unsigned(2)),
        sub!("RUIN", Unsigned(1)),
    ],
    repeating: false,
};

/// Vector record attribute.
pub static ATTV: FieldSchema = FieldSchema {
    tag: "ATTV",
    name: "Vector record attribute field",
    subfields: &[sub!("ATTL", Unsigned(2)), sub!("ATVL", Text)],
    repeating: true,
};

/// Vector record pointer control.
pub static VRPC: FieldSchema = FieldSchema {
    tag: "VRPC",
    name: "Vector record pointer control field",
    subfields: &[
        sub!("VPUI", Unsigned(1)),
        sub!("VPIX", Unsigned(2)),
        sub!("NVPT", Unsigned(2)),
    ],
    repeating: false,
};

/// Vector record pointer.
pub static VRPT: FieldSchema = FieldSchema {
    tag: "VRPT",
    name: "Vector record pointer field",
    subfields: &[
        sub!("NAME", Bits(40)),
        sub!("ORNT", Unsigned(1)),
        sub!("USAG", Unsigned(1)),
        sub!("TOPI", Unsigned(1)),
        sub!("MASK", Unsigned(1)),
    ],
    repeating: true,
};

/// Coordinate control.
pub static SGCC: FieldSchema = FieldSchema {
    tag: "SGCC",
    name: "Coordinate control field",
    subfields: &[
        sub!("CCUI", Unsigned(1)),
        sub!("CCIX", Unsigned(2)),
        sub!("CCNC", Unsigned(2)),
    ],
    repeating: false,
};

/// 2-D coordinate.
pub static SG2D: FieldSchema = FieldSchema {
    tag: "SG2D",
    name: "2-D coordinate field",
    subfields: &[sub!("YCOO", Signed(4)), sub!("XCOO", Signed(4))],
    repeating: true,
};

/// 3-D coordinate (sounding array).
pub static SG3D: FieldSchema = FieldSchema {
    tag: "SG3D",
    name: "3-D coordinate (sounding array) field",
    subfields: &[
        sub!("YCOO", Signed(4)),
        sub!("XCOO", Signed(4)),
        sub!("VE3D", Signed(4)),
    ],
    repeating: true,
};

/// Every field this crate understands, in DDR order.
pub static ALL_FIELDS: [&FieldSchema; 19] = [
    &RECORD_ID, &DSID, &DSSI, &DSPM, &FRID, &FOID, &ATTF, &NATF, &FFPC, &FFPT, &FSPC, &FSPT,
    &VRID, &ATTV, &VRPC, &VRPT, &SGCC, &SG2D, &SG3D,
];

/// Look up the schema of a field tag.
#[must_use]
pub fn schema_for(tag: &str) -> Option<&'static FieldSchema> {
    ALL_FIELDS.iter().copied().find(|s| s.tag == tag)
}
