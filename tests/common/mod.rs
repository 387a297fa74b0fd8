//! Common test helpers: synthetic S-57 cells built with the crate's writer.

#![allow(dead_code)]

use s57chart::record::{Orientation, RecordInstruction, Topology, Usage, VectorId};
use s57chart::{CellWriter, RecordFields};

/// Cell name used by every fixture.
pub const CELL: &str = "US5TEST1";

/// One degree at the default coordinate multiplication factor.
pub const DEG: i32 = 10_000_000;

/// Object class codes used by the fixtures.
pub const COALNE: u16 = 30;
pub const DEPARE: u16 = 42;
pub const LNDARE: u16 = 71;
pub const LIGHTS: u16 = 75;
pub const OBSTRN: u16 = 86;
pub const SOUNDG: u16 = 129;

/// Attribute codes used by the fixtures.
pub const COLOUR: u16 = 75;
pub const DRVAL1: u16 = 87;
pub const DRVAL2: u16 = 88;
pub const OBJNAM: u16 = 116;

/// Incremental builder for one cell buffer.
///
/// Record identifiers (`0001`) are assigned in push order.
pub struct CellBuilder {
    writer: CellWriter,
    next: u16,
}

impl CellBuilder {
    /// A base cell (`.000`) with DSID, DSSI and DSPM.
    pub fn base(name: &str) -> Self {
        CellBuilder::base_with_update(name, "0")
    }

    /// A base cell whose DSID carries the given update number.
    pub fn base_with_update(name: &str, updn: &str) -> Self {
        let mut b = CellBuilder::empty();
        b.record(|r| r.dsid(1, name, "3", updn, "20240101", 550).dssi(1, 1));
        b.record(|r| r.dspm(1, 2, 12, 12, 20_000, 10_000_000, 10));
        b
    }

    /// An update cell with the given update number.
    pub fn update(name: &str, number: u32) -> Self {
        CellBuilder::update_with(name, &number.to_string())
    }

    /// An update cell whose DSID carries `updn` verbatim.
    pub fn update_with(name: &str, updn: &str) -> Self {
        let mut b = CellBuilder::empty();
        b.record(|r| r.dsid(1, name, "3", updn, "20240301", 550).dssi(1, 1));
        b
    }

    /// A buffer with only the DDR.
    pub fn empty() -> Self {
        let mut writer = CellWriter::new();
        writer.push_ddr();
        CellBuilder { writer, next: 1 }
    }

    /// Append one data record.
    pub fn record(&mut self, fields: impl FnOnce(RecordFields) -> RecordFields) -> &mut Self {
        let record = fields(RecordFields::new(self.next));
        self.next += 1;
        self.writer.push(&record);
        self
    }

    /// Append raw bytes, e.g. a corrupted record.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.writer.push_raw(bytes);
        self
    }

    /// An isolated node at `(lat, lon)` in raw units.
    pub fn isolated_node(&mut self, rcid: u32, lat: i32, lon: i32) -> &mut Self {
        self.record(|r| {
            r.vrid(VectorId::isolated_node(rcid), 1, RecordInstruction::Insert)
                .sg2d(&[(lat, lon)])
        })
    }

    /// A connected node at `(lat, lon)` in raw units.
    pub fn connected_node(&mut self, rcid: u32, lat: i32, lon: i32) -> &mut Self {
        self.record(|r| {
            r.vrid(VectorId::connected_node(rcid), 1, RecordInstruction::Insert)
                .sg2d(&[(lat, lon)])
        })
    }

    /// An edge between two connected nodes with interior vertices.
    pub fn edge(&mut self, rcid: u32, begin: u32, end: u32, interior: &[(i32, i32)]) -> &mut Self {
        self.record(|r| {
            r.vrid(VectorId::edge(rcid), 1, RecordInstruction::Insert)
                .vrpt(&[
                    (VectorId::connected_node(begin), Orientation::NotApplicable, Topology::BeginNode),
                    (VectorId::connected_node(end), Orientation::NotApplicable, Topology::EndNode),
                ])
                .sg2d(interior)
        })
    }

    /// A point feature on an isolated node.
    pub fn point_feature(&mut self, rcid: u32, objl: u16, node: u32, attributes: &[(u16, &str)]) -> &mut Self {
        self.record(|r| {
            r.frid(rcid, 1, objl, 1, RecordInstruction::Insert)
                .foid(550, rcid, 1)
                .attf(attributes)
                .fspt(&[(VectorId::isolated_node(node), Orientation::NotApplicable, Usage::NotApplicable)])
        })
    }

    /// An area feature bounded by forward exterior edges.
    pub fn area_feature(&mut self, rcid: u32, objl: u16, edges: &[u32], attributes: &[(u16, &str)]) -> &mut Self {
        let pointers: Vec<_> = edges
            .iter()
            .map(|&e| (VectorId::edge(e), Orientation::Forward, Usage::Exterior))
            .collect();
        self.record(|r| {
            r.frid(rcid, 3, objl, 1, RecordInstruction::Insert)
                .foid(550, rcid, 1)
                .attf(attributes)
                .fspt(&pointers)
        })
    }

    /// The finished buffer.
    pub fn build(self) -> Vec<u8> {
        self.writer.into_bytes()
    }
}

/// A small harbour cell around 42N 70W.
///
/// | record | class | geometry |
/// |---|---|---|
/// | 42 | LIGHTS | point at 42.0, -70.0 |
/// | 50 | SOUNDG | two soundings, 5.5 m and 12.0 m |
/// | 60 | COALNE | line along the south and east sides |
/// | 100 | DEPARE | closed square 42.0..42.1, -70.1..-70.0 |
pub fn harbour_cell() -> Vec<u8> {
    harbour_cell_at("0")
}

/// [`harbour_cell`] with the base DSID carrying update number `updn`.
pub fn harbour_cell_at(updn: &str) -> Vec<u8> {
    let mut b = CellBuilder::base_with_update(CELL, updn);
    b.isolated_node(1, 42 * DEG, -70 * DEG);
    b.record(|r| {
        r.vrid(VectorId::isolated_node(2), 1, RecordInstruction::Insert)
            .sg3d(&[(420_500_000, -700_500_000, 55), (420_600_000, -700_600_000, 120)])
    });
    b.connected_node(1, 42 * DEG, -701_000_000);
    b.connected_node(2, 421_000_000, -70 * DEG);
    // 1 -> 2 along the south then east sides, 2 -> 1 along the north then west sides.
    b.edge(1, 1, 2, &[(42 * DEG, -70 * DEG)]);
    b.edge(2, 2, 1, &[(421_000_000, -701_000_000)]);

    b.point_feature(42, LIGHTS, 1, &[(COLOUR, "1"), (OBJNAM, "Harbor Light")]);
    b.point_feature(50, SOUNDG, 2, &[]);
    b.record(|r| {
        r.frid(60, 2, COALNE, 1, RecordInstruction::Insert)
            .fspt(&[(VectorId::edge(1), Orientation::Forward, Usage::NotApplicable)])
    });
    b.area_feature(100, DEPARE, &[1, 2], &[(DRVAL1, "5.0"), (DRVAL2, "15.0")]);
    b.build()
}

/// Update `.001`: modify the light's colour.
pub fn modify_light_update() -> Vec<u8> {
    let mut b = CellBuilder::update(CELL, 1);
    b.record(|r| r.frid(42, 1, LIGHTS, 2, RecordInstruction::Modify).attf(&[(COLOUR, "3")]));
    b.build()
}

/// Update `.002`: delete the light.
pub fn delete_light_update() -> Vec<u8> {
    let mut b = CellBuilder::update(CELL, 2);
    b.record(|r| r.frid(42, 1, LIGHTS, 3, RecordInstruction::Delete));
    b.build()
}

/// Update `.003`: insert a new light on the same node.
pub fn insert_light_update() -> Vec<u8> {
    let mut b = CellBuilder::update(CELL, 3);
    b.record(|r| {
        r.frid(77, 1, LIGHTS, 1, RecordInstruction::Insert)
            .attf(&[(COLOUR, "4"), (OBJNAM, "New Light")])
            .fspt(&[(VectorId::isolated_node(1), Orientation::NotApplicable, Usage::NotApplicable)])
    });
    b.build()
}

/// A grid of `count` point features spread over a one-degree square.
pub fn grid_cell(count: u32) -> Vec<u8> {
    let mut b = CellBuilder::base(CELL);
    let side = (f64::from(count).sqrt().ceil() as u32).max(1);
    let step = DEG / i32::try_from(side).unwrap_or(i32::MAX);
    for i in 0..count {
        let row = i32::try_from(i / side).unwrap_or(0);
        let col = i32::try_from(i % side).unwrap_or(0);
        b.isolated_node(i + 1, 42 * DEG + row * step, -70 * DEG + col * step);
    }
    for i in 0..count {
        b.point_feature(i + 1, if i % 3 == 0 { LIGHTS } else { OBSTRN }, i + 1, &[(COLOUR, "1")]);
    }
    b.build()
}

/// One encoded record whose leader declares a base address inside the
/// leader itself. The declared record length stays correct, so a reader can
/// skip it and resume at the next record.
pub fn corrupt_record(fields: impl FnOnce(RecordFields) -> RecordFields) -> Vec<u8> {
    let mut writer = CellWriter::new();
    writer.push(&fields(RecordFields::new(999)));
    let mut bytes = writer.into_bytes();
    bytes[12..17].copy_from_slice(b"00010");
    bytes
}
