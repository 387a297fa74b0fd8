//! Permissive and strict handling of damaged or incomplete cells.

mod common;

use common::{corrupt_record, CellBuilder, CELL, DEG, DEPARE, LIGHTS, LNDARE, OBSTRN};
use s57chart::record::{Orientation, RecordInstruction, Usage, VectorId};
use s57chart::{parse_chart, ChartError, ParseOptions, Severity, Usability, WarningCode};

fn with_corrupt_middle_record() -> Vec<u8> {
    let mut b = CellBuilder::base(CELL);
    b.isolated_node(1, 42 * DEG, -70 * DEG);
    b.raw(&corrupt_record(|r| {
        r.frid(5, 1, LIGHTS, 1, RecordInstruction::Insert)
            .fspt(&[(VectorId::isolated_node(1), Orientation::NotApplicable, Usage::NotApplicable)])
    }));
    b.point_feature(6, OBSTRN, 1, &[]);
    b.build()
}

#[test]
fn test_corrupt_record_is_skipped_permissive() {
    let chart = parse_chart(&with_corrupt_middle_record(), &[], &ParseOptions::default()).unwrap();
    assert_eq!(chart.features().len(), 1);
    assert_eq!(chart.features()[0].record_id, 6);
    assert_eq!(chart.warnings().count(WarningCode::RecordSkipped), 1);
    assert_eq!(chart.error_count(), 1);
    assert_eq!(chart.usability(), Usability::UsableWithCaveats);
}

#[test]
fn test_corrupt_record_fails_strict() {
    let err = parse_chart(&with_corrupt_middle_record(), &[], &ParseOptions::strict()).unwrap_err();
    match err {
        ChartError::Strict(w) => assert_eq!(w.code, WarningCode::RecordSkipped),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_open_ring_is_closed_once() {
    let mut b = CellBuilder::base(CELL);
    b.connected_node(1, 42 * DEG, -70 * DEG);
    b.connected_node(2, 421_000_000, -699_000_000);
    b.edge(1, 1, 2, &[(42 * DEG, -699_000_000)]);
    b.area_feature(8, LNDARE, &[1], &[]);
    let chart = parse_chart(&b.build(), &[], &ParseOptions::default()).unwrap();

    let land = chart.feature(8).unwrap();
    assert_eq!(land.coordinates.len(), 4);
    assert_eq!(land.coordinates.first(), land.coordinates.last());
    let closed: Vec<_> = chart
        .warnings()
        .iter()
        .filter(|w| w.code == WarningCode::PolygonClosedAuto)
        .collect();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].record_id, Some(8));
    assert_eq!(closed[0].severity, Severity::Info);

    // Info warnings never fail a strict parse.
    let mut b = CellBuilder::base(CELL);
    b.connected_node(1, 42 * DEG, -70 * DEG);
    b.connected_node(2, 421_000_000, -699_000_000);
    b.edge(1, 1, 2, &[(42 * DEG, -699_000_000)]);
    b.area_feature(8, LNDARE, &[1], &[]);
    assert!(parse_chart(&b.build(), &[], &ParseOptions::strict()).is_ok());
}

#[test]
fn test_dangling_pointer_drops_feature() {
    let mut b = CellBuilder::base(CELL);
    b.isolated_node(1, 42 * DEG, -70 * DEG);
    b.point_feature(1, OBSTRN, 1, &[]);
    b.point_feature(2, OBSTRN, 404, &[]);
    let chart = parse_chart(&b.build(), &[], &ParseOptions::default()).unwrap();
    assert_eq!(chart.features().len(), 1);
    assert_eq!(chart.warnings().count(WarningCode::DanglingPointer), 1);
    assert_eq!(chart.warnings().count(WarningCode::NoGeometry), 1);
}

#[test]
fn test_missing_required_attributes_keep_feature() {
    let mut b = CellBuilder::base(CELL);
    b.connected_node(1, 42 * DEG, -70 * DEG);
    b.connected_node(2, 421_000_000, -699_000_000);
    b.edge(1, 1, 2, &[(42 * DEG, -699_000_000)]);
    b.edge(2, 2, 1, &[(421_000_000, -70 * DEG)]);
    b.area_feature(3, DEPARE, &[1, 2], &[]);
    let chart = parse_chart(&b.build(), &[], &ParseOptions::default()).unwrap();
    assert!(chart.feature(3).is_some());
    assert_eq!(chart.warnings().count(WarningCode::MissingRequiredAttr), 2);
}

#[test]
fn test_missing_dspm_defaults_scale_factors() {
    let mut b = CellBuilder::empty();
    b.record(|r| r.dsid(1, CELL, "1", "0", "20240101", 550).dssi(1, 1));
    b.isolated_node(1, 42 * DEG, -70 * DEG);
    b.point_feature(1, OBSTRN, 1, &[]);
    let chart = parse_chart(&b.build(), &[], &ParseOptions::default()).unwrap();
    assert_eq!(chart.warnings().count(WarningCode::ScaleDefaulted), 1);
    assert_eq!(chart.features()[0].coordinates[0].lat, 42.0);
}

#[test]
fn test_warning_cap() {
    let mut b = CellBuilder::base(CELL);
    b.isolated_node(1, 42 * DEG, -70 * DEG);
    for rcid in 1..=50 {
        b.point_feature(rcid, OBSTRN, 1, &[(9_999, "x")]);
    }
    let options = ParseOptions::default().with_warning_cap(10);
    let chart = parse_chart(&b.build(), &[], &options).unwrap();
    assert_eq!(chart.features().len(), 50);
    let report = chart.warnings();
    assert_eq!(report.len(), 10);
    assert!(report.is_capped());
    assert!(report.len() + report.dropped >= 50);
}

#[test]
fn test_no_features_is_unusable() {
    let mut b = CellBuilder::base(CELL);
    b.isolated_node(1, 42 * DEG, -70 * DEG);
    let chart = parse_chart(&b.build(), &[], &ParseOptions::default()).unwrap();
    assert!(chart.features().is_empty());
    assert_eq!(chart.bounds(), None);
    assert_eq!(chart.usability(), Usability::Unusable);
}
