//! End-to-end tests: synthetic cells through the full parse pipeline.

mod common;

use common::{harbour_cell, CELL};
use s57chart::coerce::CoercedValue;
use s57chart::metadata::{HorizontalDatum, UsageBand};
use s57chart::{
    csv, geojson, parse_chart, parse_charts_parallel, Bounds, ChartError, ChartInput, Coordinate, FeatureQuery,
    GeometryType, IndexKind, ObjectClass, ParseOptions, Usability,
};

fn parse(bytes: &[u8]) -> s57chart::ParsedChart {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    parse_chart(bytes, &[], &ParseOptions::default()).expect("harbour cell parses")
}

#[test]
fn test_harbour_metadata() {
    let chart = parse(&harbour_cell());
    let m = chart.metadata();
    assert_eq!(m.cell_id, CELL);
    assert_eq!(m.edition, 3);
    assert_eq!(m.update_number, 0);
    assert_eq!(m.producer, 550);
    assert_eq!(m.issue_date, "20240101");
    assert_eq!(m.usage_band, UsageBand::Harbour);
    assert_eq!(m.compilation_scale, Some(20_000));
    assert_eq!(m.horizontal_datum, HorizontalDatum::Wgs84);
    assert!((m.comf - 10_000_000.0).abs() < f64::EPSILON);
    assert!((m.somf - 10.0).abs() < f64::EPSILON);
}

#[test]
fn test_harbour_features() {
    let chart = parse(&harbour_cell());
    assert!(chart.warnings().is_empty(), "{:?}", chart.warnings());
    assert_eq!(chart.usability(), Usability::Usable);
    assert_eq!(chart.features().len(), 4);

    let light = chart.feature(42).expect("light");
    assert_eq!(light.feature_type, ObjectClass::Lights);
    assert_eq!(light.geometry_type, GeometryType::Point);
    assert_eq!(light.coordinates, vec![Coordinate::new(42.0, -70.0)]);
    assert_eq!(light.name(), Some("Harbor Light"));
    assert_eq!(
        light.attribute("COLOUR"),
        Some(&CoercedValue::List(vec!["1".to_string()]))
    );
    assert_eq!(light.object_id.map(|id| id.fidn), Some(42));

    let soundings = chart.feature(50).expect("soundings");
    assert!(soundings.is_sounding());
    assert_eq!(soundings.soundings, vec![5.5, 12.0]);

    let coast = chart.feature(60).expect("coastline");
    assert_eq!(coast.geometry_type, GeometryType::Line);
    assert_eq!(coast.coordinates.len(), 3);
}

#[test]
fn test_depth_area_is_descaled() {
    let chart = parse(&harbour_cell());
    let found = chart.find_features(&FeatureQuery::new().types(["DEPARE"]));
    assert_eq!(found.len(), 1);
    let area = found[0];
    assert_eq!(area.record_id, 100);
    assert_eq!(area.geometry_type, GeometryType::Area);
    assert_eq!(area.coordinates.len(), 5);
    assert_eq!(area.coordinates.first(), area.coordinates.last());
    assert_eq!(area.attribute("DRVAL1").and_then(CoercedValue::as_f64), Some(0.5));
    assert_eq!(area.attribute("DRVAL2").and_then(CoercedValue::as_f64), Some(1.5));
    assert_eq!(area.bounds, Bounds::new(42.0, -70.1, 42.1, -70.0));
}

#[test]
fn test_chart_bounds_and_queries() {
    let chart = parse(&harbour_cell());
    assert_eq!(chart.bounds(), Some(Bounds::new(42.0, -70.1, 42.1, -70.0)));

    // 0.5 NM around the light reaches the light, the coastline and the depth area.
    let near: Vec<u32> = chart.query_point(42.0, -70.0, 0.5).iter().map(|f| f.record_id).collect();
    assert_eq!(near, vec![42, 60, 100]);

    let window = Bounds::new(42.04, -70.07, 42.07, -70.04);
    let inside: Vec<u32> = chart.query_bounds(&window).iter().map(|f| f.record_id).collect();
    // The coastline's bounds span the whole square.
    assert_eq!(inside, vec![50, 60, 100]);

    let lights = chart.query_by_type(&[ObjectClass::Lights], None);
    assert_eq!(lights.len(), 1);
    assert!(chart.query_by_type(&[ObjectClass::Lights], Some(&window)).is_empty());

    assert!(chart.find_features(&FeatureQuery::new().types(["NOPE"])).is_empty());
    assert_eq!(chart.find_features(&FeatureQuery::new().text("HARBOR")).len(), 1);
}

#[test]
fn test_summary_counts_classes() {
    let chart = parse(&harbour_cell());
    let summary = chart.summary();
    assert_eq!(summary.len(), 4);
    for class in ["COALNE", "DEPARE", "LIGHTS", "SOUNDG"] {
        assert_eq!(summary.get(class), Some(&1), "{class}");
    }
}

#[test]
fn test_parse_is_idempotent() {
    let bytes = harbour_cell();
    let options = ParseOptions::default();
    let first = parse_chart(&bytes, &[], &options).unwrap();
    let second = parse_chart(&bytes, &[], &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_index_choice_does_not_change_results() {
    let bytes = harbour_cell();
    let linear = parse_chart(&bytes, &[], &ParseOptions::default()).unwrap();
    let rtree = parse_chart(&bytes, &[], &ParseOptions::default().with_index_threshold(0)).unwrap();
    assert_eq!(linear.index_kind(), IndexKind::Linear);
    assert_eq!(rtree.index_kind(), IndexKind::RTree);
    assert_eq!(linear.features(), rtree.features());

    let window = Bounds::new(42.0, -70.05, 42.05, -70.0);
    let ids = |c: &s57chart::ParsedChart| c.query_bounds(&window).iter().map(|f| f.record_id).collect::<Vec<_>>();
    assert_eq!(ids(&linear), ids(&rtree));
    let near = |c: &s57chart::ParsedChart| {
        c.query_point(42.05, -70.05, 2.0).iter().map(|f| f.record_id).collect::<Vec<_>>()
    };
    assert_eq!(near(&linear), near(&rtree));
}

#[test]
fn test_grid_switches_to_rtree() {
    let chart = parse(&common::grid_cell(400));
    assert_eq!(chart.features().len(), 400);
    assert_eq!(chart.index_kind(), IndexKind::RTree);
    let lights = chart.find_features(&FeatureQuery::new().types(["LIGHTS"]));
    assert_eq!(lights.len(), 134);
}

#[test]
fn test_empty_and_garbage_input() {
    let options = ParseOptions::default();
    assert!(matches!(
        parse_chart(&[], &[], &options),
        Err(ChartError::MissingDatasetIdentity(_))
    ));
    assert!(matches!(
        parse_chart(b"this is not an ISO 8211 file at all", &[], &options),
        Err(ChartError::UnreadableFirstRecord(_))
    ));
}

#[test]
fn test_geojson_export() {
    let chart = parse(&harbour_cell());
    let value = geojson::to_geojson(&chart);
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"].as_array().map(Vec::len), Some(4));
    assert_eq!(value["bbox"], serde_json::json!([-70.1, 42.0, -70.0, 42.1]));

    let text = geojson::to_geojson_string(&chart).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, value);
    let area = parsed["features"]
        .as_array()
        .and_then(|fs| fs.iter().find(|f| f["id"] == 100))
        .unwrap();
    assert_eq!(area["geometry"]["type"], "Polygon");
    assert_eq!(area["properties"]["DRVAL2"], 1.5);
}

#[test]
fn test_csv_export() {
    let chart = parse(&harbour_cell());
    let text = csv::features_to_csv(chart.features()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("record_id,type,geometry"));
    assert!(lines.iter().any(|l| l.starts_with("100,DEPARE,area,5,")));
}

#[test]
fn test_csv_export_to_file() {
    let chart = parse(&harbour_cell());
    let file = tempfile::NamedTempFile::new().unwrap();
    csv::write_features(chart.features(), file.as_file()).unwrap();
    let text = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(text, csv::features_to_csv(chart.features()).unwrap());
}

#[test]
fn test_parallel_matches_sequential() {
    let a = harbour_cell();
    let b = common::grid_cell(50);
    let inputs = [ChartInput::new(&a), ChartInput::new(&b)];
    let options = ParseOptions::default();
    let results = parse_charts_parallel(&inputs, &options);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap(), &parse_chart(&a, &[], &options).unwrap());
    assert_eq!(results[1].as_ref().unwrap().features().len(), 50);
}
