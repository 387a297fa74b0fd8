//! Property-based tests for the spatial index, scaling and update handling.

mod common;

use common::{CellBuilder, CELL, LIGHTS, OBSTRN};
use proptest::prelude::*;
use s57chart::index::{haversine_nm, IndexEntry};
use s57chart::record::{Orientation, RecordInstruction, Topology, Usage, VectorId};
use s57chart::{parse_chart, Bounds, Coordinate, LinearIndex, ObjectClass, ParseOptions, RTreeIndex, SpatialIndex};

const VALSOU: u16 = 179;

fn bounds() -> impl Strategy<Value = Bounds> {
    (-80.0..80.0f64, -179.0..179.0f64, 0.0..1.0f64, 0.0..1.0f64)
        .prop_map(|(lat, lon, h, w)| Bounds::new(lat, lon, lat + h, lon + w))
}

/// Rectangles that may leave the valid coordinate ranges, as corrupt
/// coordinates or a tiny COMF produce.
fn wide_bounds() -> impl Strategy<Value = Bounds> {
    (-120.0..120.0f64, -400.0..400.0f64, 0.0..5.0f64, 0.0..5.0f64)
        .prop_map(|(lat, lon, h, w)| Bounds::new(lat, lon, lat + h, lon + w))
}

fn entries() -> impl Strategy<Value = Vec<IndexEntry>> {
    entries_in(bounds())
}

fn entries_in(bounds: impl Strategy<Value = Bounds>) -> impl Strategy<Value = Vec<IndexEntry>> {
    prop::collection::vec((bounds, any::<bool>()), 0..300).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(position, (bounds, light))| IndexEntry {
                position,
                bounds,
                feature_type: if light { ObjectClass::Lights } else { ObjectClass::Obstrn },
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_rtree_matches_linear_for_windows(
        entries in entries(),
        window in bounds(),
        fanout in 2usize..20,
    ) {
        let linear = LinearIndex::new(entries.clone());
        let rtree = RTreeIndex::bulk_load(entries, fanout);
        prop_assert_eq!(linear.query_bounds(&window), rtree.query_bounds(&window));
        prop_assert_eq!(
            linear.query_by_type(&[ObjectClass::Lights], Some(&window)),
            rtree.query_by_type(&[ObjectClass::Lights], Some(&window))
        );
    }

    #[test]
    fn prop_rtree_matches_linear_for_points(
        entries in entries(),
        lat in -85.0..85.0f64,
        lon in -179.9..179.9f64,
        radius in 0.0..200.0f64,
    ) {
        let linear = LinearIndex::new(entries.clone());
        let rtree = RTreeIndex::bulk_load(entries, 8);
        let point = Coordinate::new(lat, lon);
        prop_assert_eq!(linear.query_point(point, radius), rtree.query_point(point, radius));
    }

    #[test]
    fn prop_rtree_matches_linear_beyond_the_globe(
        entries in entries_in(wide_bounds()),
        window in wide_bounds(),
        lat in -120.0..120.0f64,
        lon in -400.0..400.0f64,
        radius in 0.0..500.0f64,
        fanout in 2usize..20,
    ) {
        let linear = LinearIndex::new(entries.clone());
        let rtree = RTreeIndex::bulk_load(entries, fanout);
        prop_assert_eq!(linear.query_bounds(&window), rtree.query_bounds(&window));
        let point = Coordinate::new(lat, lon);
        prop_assert_eq!(linear.query_point(point, radius), rtree.query_point(point, radius));
    }

    #[test]
    fn prop_query_results_are_ascending(entries in entries(), window in bounds()) {
        let rtree = RTreeIndex::bulk_load(entries, 4);
        let hits = rtree.query_bounds(&window);
        prop_assert!(hits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_haversine_is_symmetric(
        a_lat in -89.0..89.0f64, a_lon in -180.0..180.0f64,
        b_lat in -89.0..89.0f64, b_lon in -180.0..180.0f64,
    ) {
        let a = Coordinate::new(a_lat, a_lon);
        let b = Coordinate::new(b_lat, b_lon);
        let ab = haversine_nm(a, b);
        prop_assert!((ab - haversine_nm(b, a)).abs() < 1e-9);
        prop_assert!(ab >= 0.0);
        prop_assert!(haversine_nm(a, a) < 1e-9);
    }

    #[test]
    fn prop_coordinates_and_depths_are_descaled(
        lat in -900_000_000i32..900_000_000,
        lon in -1_800_000_000i32..1_800_000_000,
        valsou in 0u32..100_000,
    ) {
        let mut b = CellBuilder::base(CELL);
        b.isolated_node(1, lat, lon);
        let text = valsou.to_string();
        b.point_feature(1, OBSTRN, 1, &[(VALSOU, text.as_str())]);
        let chart = parse_chart(&b.build(), &[], &ParseOptions::default()).unwrap();

        let feature = &chart.features()[0];
        prop_assert_eq!(feature.coordinates[0], Coordinate::new(f64::from(lat) / 1e7, f64::from(lon) / 1e7));
        let depth = feature.attribute("VALSOU").and_then(|v| v.as_f64());
        prop_assert_eq!(depth, Some(f64::from(valsou) / 10.0));
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = parse_chart(&bytes, &[], &ParseOptions::default());
        let _ = parse_chart(&bytes, &[], &ParseOptions::strict());
    }

    #[test]
    fn prop_update_sequences_never_panic(
        base_updn in update_number(),
        updates in prop::collection::vec((update_number(), prop::collection::vec(edit(), 0..6)), 0..4),
        garbage in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let base = common::harbour_cell_at(&base_updn);
        let files: Vec<Vec<u8>> = updates.iter().map(|(updn, edits)| update_file(updn, edits)).collect();
        let slices: Vec<&[u8]> = files.iter().map(Vec::as_slice).collect();

        let chart = parse_chart(&base, &slices, &ParseOptions::default());
        prop_assert!(chart.is_ok(), "{:?}", chart.err());
        if let Ok(chart) = chart {
            let applied = chart.applied_updates();
            prop_assert!(applied.windows(2).all(|w| w[0].checked_add(1) == Some(w[1])), "{:?}", applied);
        }
        let _ = parse_chart(&base, &slices, &ParseOptions::strict());

        let mut with_garbage = slices.clone();
        with_garbage.push(garbage.as_slice());
        let _ = parse_chart(&base, &with_garbage, &ParseOptions::default());
    }

    #[test]
    fn prop_truncated_cells_never_panic(cut in 0usize..2_000) {
        let bytes = common::harbour_cell();
        let cut = cut.min(bytes.len());
        let _ = parse_chart(&bytes[..cut], &[], &ParseOptions::default());
    }
}

fn update_number() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..5).prop_map(|n| n.to_string()),
        any::<u32>().prop_map(|n| n.to_string()),
        Just(u32::MAX.to_string()),
        Just("4294967296".to_string()),
        "[ 0-9A-Z-]{0,12}",
    ]
}

fn instruction() -> impl Strategy<Value = RecordInstruction> {
    prop_oneof![
        Just(RecordInstruction::Insert),
        Just(RecordInstruction::Delete),
        Just(RecordInstruction::Modify),
    ]
}

/// One record of an update file, aimed at records of the harbour cell
/// most of the time.
#[derive(Debug, Clone)]
struct Edit {
    feature: bool,
    rcid: u32,
    rver: u16,
    instruction: RecordInstruction,
    control: Option<(RecordInstruction, u16, u16)>,
    coords: Vec<(i32, i32)>,
}

fn edit() -> impl Strategy<Value = Edit> {
    let rcid = prop_oneof![Just(1u32), Just(2), Just(42), Just(60), Just(100), any::<u32>()];
    (
        any::<bool>(),
        rcid,
        prop_oneof![0u16..4, any::<u16>()],
        instruction(),
        prop::option::of((instruction(), any::<u16>(), any::<u16>())),
        prop::collection::vec((any::<i32>(), any::<i32>()), 0..4),
    )
        .prop_map(|(feature, rcid, rver, instruction, control, coords)| Edit {
            feature,
            rcid,
            rver,
            instruction,
            control,
            coords,
        })
}

fn update_file(updn: &str, edits: &[Edit]) -> Vec<u8> {
    let mut b = CellBuilder::update_with(CELL, updn);
    for e in edits {
        b.record(|r| {
            if e.feature {
                let r = r
                    .frid(e.rcid, 3, LIGHTS, e.rver, e.instruction)
                    .attf(&[(common::COLOUR, "2")])
                    .fspt(&[(VectorId::edge(1), Orientation::Forward, Usage::Exterior)]);
                match e.control {
                    Some((instruction, index, count)) => r.fspc(instruction, index, count),
                    None => r,
                }
            } else {
                let r = r
                    .vrid(VectorId::edge(e.rcid), e.rver, e.instruction)
                    .vrpt(&[
                        (VectorId::connected_node(1), Orientation::NotApplicable, Topology::BeginNode),
                        (VectorId::connected_node(2), Orientation::NotApplicable, Topology::EndNode),
                    ])
                    .sg2d(&e.coords);
                match e.control {
                    Some((instruction, index, count)) => r.vrpc(instruction, index, count).sgcc(instruction, index, count),
                    None => r,
                }
            }
        });
    }
    b.build()
}
