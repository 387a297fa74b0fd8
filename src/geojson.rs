//! Lossy GeoJSON export.
//!
//! Features become a `FeatureCollection` for external tooling:
//!
//! | Feature | Geometry |
//! |---|---|
//! | point | `Point` |
//! | soundings | `MultiPoint` with depth as third ordinate |
//! | line | `LineString` |
//! | area | `Polygon`, exterior ring first, then holes |
//!
//! Positions are `[lon, lat]`. Attributes are flattened into `properties`
//! keyed by acronym. Feature relationships, object identifiers beyond
//! `FIDN` and the index are not exported.

use crate::chart::ParsedChart;
use crate::error::Result;
use crate::feature::{Coordinate, Feature, GeometryType};
use serde_json::{json, Map, Value};

fn position(c: &Coordinate) -> Value {
    json!([c.lon, c.lat])
}

fn ring(coords: &[Coordinate]) -> Value {
    Value::Array(coords.iter().map(position).collect())
}

/// The GeoJSON geometry of a feature.
#[must_use]
pub fn geometry(feature: &Feature) -> Value {
    match feature.geometry_type {
        GeometryType::Point if feature.is_sounding() => {
            let points: Vec<Value> = feature
                .coordinates
                .iter()
                .zip(&feature.soundings)
                .map(|(c, depth)| json!([c.lon, c.lat, depth]))
                .collect();
            json!({ "type": "MultiPoint", "coordinates": points })
        },
        GeometryType::Point if feature.coordinates.len() > 1 => {
            json!({ "type": "MultiPoint", "coordinates": ring(&feature.coordinates) })
        },
        GeometryType::Point | GeometryType::Line if feature.coordinates.len() == 1 => {
            json!({ "type": "Point", "coordinates": position(&feature.coordinates[0]) })
        },
        GeometryType::Point | GeometryType::Line => {
            json!({ "type": "LineString", "coordinates": ring(&feature.coordinates) })
        },
        GeometryType::Area => {
            let rings: Vec<Value> = std::iter::once(&feature.coordinates)
                .chain(&feature.holes)
                .map(|r| ring(r))
                .collect();
            json!({ "type": "Polygon", "coordinates": rings })
        },
    }
}

/// One GeoJSON `Feature` object.
#[must_use]
pub fn feature_to_geojson(feature: &Feature) -> Value {
    let mut properties = Map::new();
    properties.insert("record_id".into(), json!(feature.record_id));
    properties.insert("type".into(), json!(feature.feature_type.acronym()));
    properties.insert("type_name".into(), json!(feature.feature_type.name()));
    properties.insert("version".into(), json!(feature.version));
    if let Some(id) = feature.object_id {
        properties.insert("fidn".into(), json!(id.fidn));
    }
    for (code, value) in &feature.attributes {
        properties.insert(code.acronym().into_owned(), json!(value));
    }
    json!({
        "type": "Feature",
        "id": feature.record_id,
        "geometry": geometry(feature),
        "properties": properties,
    })
}

/// The chart as a `FeatureCollection`.
#[must_use]
pub fn to_geojson(chart: &ParsedChart) -> Value {
    let features: Vec<Value> = chart.features().iter().map(feature_to_geojson).collect();
    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let Some(b) = chart.bounds() {
        collection["bbox"] = json!([b.min_lon, b.min_lat, b.max_lon, b.max_lat]);
    }
    collection
}

/// The chart as a GeoJSON string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_geojson_string(chart: &ParsedChart) -> Result<String> {
    Ok(serde_json::to_string(&to_geojson(chart))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttributeCode, ObjectClass};
    use crate::coerce::CoercedValue;
    use crate::feature::Bounds;
    use indexmap::IndexMap;

    fn feature(geometry_type: GeometryType, coords: &[(f64, f64)]) -> Feature {
        let coordinates: Vec<Coordinate> = coords.iter().map(|&(lat, lon)| Coordinate::new(lat, lon)).collect();
        Feature {
            record_id: 5,
            feature_type: ObjectClass::Depare,
            geometry_type,
            bounds: Bounds::from_coords(&coordinates).unwrap(),
            coordinates,
            holes: Vec::new(),
            soundings: Vec::new(),
            attributes: IndexMap::from([(AttributeCode::Drval1, CoercedValue::Real(0.5))]),
            version: 1,
            object_id: None,
        }
    }

    #[test]
    fn test_polygon_is_lon_lat() {
        let f = feature(GeometryType::Area, &[(1.0, 2.0), (1.0, 3.0), (2.0, 3.0), (1.0, 2.0)]);
        let v = feature_to_geojson(&f);
        assert_eq!(v["geometry"]["type"], "Polygon");
        assert_eq!(v["geometry"]["coordinates"][0][0], json!([2.0, 1.0]));
        assert_eq!(v["properties"]["DRVAL1"], json!(0.5));
        assert_eq!(v["properties"]["type"], "DEPARE");
    }

    #[test]
    fn test_point_line_and_soundings() {
        let point = feature(GeometryType::Point, &[(1.0, 2.0)]);
        assert_eq!(geometry(&point)["type"], "Point");
        let line = feature(GeometryType::Line, &[(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(geometry(&line)["type"], "LineString");
        let mut soundings = feature(GeometryType::Point, &[(1.0, 2.0), (3.0, 4.0)]);
        soundings.soundings = vec![5.5, 7.0];
        let g = geometry(&soundings);
        assert_eq!(g["type"], "MultiPoint");
        assert_eq!(g["coordinates"][1], json!([4.0, 3.0, 7.0]));
    }
}
