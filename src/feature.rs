//! The feature model exposed by a parsed chart.

use crate::catalog::{AttributeCode, ObjectClass};
use crate::coerce::CoercedValue;
use crate::record::ObjectId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a feature: code, acronym and name, or `unknown(code)`.
pub type FeatureType = ObjectClass;

/// A WGS 84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate.
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lon)
    }
}

/// An axis-aligned latitude/longitude rectangle. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Southern edge
    pub min_lat: f64,
    /// Western edge
    pub min_lon: f64,
    /// Northern edge
    pub max_lat: f64,
    /// Eastern edge
    pub max_lon: f64,
}

impl Bounds {
    /// Create a rectangle from its edges.
    #[must_use]
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Bounds {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// A degenerate rectangle around one position.
    #[must_use]
    pub fn point(c: Coordinate) -> Self {
        Bounds::new(c.lat, c.lon, c.lat, c.lon)
    }

    /// The smallest rectangle holding every coordinate, `None` for an empty slice.
    #[must_use]
    pub fn from_coords<'c>(coords: impl IntoIterator<Item = &'c Coordinate>) -> Option<Self> {
        coords
            .into_iter()
            .map(|&c| Bounds::point(c))
            .reduce(|a, b| a.union(&b))
    }

    /// The smallest rectangle holding both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_lat: self.min_lat.min(other.min_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lat: self.max_lat.max(other.max_lat),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    /// Whether the rectangles share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
            && self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
    }

    /// Whether `other` lies entirely inside `self`.
    #[must_use]
    pub fn contains(&self, other: &Bounds) -> bool {
        self.min_lat <= other.min_lat
            && self.min_lon <= other.min_lon
            && self.max_lat >= other.max_lat
            && self.max_lon >= other.max_lon
    }

    /// Whether a position lies inside.
    #[must_use]
    pub fn contains_point(&self, c: Coordinate) -> bool {
        c.lat >= self.min_lat && c.lat <= self.max_lat && c.lon >= self.min_lon && c.lon <= self.max_lon
    }

    /// The centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Area in square degrees.
    #[must_use]
    pub fn area(&self) -> f64 {
        (self.max_lat - self.min_lat).max(0.0) * (self.max_lon - self.min_lon).max(0.0)
    }

    /// The point of the rectangle closest to `c`.
    #[must_use]
    pub fn clamp(&self, c: Coordinate) -> Coordinate {
        Coordinate::new(
            c.lat.clamp(self.min_lat, self.max_lat),
            c.lon.clamp(self.min_lon, self.max_lon),
        )
    }
}

/// Geometry kind of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryType {
    /// A single position, or a set of soundings
    Point,
    /// An open polyline
    Line,
    /// A closed exterior ring with optional holes
    Area,
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeometryType::Point => "point",
            GeometryType::Line => "line",
            GeometryType::Area => "area",
        })
    }
}

/// A charted feature with resolved geometry and typed attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    /// Feature record id (`RCID`)
    pub record_id: u32,
    /// Object class
    pub feature_type: FeatureType,
    /// Geometry kind
    pub geometry_type: GeometryType,
    /// Positions: the point, the polyline, or the closed exterior ring
    pub coordinates: Vec<Coordinate>,
    /// Closed interior rings of an area
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<Coordinate>>,
    /// Depths in metres, one per coordinate, for sounding features
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub soundings: Vec<f64>,
    /// Attributes in record order
    pub attributes: IndexMap<AttributeCode, CoercedValue>,
    /// Record version after updates
    pub version: u16,
    /// Object identifier
    pub object_id: Option<ObjectId>,
    /// Bounding box of the coordinates
    pub bounds: Bounds,
}

impl Feature {
    /// Look up an attribute by acronym, e.g. `"DRVAL1"`.
    #[must_use]
    pub fn attribute(&self, acronym: &str) -> Option<&CoercedValue> {
        let code = AttributeCode::from_acronym(acronym)?;
        self.attributes.get(&code)
    }

    /// The object name (`OBJNAM`, then `NOBJNM`), if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        [AttributeCode::Objnam, AttributeCode::Nobjnm]
            .iter()
            .filter_map(|code| self.attributes.get(code)?.as_str())
            .find(|s| !s.is_empty())
    }

    /// Whether the feature carries sounding depths.
    #[must_use]
    pub fn is_sounding(&self) -> bool {
        !self.soundings.is_empty()
    }

    /// Number of vertices over all rings and points.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.coordinates.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }
}
