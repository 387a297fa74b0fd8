//! Spatial Index over the features of a parsed chart.
//!
//! Two implementations answer the same [`SpatialIndex`] queries:
//!
//! - [`LinearIndex`] scans every entry and is used for small charts
//! - [`RTreeIndex`] is an STR bulk-loaded R-tree for larger ones
//!
//! Both return feature *positions* (indices into the chart's feature list)
//! in ascending order, and both decide point matches with the same
//! predicate, [`within_radius`]. Their results for any query are identical.

mod linear;
mod rtree;

pub use linear::LinearIndex;
pub use rtree::RTreeIndex;

use crate::feature::{Bounds, Coordinate, Feature, FeatureType};
use serde::{Deserialize, Serialize};

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Which implementation backs an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Full scan
    Linear,
    /// STR bulk-loaded R-tree
    RTree,
}

/// What an index stores per feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    /// Position of the feature in the chart's feature list
    pub position: usize,
    /// Bounding box of the feature
    pub bounds: Bounds,
    /// Object class of the feature
    pub feature_type: FeatureType,
}

impl IndexEntry {
    /// Entries for a feature list, positions in list order.
    #[must_use]
    pub fn from_features(features: &[Feature]) -> Vec<IndexEntry> {
        features
            .iter()
            .enumerate()
            .map(|(position, f)| IndexEntry {
                position,
                bounds: f.bounds,
                feature_type: f.feature_type,
            })
            .collect()
    }

    fn matches_type(&self, types: &[FeatureType]) -> bool {
        types.contains(&self.feature_type)
    }
}

/// Query contract shared by every index implementation.
pub trait SpatialIndex {
    /// Features whose bounds intersect `bounds`.
    fn query_bounds(&self, bounds: &Bounds) -> Vec<usize>;

    /// Features within `radius_nm` nautical miles of `point`.
    fn query_point(&self, point: Coordinate, radius_nm: f64) -> Vec<usize>;

    /// Features of any of `types`, optionally restricted to `bounds`.
    fn query_by_type(&self, types: &[FeatureType], bounds: Option<&Bounds>) -> Vec<usize>;

    /// Number of indexed features.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The implementation.
    fn kind(&self) -> IndexKind;
}

/// The index a chart holds, chosen by feature count.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartIndex {
    /// Below the threshold
    Linear(LinearIndex),
    /// At or above the threshold
    RTree(RTreeIndex),
}

impl ChartIndex {
    /// Build a linear index below `threshold` features, an R-tree otherwise.
    #[must_use]
    pub fn build(features: &[Feature], threshold: usize, max_node_entries: usize) -> Self {
        let entries = IndexEntry::from_features(features);
        let index = if entries.len() < threshold {
            ChartIndex::Linear(LinearIndex::new(entries))
        } else {
            ChartIndex::RTree(RTreeIndex::bulk_load(entries, max_node_entries))
        };
        tracing::debug!(kind = ?index.kind(), features = features.len(), "built spatial index");
        index
    }

    fn inner(&self) -> &dyn SpatialIndex {
        match self {
            ChartIndex::Linear(index) => index,
            ChartIndex::RTree(index) => index,
        }
    }
}

impl SpatialIndex for ChartIndex {
    fn query_bounds(&self, bounds: &Bounds) -> Vec<usize> {
        self.inner().query_bounds(bounds)
    }

    fn query_point(&self, point: Coordinate, radius_nm: f64) -> Vec<usize> {
        self.inner().query_point(point, radius_nm)
    }

    fn query_by_type(&self, types: &[FeatureType], bounds: Option<&Bounds>) -> Vec<usize> {
        self.inner().query_by_type(types, bounds)
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn kind(&self) -> IndexKind {
        self.inner().kind()
    }
}

/// Great-circle distance in nautical miles.
#[must_use]
pub fn haversine_nm(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * h.max(0.0).sqrt().min(1.0).asin()
}

/// Whether the nearest point of `bounds` lies within `radius_nm` of `point`.
#[must_use]
pub fn within_radius(bounds: &Bounds, point: Coordinate, radius_nm: f64) -> bool {
    haversine_nm(point, bounds.clamp(point)) <= radius_nm
}

/// A rectangle holding every position within `radius_nm` of `point`.
///
/// Near a pole, or when the circle crosses the antimeridian, the window
/// spans every longitude.
#[must_use]
pub fn search_window(point: Coordinate, radius_nm: f64) -> Bounds {
    let angular = radius_nm / EARTH_RADIUS_NM;
    let dlat = angular.to_degrees() * (1.0 + 1e-9) + 1e-9;
    let min_lat = point.lat - dlat;
    let max_lat = point.lat + dlat;
    if min_lat <= -90.0 || max_lat >= 90.0 || angular >= std::f64::consts::FRAC_PI_2 {
        return Bounds::new(min_lat.max(-90.0), -180.0, max_lat.min(90.0), 180.0);
    }

    let ratio = angular.sin() / point.lat.to_radians().cos();
    if ratio >= 1.0 {
        return Bounds::new(min_lat, -180.0, max_lat, 180.0);
    }
    let dlon = ratio.asin().to_degrees() * (1.0 + 1e-9) + 1e-9;
    let (min_lon, max_lon) = (point.lon - dlon, point.lon + dlon);
    if min_lon < -180.0 || max_lon > 180.0 {
        return Bounds::new(min_lat, -180.0, max_lat, 180.0);
    }
    Bounds::new(min_lat, min_lon, max_lat, max_lon)
}

/// Whether a rectangle lies within the valid latitude and longitude ranges.
fn on_globe(bounds: &Bounds) -> bool {
    bounds.min_lat >= -90.0 && bounds.max_lat <= 90.0 && bounds.min_lon >= -180.0 && bounds.max_lon <= 180.0
}

/// Whether a point query can match anything at all.
fn valid_point_query(point: Coordinate, radius_nm: f64) -> bool {
    point.lat.is_finite() && point.lon.is_finite() && radius_nm.is_finite() && radius_nm >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let d = haversine_nm(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 60.04).abs() < 0.01, "{d}");
        assert!(haversine_nm(Coordinate::new(42.0, -71.0), Coordinate::new(42.0, -71.0)).abs() < 1e-12);
    }

    #[test]
    fn test_within_radius_uses_nearest_edge() {
        let b = Bounds::new(0.0, 0.0, 1.0, 1.0);
        assert!(within_radius(&b, Coordinate::new(0.5, 0.5), 0.0));
        assert!(within_radius(&b, Coordinate::new(1.1, 0.5), 6.1));
        assert!(!within_radius(&b, Coordinate::new(1.1, 0.5), 5.9));
    }

    #[test]
    fn test_search_window_contains_the_circle() {
        let center = Coordinate::new(60.0, 10.0);
        let window = search_window(center, 30.0);
        for bearing in 0..36 {
            let theta = f64::from(bearing * 10).to_radians();
            let angular = 30.0 / EARTH_RADIUS_NM;
            let lat1 = center.lat.to_radians();
            let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos()).asin();
            let lon2 = center.lon.to_radians()
                + (theta.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());
            let p = Coordinate::new(lat2.to_degrees(), lon2.to_degrees());
            assert!(window.contains_point(p), "{p} outside {window:?}");
        }
    }

    #[test]
    fn test_on_globe() {
        assert!(on_globe(&Bounds::new(-90.0, -180.0, 90.0, 180.0)));
        assert!(!on_globe(&Bounds::new(10.0, 170.0, 10.0, 200.0)));
        assert!(!on_globe(&Bounds::new(-95.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_search_window_degenerate_cases() {
        let polar = search_window(Coordinate::new(89.9, 0.0), 20.0);
        assert_eq!((polar.min_lon, polar.max_lon), (-180.0, 180.0));
        let dateline = search_window(Coordinate::new(0.0, 179.9), 20.0);
        assert_eq!((dateline.min_lon, dateline.max_lon), (-180.0, 180.0));
    }
}
