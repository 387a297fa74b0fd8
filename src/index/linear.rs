//! Linear-scan index.

use super::{valid_point_query, within_radius, IndexEntry, IndexKind, SpatialIndex};
use crate::feature::{Bounds, Coordinate, FeatureType};

/// An index that checks every entry. Entries stay in position order, so
/// results come out sorted without extra work.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearIndex {
    entries: Vec<IndexEntry>,
}

impl LinearIndex {
    /// Create an index over entries.
    #[must_use]
    pub fn new(mut entries: Vec<IndexEntry>) -> Self {
        entries.sort_by_key(|e| e.position);
        LinearIndex { entries }
    }

    fn scan(&self, keep: impl Fn(&IndexEntry) -> bool) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|e| keep(e))
            .map(|e| e.position)
            .collect()
    }
}

impl SpatialIndex for LinearIndex {
    fn query_bounds(&self, bounds: &Bounds) -> Vec<usize> {
        self.scan(|e| e.bounds.intersects(bounds))
    }

    fn query_point(&self, point: Coordinate, radius_nm: f64) -> Vec<usize> {
        if !valid_point_query(point, radius_nm) {
            return Vec::new();
        }
        self.scan(|e| within_radius(&e.bounds, point, radius_nm))
    }

    fn query_by_type(&self, types: &[FeatureType], bounds: Option<&Bounds>) -> Vec<usize> {
        self.scan(|e| e.matches_type(types) && bounds.map_or(true, |b| e.bounds.intersects(b)))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn kind(&self) -> IndexKind {
        IndexKind::Linear
    }
}
