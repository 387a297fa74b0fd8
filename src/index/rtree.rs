//! STR bulk-loaded R-tree.
//!
//! Sort-Tile-Recursive packing: entries are sorted by the longitude of their
//! centres, cut into vertical slices, each slice sorted by latitude and cut
//! into leaves of at most `max_entries`. The same packing is applied to each
//! level of nodes until one root remains.
//!
//! Nodes live in one flat arena. A node's children are a contiguous range of
//! either the entry array (leaves) or the node arena (internal nodes).

use super::{on_globe, search_window, valid_point_query, within_radius, IndexEntry, IndexKind, SpatialIndex};
use crate::feature::{Bounds, Coordinate, FeatureType};
use crate::options::DEFAULT_MAX_NODE_ENTRIES;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
struct Node {
    bounds: Bounds,
    children: Range<usize>,
    leaf: bool,
}

/// A read-only R-tree over index entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RTreeIndex {
    entries: Vec<IndexEntry>,
    nodes: Vec<Node>,
    root: Option<usize>,
    max_entries: usize,
    height: usize,
}

impl RTreeIndex {
    /// Bulk-load a tree. A fan-out below 2 falls back to the default.
    #[must_use]
    pub fn bulk_load(mut entries: Vec<IndexEntry>, max_entries: usize) -> Self {
        let max_entries = if max_entries < 2 {
            DEFAULT_MAX_NODE_ENTRIES
        } else {
            max_entries
        };
        if entries.is_empty() {
            return RTreeIndex {
                entries,
                nodes: Vec::new(),
                root: None,
                max_entries,
                height: 0,
            };
        }

        let mut level: Vec<Node> = str_groups(&mut entries, max_entries, |e| e.bounds)
            .into_iter()
            .map(|range| Node {
                bounds: union_of(entries[range.clone()].iter().map(|e| e.bounds)),
                children: range,
                leaf: true,
            })
            .collect();

        let mut nodes = Vec::new();
        let mut height = 1;
        while level.len() > 1 {
            let groups = str_groups(&mut level, max_entries, |n| n.bounds);
            let base = nodes.len();
            let parents = groups
                .into_iter()
                .map(|range| Node {
                    bounds: union_of(level[range.clone()].iter().map(|n| n.bounds)),
                    children: base + range.start..base + range.end,
                    leaf: false,
                })
                .collect();
            nodes.append(&mut level);
            level = parents;
            height += 1;
        }
        nodes.append(&mut level);
        let root = nodes.len() - 1;

        tracing::trace!(entries = entries.len(), nodes = nodes.len(), height, "bulk-loaded R-tree");
        RTreeIndex {
            entries,
            nodes,
            root: Some(root),
            max_entries,
            height,
        }
    }

    /// Number of levels, leaves included.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Maximum entries per node.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Positions of entries in leaves whose bounds intersect `window` and
    /// that pass `keep`, in ascending order.
    fn search(&self, window: &Bounds, keep: impl Fn(&IndexEntry) -> bool) -> Vec<usize> {
        let mut found = Vec::new();
        let Some(root) = self.root else {
            return found;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !node.bounds.intersects(window) {
                continue;
            }
            if node.leaf {
                found.extend(
                    self.entries[node.children.clone()]
                        .iter()
                        .filter(|e| e.bounds.intersects(window) && keep(e))
                        .map(|e| e.position),
                );
            } else {
                stack.extend(node.children.clone());
            }
        }
        found.sort_unstable();
        found
    }
}

impl SpatialIndex for RTreeIndex {
    fn query_bounds(&self, bounds: &Bounds) -> Vec<usize> {
        self.search(bounds, |_| true)
    }

    fn query_point(&self, point: Coordinate, radius_nm: f64) -> Vec<usize> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if !valid_point_query(point, radius_nm) {
            return Vec::new();
        }
        // Haversine wraps coordinates outside the globe back onto it, which a
        // rectangular window cannot follow. Such queries visit every leaf.
        let extent = self.nodes[root].bounds;
        let window = if on_globe(&extent) && on_globe(&Bounds::point(point)) {
            search_window(point, radius_nm)
        } else {
            extent
        };
        self.search(&window, |e| within_radius(&e.bounds, point, radius_nm))
    }

    fn query_by_type(&self, types: &[FeatureType], bounds: Option<&Bounds>) -> Vec<usize> {
        if let Some(bounds) = bounds {
            return self.search(bounds, |e| e.matches_type(types));
        }
        let mut found: Vec<usize> = self
            .entries
            .iter()
            .filter(|e| e.matches_type(types))
            .map(|e| e.position)
            .collect();
        found.sort_unstable();
        found
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn kind(&self) -> IndexKind {
        IndexKind::RTree
    }
}

fn union_of(bounds: impl Iterator<Item = Bounds>) -> Bounds {
    bounds
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0))
}

/// Reorder `items` into STR tiles and return the ranges of each group.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn str_groups<T>(items: &mut [T], max_entries: usize, bounds: impl Fn(&T) -> Bounds) -> Vec<Range<usize>> {
    let n = items.len();
    let groups = (n + max_entries - 1) / max_entries;
    let slices = (groups as f64).sqrt().ceil().max(1.0) as usize;
    let slice_len = slices * max_entries;

    items.sort_by(|a, b| bounds(a).center().lon.total_cmp(&bounds(b).center().lon));
    let mut ranges = Vec::with_capacity(groups);
    for start in (0..n).step_by(slice_len) {
        let end = (start + slice_len).min(n);
        items[start..end].sort_by(|a, b| bounds(a).center().lat.total_cmp(&bounds(b).center().lat));
        for group in (start..end).step_by(max_entries) {
            ranges.push(group..(group + max_entries).min(end));
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ObjectClass;
    use crate::index::LinearIndex;

    fn grid(n: usize) -> Vec<IndexEntry> {
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let (lat, lon) = ((i / 40) as f64 * 0.01, (i % 40) as f64 * 0.01);
                IndexEntry {
                    position: i,
                    bounds: Bounds::new(lat, lon, lat + 0.005, lon + 0.005),
                    feature_type: if i % 3 == 0 { ObjectClass::Soundg } else { ObjectClass::Depare },
                }
            })
            .collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = RTreeIndex::bulk_load(Vec::new(), 16);
        assert!(tree.is_empty());
        assert!(tree.query_bounds(&Bounds::new(-90.0, -180.0, 90.0, 180.0)).is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_tree_shape() {
        let tree = RTreeIndex::bulk_load(grid(1000), 10);
        assert_eq!(tree.len(), 1000);
        assert_eq!(tree.max_entries(), 10);
        assert!(tree.height() >= 3);
        for node in &tree.nodes {
            assert!(node.children.len() <= 10);
            assert!(!node.children.is_empty());
        }
    }

    #[test]
    fn test_matches_linear_scan() {
        let tree = RTreeIndex::bulk_load(grid(500), 4);
        let linear = LinearIndex::new(grid(500));
        let windows = [
            Bounds::new(0.0, 0.0, 0.05, 0.05),
            Bounds::new(0.1, 0.2, 0.3, 0.35),
            Bounds::new(-1.0, -1.0, 10.0, 10.0),
            Bounds::new(5.0, 5.0, 6.0, 6.0),
        ];
        for w in &windows {
            assert_eq!(tree.query_bounds(w), linear.query_bounds(w));
            assert_eq!(
                tree.query_by_type(&[ObjectClass::Soundg], Some(w)),
                linear.query_by_type(&[ObjectClass::Soundg], Some(w))
            );
        }
        let p = Coordinate::new(0.06, 0.11);
        for r in [0.0, 0.5, 2.0, 30.0] {
            assert_eq!(tree.query_point(p, r), linear.query_point(p, r));
        }
        assert_eq!(
            tree.query_by_type(&[ObjectClass::Depare], None),
            linear.query_by_type(&[ObjectClass::Depare], None)
        );
    }

    #[test]
    fn test_point_query_across_wrapped_longitudes() {
        let beyond = |position, lat, lon| IndexEntry {
            position,
            bounds: Bounds::new(lat, lon, lat, lon),
            feature_type: ObjectClass::Lights,
        };
        let entries = vec![beyond(0, 10.0, 200.0), beyond(1, 10.0, 0.0), beyond(2, 95.0, 10.0)];
        let tree = RTreeIndex::bulk_load(entries.clone(), 2);
        let linear = LinearIndex::new(entries);

        let east = Coordinate::new(10.0, -160.0);
        assert_eq!(linear.query_point(east, 1.0), vec![0]);
        assert_eq!(tree.query_point(east, 1.0), vec![0]);

        let pole = Coordinate::new(85.0, -170.0);
        assert_eq!(tree.query_point(pole, 1.0), linear.query_point(pole, 1.0));
        let outside = Coordinate::new(10.0, 360.0);
        assert_eq!(tree.query_point(outside, 1.0), vec![1]);
        assert_eq!(linear.query_point(outside, 1.0), vec![1]);
    }

    #[test]
    fn test_fan_out_floor() {
        let tree = RTreeIndex::bulk_load(grid(10), 1);
        assert_eq!(tree.max_entries(), DEFAULT_MAX_NODE_ENTRIES);
    }
}
