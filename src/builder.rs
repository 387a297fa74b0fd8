//! Feature Builder: geometry and attributes from the record arenas.
//!
//! Geometry is never stored on feature records. It is resolved here by
//! following the feature's spatial pointers into the vector arena:
//!
//! - a point feature references one or more nodes; a node with `SG3D`
//!   soundings yields a sounding multipoint
//! - a line feature references an ordered chain of edges
//! - an area feature references the edges of its exterior ring (`USAG` 1 or 3)
//!   and of its holes (`USAG` 2)
//!
//! An edge's coordinates are its begin node, its own `SG2D` points and its
//! end node, reversed when the pointer's orientation is reverse. Consecutive
//! edges share their junction node, which is kept once.
//!
//! Every degradation is recorded: dangling pointers, short geometries,
//! auto-closed rings and dropped features all leave a warning behind.

use crate::catalog::{AttributeCode, ObjectClass};
use crate::cell::RecordStore;
use crate::coerce::{coerce_attribute_value, CoercedValue};
use crate::error::Result;
use crate::feature::{Bounds, Coordinate, Feature, GeometryType};
use crate::metadata::ChartMetadata;
use crate::options::ParseOptions;
use crate::record::{FeaturePointer, FeatureRecord, Orientation, Primitive, SpatialRecord, Usage, VectorId};
use crate::warning::{Severity, WarningCode, WarningCollector};
use indexmap::IndexMap;

/// Resolved geometry of one feature.
#[derive(Debug, Default)]
struct Geometry {
    coordinates: Vec<Coordinate>,
    holes: Vec<Vec<Coordinate>>,
    soundings: Vec<f64>,
}

/// Builds [`Feature`]s from a [`RecordStore`].
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder<'a> {
    store: &'a RecordStore,
    metadata: &'a ChartMetadata,
    options: &'a ParseOptions,
}

impl<'a> FeatureBuilder<'a> {
    /// Create a builder over a record store.
    #[must_use]
    pub fn new(store: &'a RecordStore, metadata: &'a ChartMetadata, options: &'a ParseOptions) -> Self {
        FeatureBuilder {
            store,
            metadata,
            options,
        }
    }

    /// Build every feature in the store, in store order.
    ///
    /// # Errors
    ///
    /// Only returns an error when the collector promotes a warning in strict mode.
    pub fn build_all(&self, warnings: &mut WarningCollector) -> Result<Vec<Feature>> {
        let mut features = Vec::with_capacity(self.store.features.len());
        for record in self.store.features.values() {
            if let Some(feature) = self.build(record, warnings)? {
                features.push(feature);
            }
        }
        tracing::debug!(
            records = self.store.features.len(),
            features = features.len(),
            "built features"
        );
        Ok(features)
    }

    /// Build one feature. Returns `Ok(None)` when the feature was dropped.
    ///
    /// # Errors
    ///
    /// Only returns an error when the collector promotes a warning in strict mode.
    pub fn build(&self, record: &FeatureRecord, warnings: &mut WarningCollector) -> Result<Option<Feature>> {
        let rcid = record.rcid;
        let feature_type = ObjectClass::from_code(record.objl);
        if !feature_type.is_known() {
            warnings.push_for(
                rcid,
                Severity::Warning,
                WarningCode::UnknownObjCode,
                format!("object class {} is not in the catalog", record.objl),
            )?;
        }

        let geometry_type = match record.primitive() {
            Some(Primitive::Point) => GeometryType::Point,
            Some(Primitive::Line) => GeometryType::Line,
            Some(Primitive::Area) => GeometryType::Area,
            Some(Primitive::None) => {
                warnings.push_for(
                    rcid,
                    Severity::Info,
                    WarningCode::NonSpatialFeature,
                    format!("{feature_type} {rcid} has no spatial primitive"),
                )?;
                return Ok(None);
            },
            None => {
                warnings.push_for(
                    rcid,
                    Severity::Warning,
                    WarningCode::NoGeometry,
                    format!("{feature_type} {rcid} has invalid primitive {}", record.prim),
                )?;
                return Ok(None);
            },
        };

        let geometry = match geometry_type {
            GeometryType::Point => self.point(record, warnings)?,
            GeometryType::Line => self.line(record, warnings)?,
            GeometryType::Area => self.area(record, warnings)?,
        };
        let Some(bounds) = Bounds::from_coords(&geometry.coordinates) else {
            warnings.push_for(
                rcid,
                Severity::Warning,
                WarningCode::NoGeometry,
                format!("{feature_type} {rcid} has no resolvable geometry and was dropped"),
            )?;
            return Ok(None);
        };

        let attributes = self.attributes(record, warnings)?;
        for required in feature_type.required_attributes() {
            if !attributes.contains_key(required) {
                warnings.push_for(
                    rcid,
                    Severity::Warning,
                    WarningCode::MissingRequiredAttr,
                    format!("{feature_type} {rcid} lacks {required}"),
                )?;
            }
        }

        Ok(Some(Feature {
            record_id: rcid,
            feature_type,
            geometry_type,
            coordinates: geometry.coordinates,
            holes: geometry.holes,
            soundings: geometry.soundings,
            attributes,
            version: record.rver,
            object_id: record.object_id,
            bounds,
        }))
    }

    fn coordinate(&self, (y, x): (i32, i32)) -> Coordinate {
        Coordinate::new(self.metadata.coordinate(y), self.metadata.coordinate(x))
    }

    fn resolve(&self, rcid: u32, target: VectorId, warnings: &mut WarningCollector) -> Result<Option<&'a SpatialRecord>> {
        match self.store.spatial(target) {
            Some(spatial) => Ok(Some(spatial)),
            None => {
                warnings.push_for(
                    rcid,
                    Severity::Warning,
                    WarningCode::DanglingPointer,
                    format!("feature {rcid} points to missing {target}"),
                )?;
                Ok(None)
            },
        }
    }

    fn point(&self, record: &FeatureRecord, warnings: &mut WarningCollector) -> Result<Geometry> {
        let mut geometry = Geometry::default();
        for pointer in &record.spatial {
            let Some(node) = self.resolve(record.rcid, pointer.target, warnings)? else {
                continue;
            };
            if node.soundings.is_empty() {
                geometry.coordinates.extend(node.coords.iter().map(|&c| self.coordinate(c)));
                continue;
            }
            for &(y, x, z) in &node.soundings {
                let depth = self.metadata.depth(f64::from(z));
                if !self.options.depth_in_range(depth) {
                    warnings.push_for(
                        record.rcid,
                        Severity::Warning,
                        WarningCode::DepthOutOfRange,
                        format!("sounding {depth} m in {} is outside the plausible range", node.id),
                    )?;
                }
                geometry.coordinates.push(self.coordinate((y, x)));
                geometry.soundings.push(depth);
            }
        }
        Ok(geometry)
    }

    fn line(&self, record: &FeatureRecord, warnings: &mut WarningCollector) -> Result<Geometry> {
        let mut coordinates = Vec::new();
        for pointer in &record.spatial {
            if let Some(segment) = self.edge(record.rcid, pointer, warnings)? {
                join(&mut coordinates, segment);
            }
        }
        if coordinates.len() == 1 {
            warnings.push_for(
                record.rcid,
                Severity::Warning,
                WarningCode::CoordCountMismatch,
                format!("line feature {} resolved to a single position", record.rcid),
            )?;
        }
        Ok(Geometry {
            coordinates,
            ..Geometry::default()
        })
    }

    fn area(&self, record: &FeatureRecord, warnings: &mut WarningCollector) -> Result<Geometry> {
        let mut outer = Vec::new();
        let mut inner = Vec::new();
        for pointer in &record.spatial {
            let Some(segment) = self.edge(record.rcid, pointer, warnings)? else {
                continue;
            };
            if segment.is_empty() {
                continue;
            }
            if pointer.usage == Usage::Interior {
                inner.push(segment);
            } else {
                outer.push(segment);
            }
        }

        let mut rings = chain_rings(outer).into_iter();
        let mut exterior = rings.next().unwrap_or_default();
        let extra = rings.count();
        if extra > 0 {
            warnings.push_for(
                record.rcid,
                Severity::Warning,
                WarningCode::ExtraExteriorRing,
                format!(
                    "area feature {} has {extra} exterior ring(s) after the first, dropped",
                    record.rcid
                ),
            )?;
        }
        let mut holes = chain_rings(inner);

        let mut closed = 0;
        for ring in std::iter::once(&mut exterior).chain(holes.iter_mut()) {
            if !ring.is_empty() && ring.first() != ring.last() {
                let first = ring[0];
                ring.push(first);
                closed += 1;
            }
        }
        if closed > 0 {
            warnings.push_for(
                record.rcid,
                Severity::Info,
                WarningCode::PolygonClosedAuto,
                format!("closed {closed} open ring(s) of area feature {}", record.rcid),
            )?;
        }
        if !exterior.is_empty() && exterior.len() < 4 {
            warnings.push_for(
                record.rcid,
                Severity::Warning,
                WarningCode::CoordCountMismatch,
                format!(
                    "area feature {} has a ring of only {} positions",
                    record.rcid,
                    exterior.len()
                ),
            )?;
        }

        Ok(Geometry {
            coordinates: exterior,
            holes,
            soundings: Vec::new(),
        })
    }

    /// Coordinates of the vector record a pointer names, in traversal order.
    fn edge(
        &self,
        rcid: u32,
        pointer: &FeaturePointer,
        warnings: &mut WarningCollector,
    ) -> Result<Option<Vec<Coordinate>>> {
        let Some(spatial) = self.resolve(rcid, pointer.target, warnings)? else {
            return Ok(None);
        };
        if !spatial.id.is_edge() {
            let coords = spatial.coords.iter().map(|&c| self.coordinate(c)).collect();
            return Ok(Some(coords));
        }

        let (begin, end) = spatial.end_nodes();
        let mut coords = Vec::with_capacity(spatial.coords.len() + 2);
        if let Some(c) = self.node_position(rcid, begin, warnings)? {
            coords.push(c);
        }
        coords.extend(spatial.coords.iter().map(|&c| self.coordinate(c)));
        if let Some(c) = self.node_position(rcid, end, warnings)? {
            coords.push(c);
        }
        if pointer.orientation == Orientation::Reverse {
            coords.reverse();
        }
        Ok(Some(coords))
    }

    fn node_position(
        &self,
        rcid: u32,
        node: Option<VectorId>,
        warnings: &mut WarningCollector,
    ) -> Result<Option<Coordinate>> {
        let Some(node) = node else {
            return Ok(None);
        };
        Ok(self
            .resolve(rcid, node, warnings)?
            .and_then(|n| n.coords.first())
            .map(|&c| self.coordinate(c)))
    }

    fn attributes(
        &self,
        record: &FeatureRecord,
        warnings: &mut WarningCollector,
    ) -> Result<IndexMap<AttributeCode, CoercedValue>> {
        let rcid = record.rcid;
        let mut attributes = IndexMap::with_capacity(record.attributes.len() + record.national_attributes.len());

        for (code, text) in record.attributes.iter().chain(&record.national_attributes) {
            let attribute = AttributeCode::from_code(*code);
            if !attribute.is_known() {
                warnings.push_for(
                    rcid,
                    Severity::Warning,
                    WarningCode::UnknownAttrCode,
                    format!("attribute {code} of feature {rcid} is not in the catalog"),
                )?;
            }

            let mut value = match coerce_attribute_value(text, attribute.attribute_type()) {
                Some(value) => value,
                None => {
                    warnings.push_for(
                        rcid,
                        Severity::Warning,
                        WarningCode::BadAttributeValue,
                        format!("{attribute} value {text:?} is not a valid {:?}, kept as text", attribute.attribute_type()),
                    )?;
                    CoercedValue::Text(text.clone())
                },
            };

            if attribute.is_depth() {
                if let Some(raw) = value.as_f64() {
                    let depth = self.metadata.depth(raw);
                    if !self.options.depth_in_range(depth) {
                        warnings.push_for(
                            rcid,
                            Severity::Warning,
                            WarningCode::DepthOutOfRange,
                            format!("{attribute} {depth} m is outside the plausible range"),
                        )?;
                    }
                    value = CoercedValue::Real(depth);
                }
            }
            attributes.insert(attribute, value);
        }
        Ok(attributes)
    }
}

/// Chain segments into rings. A ring that has closed on itself takes no
/// more segments and the next segment starts a new ring.
fn chain_rings(segments: Vec<Vec<Coordinate>>) -> Vec<Vec<Coordinate>> {
    let mut rings: Vec<Vec<Coordinate>> = Vec::new();
    for segment in segments {
        match rings.last_mut() {
            Some(ring) if !is_closed(ring) => join(ring, segment),
            _ => rings.push(segment),
        }
    }
    rings
}

fn is_closed(ring: &[Coordinate]) -> bool {
    ring.len() > 3 && ring.first() == ring.last()
}

/// Append a segment, keeping a shared junction point once.
fn join(line: &mut Vec<Coordinate>, segment: Vec<Coordinate>) {
    let skip = usize::from(line.last().is_some() && line.last() == segment.first());
    line.extend(segment.into_iter().skip(skip));
}
