//! The parse pipeline and the parsed chart it produces.
//!
//! [`parse_chart`] is a pure function from byte buffers to a [`ParsedChart`]:
//!
//! 1. decode the base cell and extract its [`ChartMetadata`]
//! 2. load the record arenas
//! 3. apply each update buffer in the given order
//! 4. build features from the updated arenas
//! 5. build the spatial index
//!
//! The warning collector lives for exactly one call. Nothing is shared
//! between parses, so independent charts may be parsed concurrently.
//!
//! # Examples
//!
//! ```ignore
//! use s57chart::chart::{parse_chart, FeatureQuery};
//! use s57chart::options::ParseOptions;
//!
//! let base = std::fs::read("US5MA22M.000")?;
//! let update = std::fs::read("US5MA22M.001")?;
//! let chart = parse_chart(&base, &[update.as_slice()], &ParseOptions::default())?;
//!
//! for depth_area in chart.find_features(&FeatureQuery::new().types(["DEPARE"])) {
//!     println!("{:?}", depth_area.attribute("DRVAL1"));
//! }
//! ```

use crate::builder::FeatureBuilder;
use crate::catalog::ObjectClass;
use crate::cell::{Cell, RecordStore};
use crate::error::{ChartError, Result};
use crate::feature::{Bounds, Coordinate, Feature, FeatureType};
use crate::index::{ChartIndex, IndexKind, SpatialIndex};
use crate::metadata::ChartMetadata;
use crate::options::ParseOptions;
use crate::update::UpdateEngine;
use crate::warning::{Severity, WarningCollector, WarningReport};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a navigation-facing caller should treat a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usability {
    /// Features and no warnings
    Usable,
    /// Features, but warnings to surface to the operator
    UsableWithCaveats,
    /// No features
    Unusable,
}

/// A fully parsed, read-only chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChart {
    metadata: ChartMetadata,
    features: Vec<Feature>,
    bounds: Option<Bounds>,
    index: ChartIndex,
    warnings: WarningReport,
    applied_updates: Vec<u32>,
}

/// Parse a base cell and its updates.
///
/// `updates` must be in ascending update order (`.001`, `.002`, ...).
///
/// # Errors
///
/// - [`ChartError::InvalidConfig`] for invalid options
/// - [`ChartError::UnreadableFirstRecord`] or [`ChartError::MissingDatasetIdentity`]
///   for a base cell (or update) without a readable identity
/// - [`ChartError::UpdateSequence`] for a sequencing problem in strict mode
/// - [`ChartError::Strict`] for the first error-severity warning in strict mode
pub fn parse_chart(base: &[u8], updates: &[&[u8]], options: &ParseOptions) -> Result<ParsedChart> {
    options.validate()?;
    let span = tracing::debug_span!("parse_chart", bytes = base.len(), updates = updates.len());
    let _guard = span.enter();

    let mut warnings = WarningCollector::new(options.mode, options.warning_cap);
    let cell = Cell::decode(base, &mut warnings)?;
    let mut metadata =
        ChartMetadata::from_records(&cell.identification, cell.parameters.as_ref(), &mut warnings)?;
    let mut store = RecordStore::from_cell(cell, &mut warnings)?;

    let applied_updates = {
        let mut engine = UpdateEngine::new(&mut store, metadata.cell_id.clone(), metadata.update_number);
        for update in updates {
            engine.apply(update, &mut warnings)?;
        }
        engine.finish();
        if let Some(last) = engine.last_identification() {
            metadata.update_number = engine.last_applied();
            if !last.update_date.is_empty() {
                metadata.update_date.clone_from(&last.update_date);
            }
        }
        engine.applied().to_vec()
    };

    let features = FeatureBuilder::new(&store, &metadata, options).build_all(&mut warnings)?;
    let bounds = features.iter().map(|f| f.bounds).reduce(|a, b| a.union(&b));
    let index = ChartIndex::build(&features, options.index_threshold, options.max_node_entries);
    let warnings = warnings.into_report();

    tracing::info!(
        cell = %metadata.cell_id,
        edition = metadata.edition,
        update = metadata.update_number,
        features = features.len(),
        warnings = warnings.len(),
        dropped_warnings = warnings.dropped,
        index = ?index.kind(),
        "parsed chart"
    );

    Ok(ParsedChart {
        metadata,
        features,
        bounds,
        index,
        warnings,
        applied_updates,
    })
}

impl ParsedChart {
    /// Chart metadata, reflecting the last applied update.
    #[must_use]
    pub fn metadata(&self) -> &ChartMetadata {
        &self.metadata
    }

    /// Every feature, in record order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The feature with a record id.
    #[must_use]
    pub fn feature(&self, record_id: u32) -> Option<&Feature> {
        self.features.iter().find(|f| f.record_id == record_id)
    }

    /// Bounding box of all features, `None` for a chart without features.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Warnings collected during the parse.
    #[must_use]
    pub fn warnings(&self) -> &WarningReport {
        &self.warnings
    }

    /// Update numbers applied on top of the base cell, in order.
    #[must_use]
    pub fn applied_updates(&self) -> &[u32] {
        &self.applied_updates
    }

    /// The spatial index.
    #[must_use]
    pub fn index(&self) -> &ChartIndex {
        &self.index
    }

    /// Which index implementation was built.
    #[must_use]
    pub fn index_kind(&self) -> IndexKind {
        self.index.kind()
    }

    fn resolve(&self, positions: Vec<usize>) -> Vec<&Feature> {
        positions.into_iter().filter_map(|i| self.features.get(i)).collect()
    }

    /// Features whose bounds intersect `bounds`.
    #[must_use]
    pub fn query_bounds(&self, bounds: &Bounds) -> Vec<&Feature> {
        self.resolve(self.index.query_bounds(bounds))
    }

    /// Features within `radius_nm` nautical miles of a position.
    #[must_use]
    pub fn query_point(&self, lat: f64, lon: f64, radius_nm: f64) -> Vec<&Feature> {
        self.resolve(self.index.query_point(Coordinate::new(lat, lon), radius_nm))
    }

    /// Features of any of `types`, optionally within `bounds`.
    #[must_use]
    pub fn query_by_type(&self, types: &[FeatureType], bounds: Option<&Bounds>) -> Vec<&Feature> {
        self.resolve(self.index.query_by_type(types, bounds))
    }

    /// Features matching every criterion of a query.
    #[must_use]
    pub fn find_features(&self, query: &FeatureQuery) -> Vec<&Feature> {
        let candidates = match (&query.types, &query.bounds) {
            (Some(types), bounds) => self.index.query_by_type(types, bounds.as_ref()),
            (None, Some(bounds)) => self.index.query_bounds(bounds),
            (None, None) => (0..self.features.len()).collect(),
        };
        self.resolve(candidates)
            .into_iter()
            .filter(|f| query.matches_text(f))
            .collect()
    }

    /// Feature count per object class acronym.
    #[must_use]
    pub fn summary(&self) -> BTreeMap<String, usize> {
        let mut summary = BTreeMap::new();
        for feature in &self.features {
            *summary.entry(feature.feature_type.acronym().into_owned()).or_insert(0) += 1;
        }
        summary
    }

    /// Whether the chart can be used for navigation.
    #[must_use]
    pub fn usability(&self) -> Usability {
        if self.features.is_empty() {
            Usability::Unusable
        } else if self.warnings.is_empty() {
            Usability::Usable
        } else {
            Usability::UsableWithCaveats
        }
    }

    /// Number of retained warnings with error severity.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.warnings.count_severity(Severity::Error)
    }
}

/// Criteria for [`ParsedChart::find_features`]. Unset criteria match everything.
///
/// # Examples
///
/// ```
/// use s57chart::chart::FeatureQuery;
/// use s57chart::feature::Bounds;
///
/// let query = FeatureQuery::new()
///     .types(["LIGHTS", "BOYLAT"])
///     .bounds(Bounds::new(42.0, -71.1, 42.4, -70.8))
///     .text("harbor");
/// # let _ = query;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureQuery {
    types: Option<Vec<FeatureType>>,
    bounds: Option<Bounds>,
    text: Option<String>,
    pattern: Option<Regex>,
}

impl FeatureQuery {
    /// A query matching every feature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to object classes by acronym. Unknown acronyms match nothing.
    #[must_use]
    pub fn types<I, S>(self, acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types = acronyms
            .into_iter()
            .filter_map(|a| ObjectClass::from_acronym(a.as_ref()))
            .collect::<Vec<_>>();
        self.feature_types(types)
    }

    /// Restrict to object classes.
    #[must_use]
    pub fn feature_types(mut self, types: impl IntoIterator<Item = FeatureType>) -> Self {
        self.types.get_or_insert_with(Vec::new).extend(types);
        self
    }

    /// Restrict to features whose bounds intersect a rectangle.
    #[must_use]
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Case-insensitive substring over the acronym and the name attributes
    /// (`OBJNAM`, `NOBJNM`, `INFORM`, `NINFOM`).
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into().to_lowercase());
        self
    }

    /// Regular expression over the same fields as [`text`](Self::text).
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::InvalidConfig`] for an invalid expression.
    pub fn pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ChartError::InvalidConfig(format!("invalid feature pattern: {e}")))?;
        self.pattern = Some(regex);
        Ok(self)
    }

    fn matches_text(&self, feature: &Feature) -> bool {
        if self.text.is_none() && self.pattern.is_none() {
            return true;
        }
        let acronym = feature.feature_type.acronym();
        let haystacks = std::iter::once(acronym.as_ref()).chain(
            feature
                .attributes
                .iter()
                .filter(|(code, _)| code.is_name())
                .filter_map(|(_, value)| value.as_str()),
        );
        let mut text_ok = self.text.is_none();
        let mut pattern_ok = self.pattern.is_none();
        for haystack in haystacks {
            if let Some(text) = &self.text {
                text_ok |= haystack.to_lowercase().contains(text.as_str());
            }
            if let Some(pattern) = &self.pattern {
                pattern_ok |= pattern.is_match(haystack);
            }
        }
        text_ok && pattern_ok
    }
}
