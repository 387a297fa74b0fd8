#![warn(missing_docs)]

//! # s57chart: S-57 electronic navigational charts
//!
//! A library for parsing IHO S-57 ENC cells, encoded in the ISO/IEC 8211
//! binary container, into a queryable and spatially indexed feature model.
//!
//! ## Quick Start
//!
//! ```ignore
//! use s57chart::{parse_chart, FeatureQuery, ParseOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let base = std::fs::read("US5MA22M.000")?;
//! let update = std::fs::read("US5MA22M.001")?;
//! let chart = parse_chart(&base, &[update.as_slice()], &ParseOptions::default())?;
//!
//! println!("{} edition {}", chart.metadata().cell_id, chart.metadata().edition);
//! for light in chart.find_features(&FeatureQuery::new().types(["LIGHTS"])) {
//!     println!("light {} at {}", light.record_id, light.coordinates[0]);
//! }
//! for warning in chart.warnings().iter() {
//!     eprintln!("{warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Byte buffers are handed in and parsed data handed out; the library does
//! no file or network access of its own.
//!
//! ## Pipeline
//!
//! bytes → [`reader`] → [`coerce`] → [`record`] → [`catalog`] →
//! [`builder`] → [`update`] → [`index`] → [`chart::ParsedChart`]
//!
//! The [`warning`] collector is threaded through every stage. In permissive
//! mode (the default) data-quality problems are recorded and parsing
//! continues; in strict mode the first error-severity warning aborts.
//!
//! ## Modules
//!
//! - [`leader`] — ISO 8211 record leader (24-byte header)
//! - [`reader`] — Record Reader: logical records, directories and raw fields
//! - [`boundary_scanner`] — record start detection for resynchronisation
//! - [`recovery`] — strict and permissive recovery
//! - [`ddr`] — Data Descriptive Record
//! - [`schema`] — static S-57 field formats
//! - [`encoding`] — lexical levels 0, 1 and 2
//! - [`coerce`] — Field Coercion into typed values
//! - [`catalog`] — Catalog Resolver for object classes and attributes
//! - [`record`] — typed S-57 records
//! - [`cell`] — whole-cell decoding and record arenas
//! - [`metadata`] — chart metadata and scale factors
//! - [`feature`] — the feature model
//! - [`builder`] — Feature Builder
//! - [`update`] — Update Engine
//! - [`index`] — Spatial Index (linear scan and STR R-tree)
//! - [`chart`] — the parse pipeline and `ParsedChart`
//! - [`geojson`] / [`csv`] — exports
//! - [`parallel`] — parsing independent charts on Rayon's pool
//! - [`writer`] — ISO 8211 / S-57 cell encoder
//! - [`options`], [`warning`], [`error`] — configuration, warnings and errors

pub mod boundary_scanner;
pub mod builder;
pub mod catalog;
pub mod cell;
pub mod chart;
pub mod coerce;
pub mod csv;
pub mod ddr;
pub mod encoding;
pub mod error;
pub mod feature;
pub mod geojson;
pub mod index;
pub mod leader;
pub mod macros;
pub mod metadata;
pub mod options;
pub mod parallel;
pub mod reader;
pub mod record;
pub mod recovery;
pub mod schema;
pub mod update;
pub mod warning;
pub mod writer;

pub use catalog::{AttributeCode, AttributeType, ObjectClass};
pub use chart::{parse_chart, FeatureQuery, ParsedChart, Usability};
pub use coerce::CoercedValue;
pub use error::{ChartError, Result};
pub use feature::{Bounds, Coordinate, Feature, FeatureType, GeometryType};
pub use index::{IndexKind, LinearIndex, RTreeIndex, SpatialIndex};
pub use metadata::ChartMetadata;
pub use options::ParseOptions;
pub use parallel::{parse_charts_parallel, ChartInput};
pub use reader::{RawField, RawRecord, RecordReader};
pub use recovery::RecoveryMode;
pub use warning::{Severity, Warning, WarningCode, WarningReport};
pub use writer::{CellWriter, RecordFields};
