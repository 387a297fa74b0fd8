//! CSV export of features.
//!
//! One row per feature with the columns
//! `record_id, type, geometry, vertices, min_lat, min_lon, max_lat, max_lon, attributes`.
//! Attributes are a `KEY=value;` list in record order, suitable for
//! spreadsheets and quick inspection.
//!
//! # Examples
//!
//! ```ignore
//! use s57chart::csv;
//!
//! let text = csv::features_to_csv(chart.features())?;
//! println!("{text}");
//! ```

use crate::error::Result;
use crate::feature::Feature;
use std::io::Write;

const HEADER: [&str; 9] = [
    "record_id",
    "type",
    "geometry",
    "vertices",
    "min_lat",
    "min_lon",
    "max_lat",
    "max_lon",
    "attributes",
];

/// Write features as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_features<W: Write>(features: &[Feature], writer: W) -> Result<()> {
    let mut out = ::csv::Writer::from_writer(writer);
    out.write_record(HEADER)?;
    for feature in features {
        let attributes = feature
            .attributes
            .iter()
            .fold(String::new(), |mut acc, (code, value)| {
                acc.push_str(&code.acronym());
                acc.push('=');
                acc.push_str(&value.to_string());
                acc.push(';');
                acc
            });
        let b = feature.bounds;
        out.write_record([
            feature.record_id.to_string(),
            feature.feature_type.acronym().into_owned(),
            feature.geometry_type.to_string(),
            feature.vertex_count().to_string(),
            b.min_lat.to_string(),
            b.min_lon.to_string(),
            b.max_lat.to_string(),
            b.max_lon.to_string(),
            attributes,
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Render features as a CSV string.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn features_to_csv(features: &[Feature]) -> Result<String> {
    let mut buffer = Vec::new();
    write_features(features, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
