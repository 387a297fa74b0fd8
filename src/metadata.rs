//! Chart-level metadata and scale factors.
//!
//! [`ChartMetadata`] combines the dataset identification (`DSID`) and the
//! dataset parameters (`DSPM`). The parameters are authoritative: a default
//! only replaces a value that is absent (or zero) in `DSPM`, and every
//! defaulted scale factor is reported with a `SCALE_DEFAULTED` warning so a
//! silent substitution is never possible.

use crate::error::Result;
use crate::record::{DatasetIdentification, DatasetParameters};
use crate::warning::{Severity, WarningCode, WarningCollector};
use serde::{Deserialize, Serialize};

/// Coordinate multiplication factor used when `DSPM` has none.
pub const DEFAULT_COMF: f64 = 10_000_000.0;
/// Sounding multiplication factor used when `DSPM` has none.
pub const DEFAULT_SOMF: f64 = 10.0;

/// Navigational purpose of a cell (`INTU`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageBand {
    /// 1
    Overview,
    /// 2
    General,
    /// 3
    Coastal,
    /// 4
    Approach,
    /// 5
    Harbour,
    /// 6
    Berthing,
    /// Any other code
    Unknown(u8),
}

impl UsageBand {
    /// Decode an `INTU` code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => UsageBand::Overview,
            2 => UsageBand::General,
            3 => UsageBand::Coastal,
            4 => UsageBand::Approach,
            5 => UsageBand::Harbour,
            6 => UsageBand::Berthing,
            other => UsageBand::Unknown(other),
        }
    }
}

/// Horizontal geodetic datum (`HDAT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HorizontalDatum {
    /// 2: WGS 84
    #[default]
    Wgs84,
    /// 1: WGS 72
    Wgs72,
    /// Any other code
    Other(u8),
}

impl HorizontalDatum {
    /// Decode an `HDAT` code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            2 => HorizontalDatum::Wgs84,
            1 => HorizontalDatum::Wgs72,
            other => HorizontalDatum::Other(other),
        }
    }
}

/// Vertical or sounding datum (`VDAT`, `SDAT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerticalDatum {
    /// 1: mean low water springs
    MeanLowWaterSprings,
    /// 3: mean sea level
    MeanSeaLevel,
    /// 5: mean low water
    MeanLowWater,
    /// 12: mean lower low water
    #[default]
    MeanLowerLowWater,
    /// 16: mean high water
    MeanHighWater,
    /// 17: mean high water springs
    MeanHighWaterSprings,
    /// 23: lowest astronomical tide
    LowestAstronomicalTide,
    /// Any other code
    Other(u8),
}

impl VerticalDatum {
    /// Decode a `VDAT`/`SDAT` code.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => VerticalDatum::MeanLowWaterSprings,
            3 => VerticalDatum::MeanSeaLevel,
            5 => VerticalDatum::MeanLowWater,
            12 => VerticalDatum::MeanLowerLowWater,
            16 => VerticalDatum::MeanHighWater,
            17 => VerticalDatum::MeanHighWaterSprings,
            23 => VerticalDatum::LowestAstronomicalTide,
            other => VerticalDatum::Other(other),
        }
    }
}

/// Metadata of a parsed chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMetadata {
    /// Producing agency code (`AGEN`)
    pub producer: u16,
    /// Cell name without extension, e.g. `US5MA22M`
    pub cell_id: String,
    /// Edition number
    pub edition: u32,
    /// Last applied update number (0 for a base cell)
    pub update_number: u32,
    /// Issue date (`YYYYMMDD`)
    pub issue_date: String,
    /// Update application date (`YYYYMMDD`)
    pub update_date: String,
    /// Navigational purpose
    pub usage_band: UsageBand,
    /// Compilation scale denominator
    pub compilation_scale: Option<u32>,
    /// Horizontal datum
    pub horizontal_datum: HorizontalDatum,
    /// Vertical datum
    pub vertical_datum: VerticalDatum,
    /// Sounding datum
    pub sounding_datum: VerticalDatum,
    /// Coordinate multiplication factor
    pub comf: f64,
    /// Sounding multiplication factor
    pub somf: f64,
}

impl ChartMetadata {
    /// Build metadata from a cell's identification and parameters.
    ///
    /// # Errors
    ///
    /// Only returns an error when the collector promotes a warning in strict mode.
    pub fn from_records(
        identification: &DatasetIdentification,
        parameters: Option<&DatasetParameters>,
        warnings: &mut WarningCollector,
    ) -> Result<Self> {
        let (comf, somf) = match parameters {
            None => {
                warnings.push(
                    Severity::Warning,
                    WarningCode::ScaleDefaulted,
                    format!(
                        "no DSPM record, using COMF {DEFAULT_COMF} and SOMF {DEFAULT_SOMF}"
                    ),
                )?;
                (DEFAULT_COMF, DEFAULT_SOMF)
            },
            Some(p) => {
                let comf = match p.comf {
                    Some(v) => f64::from(v),
                    None => {
                        warnings.push(
                            Severity::Warning,
                            WarningCode::ScaleDefaulted,
                            format!("DSPM has no COMF, using {DEFAULT_COMF}"),
                        )?;
                        DEFAULT_COMF
                    },
                };
                let somf = match p.somf {
                    Some(v) => f64::from(v),
                    None => {
                        warnings.push(
                            Severity::Warning,
                            WarningCode::ScaleDefaulted,
                            format!("DSPM has no SOMF, using {DEFAULT_SOMF}"),
                        )?;
                        DEFAULT_SOMF
                    },
                };
                (comf, somf)
            },
        };

        let params = parameters.copied().unwrap_or_default();
        let vertical_datum = params.vdat.map(VerticalDatum::from_code).unwrap_or_default();
        Ok(ChartMetadata {
            producer: identification.agency,
            cell_id: identification.cell_name().to_string(),
            edition: identification.edition.trim().parse().unwrap_or(0),
            update_number: identification.update_number().unwrap_or(0),
            issue_date: identification.issue_date.clone(),
            update_date: identification.update_date.clone(),
            usage_band: UsageBand::from_code(identification.intended_usage),
            compilation_scale: params.cscl,
            horizontal_datum: params.hdat.map(HorizontalDatum::from_code).unwrap_or_default(),
            vertical_datum,
            sounding_datum: params.sdat.map_or(vertical_datum, VerticalDatum::from_code),
            comf,
            somf,
        })
    }

    /// Descale a raw coordinate.
    #[must_use]
    pub fn coordinate(&self, raw: i32) -> f64 {
        f64::from(raw) / self.comf
    }

    /// Descale a raw depth.
    #[must_use]
    pub fn depth(&self, raw: f64) -> f64 {
        raw / self.somf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::RecoveryMode;

    fn identification() -> DatasetIdentification {
        DatasetIdentification {
            dataset_name: "US5MA22M.000".to_string(),
            edition: "4".to_string(),
            update: "0".to_string(),
            intended_usage: 5,
            agency: 550,
            ..DatasetIdentification::default()
        }
    }

    #[test]
    fn test_defaults_without_dspm() {
        let mut w = WarningCollector::new(RecoveryMode::Permissive, 10);
        let m = ChartMetadata::from_records(&identification(), None, &mut w).unwrap();
        assert_eq!(m.cell_id, "US5MA22M");
        assert_eq!(m.edition, 4);
        assert_eq!(m.usage_band, UsageBand::Harbour);
        assert!((m.comf - DEFAULT_COMF).abs() < f64::EPSILON);
        assert!((m.somf - DEFAULT_SOMF).abs() < f64::EPSILON);
        assert_eq!(m.horizontal_datum, HorizontalDatum::Wgs84);
        assert_eq!(m.sounding_datum, VerticalDatum::MeanLowerLowWater);
        assert_eq!(w.count(WarningCode::ScaleDefaulted), 1);
    }

    #[test]
    fn test_dspm_is_authoritative() {
        let params = DatasetParameters {
            hdat: Some(2),
            vdat: Some(3),
            sdat: Some(23),
            cscl: Some(20_000),
            comf: Some(1_000_000),
            somf: None,
        };
        let mut w = WarningCollector::new(RecoveryMode::Permissive, 10);
        let m = ChartMetadata::from_records(&identification(), Some(&params), &mut w).unwrap();
        assert!((m.comf - 1_000_000.0).abs() < f64::EPSILON);
        assert!((m.somf - DEFAULT_SOMF).abs() < f64::EPSILON);
        assert_eq!(m.vertical_datum, VerticalDatum::MeanSeaLevel);
        assert_eq!(m.sounding_datum, VerticalDatum::LowestAstronomicalTide);
        assert_eq!(m.compilation_scale, Some(20_000));
        assert_eq!(w.count(WarningCode::ScaleDefaulted), 1);
        assert!(w.warnings()[0].message.contains("SOMF"));
    }

    #[test]
    fn test_descaling() {
        let mut w = WarningCollector::new(RecoveryMode::Permissive, 10);
        let m = ChartMetadata::from_records(&identification(), None, &mut w).unwrap();
        assert!((m.coordinate(423_456_789) - 42.345_678_9).abs() < 1e-12);
        assert!((m.depth(5.0) - 0.5).abs() < f64::EPSILON);
    }
}
