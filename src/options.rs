//! Parse configuration.

use crate::error::{ChartError, Result};
use crate::recovery::RecoveryMode;
use crate::warning::DEFAULT_WARNING_CAP;
use serde::{Deserialize, Serialize};

/// Feature count at which the R-tree replaces the linear scan.
pub const DEFAULT_INDEX_THRESHOLD: usize = 200;
/// Default R-tree fan-out.
pub const DEFAULT_MAX_NODE_ENTRIES: usize = 16;

/// Options for one parse.
///
/// # Examples
///
/// ```
/// use s57chart::options::ParseOptions;
/// use s57chart::recovery::RecoveryMode;
///
/// let options = ParseOptions::default()
///     .with_mode(RecoveryMode::Strict)
///     .with_warning_cap(50);
/// assert!(options.validate().is_ok());
///
/// let from_file = ParseOptions::from_json(r#"{"mode": "strict", "warning_cap": 50}"#)?;
/// assert_eq!(from_file, options);
/// # Ok::<(), s57chart::error::ChartError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Strict or permissive handling of error-severity warnings
    pub mode: RecoveryMode,
    /// Maximum number of retained warnings
    pub warning_cap: usize,
    /// Feature count at which an R-tree is built instead of a linear scan
    pub index_threshold: usize,
    /// Maximum entries per R-tree node
    pub max_node_entries: usize,
    /// Plausible depth range in metres, inclusive
    pub depth_range: (f64, f64),
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: RecoveryMode::Permissive,
            warning_cap: DEFAULT_WARNING_CAP,
            index_threshold: DEFAULT_INDEX_THRESHOLD,
            max_node_entries: DEFAULT_MAX_NODE_ENTRIES,
            depth_range: (-50.0, 12_000.0),
        }
    }
}

impl ParseOptions {
    /// Default options in strict mode.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().with_mode(RecoveryMode::Strict)
    }

    /// Set the recovery mode.
    #[must_use]
    pub fn with_mode(mut self, mode: RecoveryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the warning cap.
    #[must_use]
    pub fn with_warning_cap(mut self, cap: usize) -> Self {
        self.warning_cap = cap;
        self
    }

    /// Set the R-tree threshold. 0 always builds an R-tree, `usize::MAX` never does.
    #[must_use]
    pub fn with_index_threshold(mut self, threshold: usize) -> Self {
        self.index_threshold = threshold;
        self
    }

    /// Set the R-tree fan-out.
    #[must_use]
    pub fn with_max_node_entries(mut self, entries: usize) -> Self {
        self.max_node_entries = entries;
        self
    }

    /// Set the plausible depth range.
    #[must_use]
    pub fn with_depth_range(mut self, min: f64, max: f64) -> Self {
        self.depth_range = (min, max);
        self
    }

    /// Check the options for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::InvalidConfig`] for a fan-out below 2 or an
    /// empty or non-finite depth range.
    pub fn validate(&self) -> Result<()> {
        if self.max_node_entries < 2 {
            return Err(ChartError::InvalidConfig(format!(
                "max_node_entries must be at least 2, got {}",
                self.max_node_entries
            )));
        }
        let (min, max) = self.depth_range;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ChartError::InvalidConfig(format!(
                "depth_range ({min}, {max}) is not a valid range"
            )));
        }
        Ok(())
    }

    /// Read options from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or options that fail [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let options: ParseOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Whether a depth lies in the plausible range.
    #[must_use]
    pub fn depth_in_range(&self, depth: f64) -> bool {
        depth >= self.depth_range.0 && depth <= self.depth_range.1
    }
}
