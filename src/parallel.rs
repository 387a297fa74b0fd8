//! Parsing several independent charts in parallel using Rayon.
//!
//! Each chart is one task on Rayon's work-stealing pool with its own
//! warning collector. A single chart is never split across threads, so the
//! result for every chart is identical to calling
//! [`parse_chart`](crate::chart::parse_chart) on it alone.
//!
//! # Examples
//!
//! ```no_run
//! use s57chart::options::ParseOptions;
//! use s57chart::parallel::{parse_charts_parallel, ChartInput};
//!
//! let a = std::fs::read("US5MA22M.000")?;
//! let b = std::fs::read("US5MA23M.000")?;
//! let b1 = std::fs::read("US5MA23M.001")?;
//! let inputs = [ChartInput::new(&a), ChartInput::new(&b).with_updates(vec![b1.as_slice()])];
//!
//! for result in parse_charts_parallel(&inputs, &ParseOptions::default()) {
//!     match result {
//!         Ok(chart) => println!("{} features", chart.features().len()),
//!         Err(e) => eprintln!("chart failed: {e}"),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::chart::{parse_chart, ParsedChart};
use crate::error::Result;
use crate::options::ParseOptions;
use rayon::prelude::*;

/// The buffers of one chart: a base cell and its ordered updates.
#[derive(Debug, Clone, Default)]
pub struct ChartInput<'a> {
    /// Base cell (`.000`)
    pub base: &'a [u8],
    /// Updates in ascending order
    pub updates: Vec<&'a [u8]>,
}

impl<'a> ChartInput<'a> {
    /// A base cell without updates.
    #[must_use]
    pub fn new(base: &'a [u8]) -> Self {
        ChartInput {
            base,
            updates: Vec::new(),
        }
    }

    /// Attach ordered update buffers.
    #[must_use]
    pub fn with_updates(mut self, updates: Vec<&'a [u8]>) -> Self {
        self.updates = updates;
        self
    }
}

/// Parse every chart on Rayon's pool.
///
/// Results are returned in input order; one failing chart does not affect
/// the others.
#[must_use]
pub fn parse_charts_parallel(inputs: &[ChartInput<'_>], options: &ParseOptions) -> Vec<Result<ParsedChart>> {
    tracing::debug!(charts = inputs.len(), "parsing charts in parallel");
    inputs
        .par_iter()
        .map(|input| parse_chart(input.base, &input.updates, options))
        .collect()
}
