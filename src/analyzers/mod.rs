//! Grouped delay statistics over cleaned flight records.
//!
//! This module groups records by airline (and by origin × airline for the
//! pivot), computes descriptive statistics and delay bands, and produces the
//! in-memory structures handed to rendering and export.

pub mod aggregate;
pub mod category;
pub mod pivot;
pub mod summary;
pub mod types;
pub mod utility;

pub use aggregate::aggregate_by_airline;
pub use category::{CategoryBreakdown, DelayCategory};
pub use pivot::aggregate_by_airline_and_origin;
pub use summary::{delay_histogram, delay_histogram_by_airline, summarize};
pub use types::{AggregateRow, DatasetSummary, HistogramBin, PivotMatrix};
