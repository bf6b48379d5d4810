//! Data types produced by the aggregation stage.

use serde::Serialize;

use crate::analyzers::category::CategoryBreakdown;

/// Delay statistics for one airline.
///
/// `on_time_pct` and `delayed_pct` split the group by delay value alone, so
/// they sum to 100 for any non-empty group. Cancelled flights stay in that
/// split and are also counted in `cancelled`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub airline: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` for a single-flight group.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub p90: f64,
    pub on_time_pct: f64,
    pub delayed_pct: f64,
    pub cancelled: usize,
    pub categories: CategoryBreakdown,
}

/// Mean delay by (origin, airline), dense over every label pair.
///
/// Row labels are origins and column labels are airlines, both sorted.
/// Pairs with no flights hold [`PivotMatrix::FILL_VALUE`] in `mean_delay`
/// and 0 in `counts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PivotMatrix {
    pub origins: Vec<String>,
    pub airlines: Vec<String>,
    pub mean_delay: Vec<Vec<f64>>,
    pub counts: Vec<Vec<usize>>,
}

impl PivotMatrix {
    pub const FILL_VALUE: f64 = 0.0;

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Mean delay for a pair, or `None` if either label is unknown.
    pub fn get(&self, origin: &str, airline: &str) -> Option<f64> {
        let (r, c) = self.position(origin, airline)?;
        Some(self.mean_delay[r][c])
    }

    pub fn count(&self, origin: &str, airline: &str) -> Option<usize> {
        let (r, c) = self.position(origin, airline)?;
        Some(self.counts[r][c])
    }

    fn position(&self, origin: &str, airline: &str) -> Option<(usize, usize)> {
        let r = self.origins.iter().position(|o| o == origin)?;
        let c = self.airlines.iter().position(|a| a == airline)?;
        Some((r, c))
    }
}

/// Whole-dataset overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub airlines: Vec<String>,
    pub airports: Vec<String>,
    pub mean_delay: f64,
    pub median_delay: f64,
    pub max_delay: f64,
    pub on_time: usize,
    pub on_time_pct: f64,
    pub delayed: usize,
    pub delayed_pct: f64,
    pub cancelled: usize,
}

/// One equal-width histogram bucket, `[lower, upper)` except the last which is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}
