//! Flattening of aggregate rows into the export table.

use serde::Serialize;

use crate::analyzers::types::AggregateRow;
use crate::analyzers::utility::round2;

/// Column names of [`SummaryRow`], in serialization order.
pub const SUMMARY_FIELDS: [&str; 9] = [
    "airline",
    "total_flights",
    "avg_delay",
    "median_delay",
    "max_delay",
    "min_delay",
    "std_delay",
    "on_time_pct",
    "delayed_pct",
];

/// One exported line. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub airline: String,
    pub total_flights: usize,
    pub avg_delay: f64,
    pub median_delay: f64,
    pub max_delay: f64,
    pub min_delay: f64,
    pub std_delay: Option<f64>,
    pub on_time_pct: f64,
    pub delayed_pct: f64,
}

impl From<&AggregateRow> for SummaryRow {
    fn from(r: &AggregateRow) -> Self {
        SummaryRow {
            airline: r.airline.clone(),
            total_flights: r.count,
            avg_delay: round2(r.mean),
            median_delay: round2(r.median),
            max_delay: round2(r.max),
            min_delay: round2(r.min),
            std_delay: r.std_dev.map(round2),
            on_time_pct: round2(r.on_time_pct),
            delayed_pct: round2(r.delayed_pct),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn columns(&self) -> &'static [&'static str] {
        &SUMMARY_FIELDS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the export table, preserving row order.
pub fn to_table(rows: &[AggregateRow]) -> SummaryTable {
    SummaryTable {
        rows: rows.iter().map(SummaryRow::from).collect(),
    }
}
