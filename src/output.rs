//! Output formatting and persistence for aggregate results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::PivotMatrix;
use crate::export::{SUMMARY_FIELDS, SummaryTable};
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a [`SummaryTable`] to `path`, replacing any existing file.
///
/// The header row is always written, even for an empty table.
pub fn write_summary_csv(path: &Path, table: &SummaryTable) -> Result<()> {
    debug!(path = %path.display(), rows = table.len(), "Writing summary CSV");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(SUMMARY_FIELDS)?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a [`PivotMatrix`] as `origin,<airline>...` rows of mean delay.
pub fn write_pivot_csv(path: &Path, matrix: &PivotMatrix) -> Result<()> {
    debug!(path = %path.display(), origins = matrix.origins.len(), "Writing pivot CSV");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(file);

    let mut header = vec!["origin".to_string()];
    header.extend(matrix.airlines.iter().cloned());
    writer.write_record(&header)?;

    for (origin, values) in matrix.origins.iter().zip(&matrix.mean_delay) {
        let mut record = vec![origin.clone()];
        record.extend(values.iter().map(|v| format!("{v:.2}")));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}
