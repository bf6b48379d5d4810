//! The loaded dataset and the stages run against it.
//!
//! A [`Pipeline`] is created by loading a source file. Loading cleans the rows
//! immediately; the cleaned records are read-only afterwards and a reload
//! replaces the whole context. Downstream stages take a record slice and
//! return their result paired with a [`StageReport`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::analyzers::{
    AggregateRow, DatasetSummary, HistogramBin, PivotMatrix, aggregate_by_airline,
    aggregate_by_airline_and_origin, delay_histogram, delay_histogram_by_airline, summarize,
};
use crate::cleaner::{CleaningReport, clean};
use crate::error::Result;
use crate::export::{SummaryTable, to_table};
use crate::filter::FilterCriteria;
use crate::loader::{self, RecordStore};
use crate::record::FlightRecord;
use crate::report::{Stage, StageReport, Staged};

#[derive(Debug, Clone)]
pub struct Pipeline {
    source: PathBuf,
    store: RecordStore,
    records: Vec<FlightRecord>,
    cleaning: CleaningReport,
    reports: Vec<StageReport>,
}

impl Pipeline {
    /// Loads and cleans the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, unreadable, or lacks required columns.
    pub fn load(path: &Path) -> Result<Self> {
        let started = Utc::now();
        let store = loader::load(path)?;

        Ok(Self::from_store(path.to_path_buf(), store, started))
    }

    fn from_store(source: PathBuf, store: RecordStore, started: DateTime<Utc>) -> Self {
        let load_report = StageReport::new(Stage::Load, started, 0, store.len())
            .with_message(format!("source={}", store.source))
            .with_message(format!("unreadable_rows={}", store.unreadable_rows));

        let started = Utc::now();
        let (records, cleaning) = clean(store.records());
        let clean_report =
            StageReport::new(Stage::Clean, started, cleaning.input_rows, records.len())
                .with_message(format!("duplicates={}", cleaning.duplicates))
                .with_message(format!("missing_fields={}", cleaning.missing_fields))
                .with_message(format!("non_numeric_delay={}", cleaning.non_numeric_delay))
                .with_message(format!("negative_delay={}", cleaning.negative_delay))
                .with_message(format!("same_endpoints={}", cleaning.same_endpoints));

        Pipeline {
            source,
            store,
            records,
            cleaning,
            reports: vec![load_report, clean_report],
        }
    }

    /// Re-reads the source file. On failure the current data is kept.
    pub fn reload(&mut self) -> Result<()> {
        let fresh = Self::load(&self.source)?;
        info!(
            source = %self.source.display(),
            previous = self.records.len(),
            current = fresh.records.len(),
            "Dataset reloaded"
        );
        *self = fresh;
        Ok(())
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Cleaned records in input order.
    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn cleaning_report(&self) -> &CleaningReport {
        &self.cleaning
    }

    /// Reports for the load and clean stages.
    pub fn stage_reports(&self) -> &[StageReport] {
        &self.reports
    }

    /// A filtered copy of the cleaned records.
    pub fn view(&self, criteria: &FilterCriteria) -> Staged<Vec<FlightRecord>> {
        run_filter(&self.records, criteria)
    }
}

pub fn run_filter(
    records: &[FlightRecord],
    criteria: &FilterCriteria,
) -> Staged<Vec<FlightRecord>> {
    let started = Utc::now();
    let out = criteria.apply(records);

    let mut report = StageReport::new(Stage::Filter, started, records.len(), out.len());
    if let Some(airline) = &criteria.airline {
        report = report.with_message(format!("airline={airline}"));
    }
    if let Some(airport) = &criteria.airport {
        report = report.with_message(format!("airport={airport}"));
    }

    Staged::new(out, report)
}

pub fn run_aggregate(records: &[FlightRecord]) -> Staged<Vec<AggregateRow>> {
    let started = Utc::now();
    let rows = aggregate_by_airline(records);
    let report = empty_note(
        StageReport::new(Stage::Aggregate, started, records.len(), rows.len()),
        records,
    );

    Staged::new(rows, report)
}

pub fn run_pivot(records: &[FlightRecord]) -> Staged<PivotMatrix> {
    let started = Utc::now();
    let matrix = aggregate_by_airline_and_origin(records);
    let report = StageReport::new(Stage::Pivot, started, records.len(), matrix.origins.len())
        .with_message(format!("origins={}", matrix.origins.len()))
        .with_message(format!("airlines={}", matrix.airlines.len()))
        .with_message(format!("fill_value={}", PivotMatrix::FILL_VALUE));

    Staged::new(matrix, report)
}

pub fn run_summary(records: &[FlightRecord]) -> Staged<Option<DatasetSummary>> {
    let started = Utc::now();
    let summary = summarize(records);
    let report = empty_note(
        StageReport::new(Stage::Summary, started, records.len(), summary.is_some() as usize),
        records,
    );

    Staged::new(summary, report)
}

pub fn run_histogram(records: &[FlightRecord], bins: usize) -> Staged<Vec<HistogramBin>> {
    let started = Utc::now();
    let out = delay_histogram(records, bins);
    let report = empty_note(
        StageReport::new(Stage::Distribution, started, records.len(), out.len())
            .with_message(format!("bins={bins}")),
        records,
    );

    Staged::new(out, report)
}

/// Per-airline histograms over the dataset's shared delay range.
pub fn run_distribution(
    records: &[FlightRecord],
    bins: usize,
) -> Staged<Vec<(String, Vec<HistogramBin>)>> {
    let started = Utc::now();
    let out = delay_histogram_by_airline(records, bins);
    let report = empty_note(
        StageReport::new(Stage::Distribution, started, records.len(), out.len())
            .with_message(format!("bins={bins}"))
            .with_message("by=airline"),
        records,
    );

    Staged::new(out, report)
}

pub fn run_export(rows: &[AggregateRow]) -> Staged<SummaryTable> {
    let started = Utc::now();
    let table = to_table(rows);
    let report = StageReport::new(Stage::Export, started, rows.len(), table.len());

    Staged::new(table, report)
}

fn empty_note(report: StageReport, records: &[FlightRecord]) -> StageReport {
    if records.is_empty() {
        report.with_message("empty dataset")
    } else {
        report
    }
}
