//! Deduplication, validation and coercion of raw flight rows.
//!
//! Malformed rows are never an error. Each one is dropped and counted in the
//! [`CleaningReport`] under the first check it failed.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::record::{FlightRecord, FlightStatus, RawRecord, parse_time_of_day};

/// Upper bound on per-row rejection entries kept in a report.
pub const MAX_REJECTION_SAMPLES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    DuplicateFlightId,
    MissingField(&'static str),
    NonNumericDelay,
    NegativeDelay,
    SameEndpoints,
}

/// A single excluded row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejected {
    pub row: usize,
    pub flight_id: Option<String>,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub duplicates: usize,
    pub missing_fields: usize,
    pub non_numeric_delay: usize,
    pub negative_delay: usize,
    pub same_endpoints: usize,
    pub output_rows: usize,
    pub rejections: Vec<RowRejected>,
}

impl CleaningReport {
    pub fn total_removed(&self) -> usize {
        self.duplicates
            + self.missing_fields
            + self.non_numeric_delay
            + self.negative_delay
            + self.same_endpoints
    }

    fn reject(&mut self, row: usize, raw: &RawRecord, reason: RejectReason) {
        match reason {
            RejectReason::DuplicateFlightId => self.duplicates += 1,
            RejectReason::MissingField(_) => self.missing_fields += 1,
            RejectReason::NonNumericDelay => self.non_numeric_delay += 1,
            RejectReason::NegativeDelay => self.negative_delay += 1,
            RejectReason::SameEndpoints => self.same_endpoints += 1,
        }

        debug!(row, flight_id = ?raw.flight_id, ?reason, "Row rejected");

        if self.rejections.len() < MAX_REJECTION_SAMPLES {
            self.rejections.push(RowRejected {
                row,
                flight_id: raw.flight_id.clone(),
                reason,
            });
        }
    }
}

/// Cleans `records` into canonical [`FlightRecord`]s.
///
/// Checks run in this order: duplicate flight id (first occurrence wins),
/// required fields present, numeric delay, non-negative delay, distinct
/// origin and destination.
#[tracing::instrument(skip_all, fields(input_rows = records.len()))]
pub fn clean(records: &[RawRecord]) -> (Vec<FlightRecord>, CleaningReport) {
    let mut report = CleaningReport {
        input_rows: records.len(),
        ..Default::default()
    };
    let mut seen: HashSet<&str> = HashSet::new();
    let mut cleaned = Vec::with_capacity(records.len());

    for (row, raw) in records.iter().enumerate() {
        if let Some(id) = normalized_id(raw) {
            if !seen.insert(id) {
                report.reject(row, raw, RejectReason::DuplicateFlightId);
                continue;
            }
        }

        match validate(raw) {
            Ok(record) => cleaned.push(record),
            Err(reason) => report.reject(row, raw, reason),
        }
    }

    report.output_rows = cleaned.len();
    (cleaned, report)
}

/// Trimmed, non-empty flight id. Used for both deduplication and the stored field.
fn normalized_id(raw: &RawRecord) -> Option<&str> {
    raw.flight_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn validate(raw: &RawRecord) -> Result<FlightRecord, RejectReason> {
    let flight_id = normalized_id(raw).ok_or(RejectReason::MissingField("flight_id"))?;
    let airline = required(&raw.airline, "airline")?;
    let delay = required(&raw.delay_minutes, "delay_minutes")?;

    let delay_minutes = coerce_delay(delay)?;

    if let (Some(o), Some(d)) = (&raw.origin, &raw.destination) {
        if o == d {
            return Err(RejectReason::SameEndpoints);
        }
    }

    Ok(FlightRecord {
        flight_id: flight_id.to_string(),
        airline: airline.to_string(),
        origin: raw.origin.clone(),
        destination: raw.destination.clone(),
        departure: raw.departure_time.as_deref().and_then(parse_time_of_day),
        arrival: raw.arrival_time.as_deref().and_then(parse_time_of_day),
        delay_minutes,
        status: raw.status.as_deref().and_then(FlightStatus::parse),
    })
}

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, RejectReason> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(RejectReason::MissingField(field))
}

/// Parses a delay in minutes. NaN and infinities count as non-numeric.
fn coerce_delay(value: &str) -> Result<f64, RejectReason> {
    let delay: f64 = value
        .trim()
        .parse()
        .map_err(|_| RejectReason::NonNumericDelay)?;

    if !delay.is_finite() {
        return Err(RejectReason::NonNumericDelay);
    }
    if delay < 0.0 {
        return Err(RejectReason::NegativeDelay);
    }

    // folds -0 into 0
    Ok(delay + 0.0)
}
