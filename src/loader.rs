//! CSV loader producing the in-memory [`RecordStore`].

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::record::{REQUIRED_COLUMNS, RawRecord};

/// Rows of one loaded file, in input order.
#[derive(Debug, Clone)]
pub struct RecordStore {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub columns: Vec<String>,
    /// Rows skipped because a cell was not valid UTF-8.
    pub unreadable_rows: usize,
    records: Vec<RawRecord>,
}

impl RecordStore {
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Loads a flight CSV from disk.
///
/// # Errors
///
/// Returns [`PipelineError::SourceNotFound`] if `path` does not exist and
/// [`PipelineError::SchemaMismatch`] if required columns are missing.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<RecordStore> {
    if !path.exists() {
        return Err(PipelineError::SourceNotFound {
            path: path.display().to_string(),
        });
    }

    let file = std::fs::File::open(path)?;
    let store = from_reader(file, &path.display().to_string())?;

    info!(
        rows = store.len(),
        unreadable_rows = store.unreadable_rows,
        "Loaded flight records"
    );
    Ok(store)
}

/// Reads flight rows from any reader. `source` is recorded on the store.
///
/// Rows with a cell that is not valid UTF-8 are skipped and counted in
/// [`RecordStore::unreadable_rows`]; they never fail the load.
pub fn from_reader<R: Read>(reader: R, source: &str) -> Result<RecordStore> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let index = column_index(&columns)?;
    debug!(columns = ?columns, "CSV header accepted");

    let mut records = Vec::new();
    let mut unreadable_rows = 0;
    for (row_no, result) in rdr.byte_records().enumerate() {
        let row = result?;
        match raw_from_row(&row, &index) {
            Some(raw) => records.push(raw),
            None => {
                warn!(row = row_no, "Skipping row with non UTF-8 content");
                unreadable_rows += 1;
            }
        }
    }

    Ok(RecordStore {
        source: source.to_string(),
        loaded_at: Utc::now(),
        columns,
        unreadable_rows,
        records,
    })
}

/// Maps each required column to its position in the header.
fn column_index(columns: &[String]) -> Result<HashMap<&'static str, usize>> {
    let mut index = HashMap::new();
    let mut missing = Vec::new();

    for name in REQUIRED_COLUMNS {
        match columns.iter().position(|c| c == name) {
            Some(i) => {
                index.insert(name, i);
            }
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(PipelineError::SchemaMismatch {
            missing,
            found: columns.to_vec(),
        });
    }

    Ok(index)
}

/// Decodes one row, or `None` if any cell is not valid UTF-8.
fn raw_from_row(row: &ByteRecord, index: &HashMap<&'static str, usize>) -> Option<RawRecord> {
    if row.iter().any(|cell| std::str::from_utf8(cell).is_err()) {
        return None;
    }

    let cell = |name: &str| {
        index
            .get(name)
            .and_then(|&i| row.get(i))
            .and_then(|v| std::str::from_utf8(v).ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Some(RawRecord {
        flight_id: cell("flight_id"),
        airline: cell("airline"),
        origin: cell("origin"),
        destination: cell("destination"),
        departure_time: cell("departure_time"),
        arrival_time: cell("arrival_time"),
        delay_minutes: cell("delay_minutes"),
        status: cell("status"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "flight_id,airline,origin,destination,departure_time,arrival_time,delay_minutes,status";

    #[test]
    fn test_from_reader_reads_rows_in_order() {
        let data = format!(
            "{HEADER}\n\
             AI1,Air India,DEL,BOM,06:00,08:00,0,on-time\n\
             6E2,IndiGo,BLR,DEL,07:00,09:45,45,delayed\n"
        );
        let store = from_reader(data.as_bytes(), "inline").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.source, "inline");
        assert_eq!(store.records()[0].flight_id.as_deref(), Some("AI1"));
        assert_eq!(store.records()[1].delay_minutes.as_deref(), Some("45"));
    }

    #[test]
    fn test_column_order_is_not_significant() {
        let data = "status,delay_minutes,arrival_time,departure_time,\
                    destination,origin,airline,flight_id\n\
                    delayed,12,10:00,09:00,BOM,DEL,Vistara,UK7\n";
        let store = from_reader(data.as_bytes(), "inline").unwrap();

        let r = &store.records()[0];
        assert_eq!(r.flight_id.as_deref(), Some("UK7"));
        assert_eq!(r.airline.as_deref(), Some("Vistara"));
        assert_eq!(r.delay_minutes.as_deref(), Some("12"));
    }

    #[test]
    fn test_empty_cells_and_short_rows_become_none() {
        let data = format!("{HEADER}\nAI1,,DEL,BOM,06:00,08:00,,on-time\nAI2,Air India\n");
        let store = from_reader(data.as_bytes(), "inline").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].airline, None);
        assert_eq!(store.records()[0].delay_minutes, None);
        assert_eq!(store.records()[1].origin, None);
        assert_eq!(store.records()[1].status, None);
    }

    #[test]
    fn test_missing_columns_is_schema_mismatch() {
        let data = "flight_id,airline,delay_minutes\nAI1,Air India,5\n";
        let err = from_reader(data.as_bytes(), "inline").unwrap_err();

        match err {
            PipelineError::SchemaMismatch { missing, found } => {
                assert!(missing.contains(&"origin".to_string()));
                assert!(missing.contains(&"status".to_string()));
                assert!(!missing.contains(&"airline".to_string()));
                assert_eq!(found, vec!["flight_id", "airline", "delay_minutes"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_source_not_found() {
        let path = std::env::temp_dir().join("flight_delay_stats_does_not_exist.csv");
        let _ = std::fs::remove_file(&path);

        let err = load(&path).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    }

    #[test]
    fn test_non_utf8_row_is_skipped_and_counted() {
        let mut data = format!("{HEADER}\nAI1,Air India,DEL,BOM,06:00,08:00,0,on-time\n")
            .into_bytes();
        data.extend_from_slice(b"AI2,");
        data.extend_from_slice(&[0xFF, 0xFE]);
        data.extend_from_slice(b",BOM,DEL,09:00,11:00,5,delayed\n");
        data.extend_from_slice(b"AI3,Air India,DEL,BLR,10:00,12:30,20,delayed\n");

        let store = from_reader(data.as_slice(), "inline").unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.unreadable_rows, 1);
        assert_eq!(store.records()[0].flight_id.as_deref(), Some("AI1"));
        assert_eq!(store.records()[1].flight_id.as_deref(), Some("AI3"));
    }

    #[test]
    fn test_header_only_file_loads_empty_store() {
        let store = from_reader(format!("{HEADER}\n").as_bytes(), "inline").unwrap();
        assert!(store.is_empty());
    }
}
