use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::analyzers::types::PivotMatrix;
use crate::analyzers::utility::mean;
use crate::record::FlightRecord;

/// Mean delay per (origin, airline) as a dense matrix for heatmap consumers.
///
/// Records without an origin are skipped. Label sets come from the data.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn aggregate_by_airline_and_origin(records: &[FlightRecord]) -> PivotMatrix {
    let mut cells: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    let mut airlines: BTreeSet<&str> = BTreeSet::new();

    for r in records {
        let Some(origin) = r.origin.as_deref() else {
            continue;
        };
        airlines.insert(r.airline.as_str());
        cells
            .entry((origin, r.airline.as_str()))
            .or_default()
            .push(r.delay_minutes);
    }

    if cells.is_empty() {
        warn!("Pivot requested on a dataset with no origin airports");
        return PivotMatrix::default();
    }

    let origins: BTreeSet<&str> = cells.keys().map(|(o, _)| *o).collect();

    let mut mean_delay = Vec::with_capacity(origins.len());
    let mut counts = Vec::with_capacity(origins.len());
    for origin in &origins {
        let (row_means, row_counts): (Vec<f64>, Vec<usize>) = airlines
            .iter()
            .map(|airline| match cells.get(&(*origin, *airline)) {
                Some(delays) => (mean(delays), delays.len()),
                None => (PivotMatrix::FILL_VALUE, 0),
            })
            .unzip();
        mean_delay.push(row_means);
        counts.push(row_counts);
    }

    PivotMatrix {
        origins: origins.into_iter().map(str::to_string).collect(),
        airlines: airlines.into_iter().map(str::to_string).collect(),
        mean_delay,
        counts,
    }
}
