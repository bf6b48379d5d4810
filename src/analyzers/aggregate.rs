use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::analyzers::category::CategoryBreakdown;
use crate::analyzers::types::AggregateRow;
use crate::analyzers::utility::{mean, median, pct, percentile, sample_stddev, sorted};
use crate::record::FlightRecord;

/// Groups `records` by airline and computes one [`AggregateRow`] per group.
///
/// Rows are ordered by mean delay descending, then airline name ascending.
/// Empty input gives an empty result.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn aggregate_by_airline(records: &[FlightRecord]) -> Vec<AggregateRow> {
    if records.is_empty() {
        warn!("Aggregation requested on an empty dataset");
        return Vec::new();
    }

    let mut groups: BTreeMap<&str, Vec<&FlightRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.airline.as_str()).or_default().push(r);
    }

    let mut rows: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(airline, group)| aggregate_group(airline, &group))
        .collect();

    rows.sort_by(|a, b| {
        b.mean
            .total_cmp(&a.mean)
            .then_with(|| a.airline.cmp(&b.airline))
    });

    debug!(groups = rows.len(), "Airline aggregation complete");
    rows
}

/// Statistics for one non-empty group.
pub fn aggregate_group(airline: &str, group: &[&FlightRecord]) -> AggregateRow {
    let delays: Vec<f64> = group.iter().map(|r| r.delay_minutes).collect();
    let ordered = sorted(&delays);
    let count = delays.len();
    let avg = mean(&delays);

    let on_time = group.iter().filter(|r| r.is_on_time()).count();
    let delayed = group.iter().filter(|r| r.is_delayed()).count();

    AggregateRow {
        airline: airline.to_string(),
        count,
        mean: avg,
        median: median(&ordered),
        std_dev: sample_stddev(&delays, avg),
        min: ordered.first().copied().unwrap_or(0.0),
        max: ordered.last().copied().unwrap_or(0.0),
        p90: percentile(&ordered, 90.0),
        on_time_pct: pct(on_time, count),
        delayed_pct: pct(delayed, count),
        cancelled: group.iter().filter(|r| r.is_cancelled()).count(),
        categories: CategoryBreakdown::from_delays(&delays),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FlightStatus;

    fn flight(id: &str, airline: &str, delay: f64) -> FlightRecord {
        FlightRecord {
            flight_id: id.into(),
            airline: airline.into(),
            origin: None,
            destination: None,
            departure: None,
            arrival: None,
            delay_minutes: delay,
            status: None,
        }
    }

    #[test]
    fn test_single_airline_example() {
        let rows = aggregate_by_airline(&[flight("1", "X", 0.0), flight("2", "X", 40.0)]);

        assert_eq!(rows.len(), 1);
        let x = &rows[0];
        assert_eq!(x.airline, "X");
        assert_eq!(x.count, 2);
        assert_eq!(x.mean, 20.0);
        assert_eq!(x.median, 20.0);
        assert_eq!(x.min, 0.0);
        assert_eq!(x.max, 40.0);
        assert_eq!(x.on_time_pct, 50.0);
        assert_eq!(x.delayed_pct, 50.0);
    }

    #[test]
    fn test_empty_input_gives_empty_rows() {
        assert!(aggregate_by_airline(&[]).is_empty());
    }

    #[test]
    fn test_sorted_by_mean_desc_with_name_tiebreak() {
        let records = vec![
            flight("1", "Beta", 10.0),
            flight("2", "Alpha", 10.0),
            flight("3", "Gamma", 50.0),
            flight("4", "Delta", 0.0),
        ];
        let names: Vec<_> = aggregate_by_airline(&records)
            .into_iter()
            .map(|r| r.airline)
            .collect();

        assert_eq!(names, vec!["Gamma", "Alpha", "Beta", "Delta"]);
    }

    #[test]
    fn test_counts_sum_to_record_total() {
        let records: Vec<_> = (0..25)
            .map(|i| flight(&i.to_string(), ["A", "B", "C"][i % 3], i as f64))
            .collect();
        let total: usize = aggregate_by_airline(&records).iter().map(|r| r.count).sum();

        assert_eq!(total, records.len());
    }

    #[test]
    fn test_single_flight_group_has_no_std_dev() {
        let rows = aggregate_by_airline(&[flight("1", "Solo", 12.0)]);
        assert_eq!(rows[0].std_dev, None);
        assert_eq!(rows[0].median, 12.0);
    }

    #[test]
    fn test_cancelled_flights_stay_in_percentage_split() {
        let mut cancelled = flight("3", "X", 0.0);
        cancelled.status = Some(FlightStatus::Cancelled);
        let rows =
            aggregate_by_airline(&[flight("1", "X", 0.0), flight("2", "X", 20.0), cancelled]);

        let x = &rows[0];
        assert_eq!(x.cancelled, 1);
        assert_eq!(x.count, 3);
        assert!((x.on_time_pct + x.delayed_pct - 100.0).abs() < 1e-9);
        assert!((x.on_time_pct - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_categories_and_p90() {
        let records: Vec<_> = [0.0, 10.0, 20.0, 30.0, 40.0]
            .iter()
            .enumerate()
            .map(|(i, &d)| flight(&i.to_string(), "X", d))
            .collect();
        let x = &aggregate_by_airline(&records)[0];

        assert_eq!(x.categories.on_time, 1);
        assert_eq!(x.categories.moderate, 3);
        assert_eq!(x.categories.high, 1);
        assert!((x.p90 - 36.0).abs() < 1e-9);
        assert!((x.std_dev.unwrap() - 250.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_huge_delays_give_finite_statistics() {
        let rows = aggregate_by_airline(&[flight("1", "X", 1.7e308), flight("2", "X", 1.7e308)]);
        let x = &rows[0];

        assert_eq!(x.mean, 1.7e308);
        assert_eq!(x.std_dev, Some(0.0));

        let table = crate::export::to_table(&rows);
        assert_eq!(table.rows[0].avg_delay, 1.7e308);
        assert_eq!(table.rows[0].std_delay, Some(0.0));
    }
}
