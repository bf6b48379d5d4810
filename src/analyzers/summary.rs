//! Dataset-wide overview and delay distribution.

use std::collections::BTreeMap;

use tracing::warn;

use crate::analyzers::types::{DatasetSummary, HistogramBin};
use crate::analyzers::utility::{mean, median, pct, sorted};
use crate::record::FlightRecord;

/// Overview of the whole record set, or `None` when it is empty.
///
/// Airline and airport lists keep first-seen order; airports are origins.
pub fn summarize(records: &[FlightRecord]) -> Option<DatasetSummary> {
    if records.is_empty() {
        warn!("Summary requested on an empty dataset");
        return None;
    }

    let delays: Vec<f64> = records.iter().map(|r| r.delay_minutes).collect();
    let ordered = sorted(&delays);
    let total = records.len();
    let on_time = records.iter().filter(|r| r.is_on_time()).count();
    let delayed = records.iter().filter(|r| r.is_delayed()).count();

    Some(DatasetSummary {
        total_records: total,
        airlines: unique_in_order(records.iter().map(|r| r.airline.as_str())),
        airports: unique_in_order(records.iter().filter_map(|r| r.origin.as_deref())),
        mean_delay: mean(&delays),
        median_delay: median(&ordered),
        max_delay: ordered.last().copied().unwrap_or(0.0),
        on_time,
        on_time_pct: pct(on_time, total),
        delayed,
        delayed_pct: pct(delayed, total),
        cancelled: records.iter().filter(|r| r.is_cancelled()).count(),
    })
}

/// Equal-width histogram of delays over `[min, max]`.
///
/// Returns an empty vector for empty input or `bins == 0`. When every delay is
/// equal a single bin holds all records.
pub fn delay_histogram(records: &[FlightRecord], bins: usize) -> Vec<HistogramBin> {
    let Some(edges) = DelayRange::of(records, bins) else {
        return Vec::new();
    };
    edges.count(records.iter().map(|r| r.delay_minutes))
}

/// One histogram per airline, all over the dataset's shared `[min, max]` so
/// the bins line up across airlines. Airlines are sorted by name.
pub fn delay_histogram_by_airline(
    records: &[FlightRecord],
    bins: usize,
) -> Vec<(String, Vec<HistogramBin>)> {
    let Some(edges) = DelayRange::of(records, bins) else {
        return Vec::new();
    };

    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups
            .entry(r.airline.as_str())
            .or_default()
            .push(r.delay_minutes);
    }

    groups
        .into_iter()
        .map(|(airline, delays)| (airline.to_string(), edges.count(delays)))
        .collect()
}

/// Bin layout shared by the overall and per-airline histograms.
struct DelayRange {
    lo: f64,
    hi: f64,
    bins: usize,
}

impl DelayRange {
    fn of(records: &[FlightRecord], bins: usize) -> Option<Self> {
        if records.is_empty() || bins == 0 {
            return None;
        }
        let ordered = sorted(&records.iter().map(|r| r.delay_minutes).collect::<Vec<_>>());
        let (lo, hi) = (ordered[0], ordered[ordered.len() - 1]);
        // a constant dataset collapses to one bin
        let bins = if hi == lo { 1 } else { bins };

        Some(DelayRange { lo, hi, bins })
    }

    fn count(&self, delays: impl IntoIterator<Item = f64>) -> Vec<HistogramBin> {
        let width = (self.hi - self.lo) / self.bins as f64;
        let mut out: Vec<HistogramBin> = (0..self.bins)
            .map(|i| HistogramBin {
                lower: self.lo + width * i as f64,
                upper: if i + 1 == self.bins {
                    self.hi
                } else {
                    self.lo + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for d in delays {
            let idx = if width > 0.0 {
                (((d - self.lo) / width) as usize).min(self.bins - 1)
            } else {
                0
            };
            out[idx].count += 1;
        }

        out
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FlightStatus;

    fn flight(id: &str, airline: &str, origin: &str, delay: f64) -> FlightRecord {
        FlightRecord {
            flight_id: id.into(),
            airline: airline.into(),
            origin: Some(origin.into()),
            destination: None,
            departure: None,
            arrival: None,
            delay_minutes: delay,
            status: None,
        }
    }

    #[test]
    fn test_summary_of_empty_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summary_fields() {
        let mut c = flight("4", "SpiceJet", "DEL", 0.0);
        c.status = Some(FlightStatus::Cancelled);
        let records = vec![
            flight("1", "IndiGo", "DEL", 0.0),
            flight("2", "SpiceJet", "BOM", 60.0),
            flight("3", "IndiGo", "DEL", 20.0),
            c,
        ];
        let s = summarize(&records).unwrap();

        assert_eq!(s.total_records, 4);
        assert_eq!(s.airlines, vec!["IndiGo", "SpiceJet"]);
        assert_eq!(s.airports, vec!["DEL", "BOM"]);
        assert_eq!(s.mean_delay, 20.0);
        assert_eq!(s.median_delay, 10.0);
        assert_eq!(s.max_delay, 60.0);
        assert_eq!(s.on_time, 2);
        assert_eq!(s.on_time_pct, 50.0);
        assert_eq!(s.delayed, 2);
        assert_eq!(s.cancelled, 1);
    }

    #[test]
    fn test_histogram_counts_all_records() {
        let records: Vec<_> = (0..=100)
            .map(|i| flight(&i.to_string(), "A", "DEL", i as f64))
            .collect();
        let bins = delay_histogram(&records, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 101);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[9].upper, 100.0);
        // 100 lands in the closed last bin
        assert_eq!(bins[9].count, 11);
    }

    #[test]
    fn test_histogram_constant_delays() {
        let records = vec![flight("1", "A", "DEL", 5.0), flight("2", "A", "DEL", 5.0)];
        let bins = delay_histogram(&records, 50);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn test_histogram_by_airline_shares_bin_edges() {
        let records = vec![
            flight("1", "IndiGo", "DEL", 0.0),
            flight("2", "IndiGo", "DEL", 10.0),
            flight("3", "Vistara", "BOM", 40.0),
            flight("4", "Air India", "BOM", 25.0),
        ];
        let overall = delay_histogram(&records, 4);
        let per_airline = delay_histogram_by_airline(&records, 4);

        let names: Vec<_> = per_airline.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(names, vec!["Air India", "IndiGo", "Vistara"]);

        for (_, bins) in &per_airline {
            assert_eq!(bins.len(), overall.len());
            for (b, o) in bins.iter().zip(&overall) {
                assert_eq!((b.lower, b.upper), (o.lower, o.upper));
            }
        }

        let counts = |name: &str| -> Vec<usize> {
            let (_, bins) = per_airline.iter().find(|(a, _)| a == name).unwrap();
            bins.iter().map(|b| b.count).collect()
        };
        assert_eq!(counts("IndiGo"), vec![1, 1, 0, 0]);
        assert_eq!(counts("Air India"), vec![0, 0, 1, 0]);
        assert_eq!(counts("Vistara"), vec![0, 0, 0, 1]);

        // per-airline counts add up to the overall histogram
        for (i, o) in overall.iter().enumerate() {
            let sum: usize = per_airline.iter().map(|(_, b)| b[i].count).sum();
            assert_eq!(sum, o.count);
        }
    }

    #[test]
    fn test_histogram_by_airline_empty() {
        assert!(delay_histogram_by_airline(&[], 10).is_empty());
    }

    #[test]
    fn test_histogram_empty_or_zero_bins() {
        assert!(delay_histogram(&[], 10).is_empty());
        assert!(delay_histogram(&[flight("1", "A", "DEL", 1.0)], 0).is_empty());
    }
}
