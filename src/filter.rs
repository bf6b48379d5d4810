use serde::Serialize;

use crate::record::FlightRecord;

/// Airline/airport predicates. `None` means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub airline: Option<String>,
    pub airport: Option<String>,
}

impl FilterCriteria {
    pub fn new(airline: Option<String>, airport: Option<String>) -> Self {
        Self { airline, airport }
    }

    pub fn is_empty(&self) -> bool {
        self.airline.is_none() && self.airport.is_none()
    }

    pub fn matches(&self, record: &FlightRecord) -> bool {
        let airline_ok = self
            .airline
            .as_deref()
            .is_none_or(|a| record.airline == a);
        let airport_ok = self
            .airport
            .as_deref()
            .is_none_or(|p| record.touches_airport(p));

        airline_ok && airport_ok
    }

    pub fn apply(&self, records: &[FlightRecord]) -> Vec<FlightRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Returns the records matching both predicates. An empty result is not an error.
pub fn filter(
    records: &[FlightRecord],
    airline: Option<&str>,
    airport: Option<&str>,
) -> Vec<FlightRecord> {
    FilterCriteria::new(airline.map(str::to_string), airport.map(str::to_string)).apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(id: &str, airline: &str, origin: &str, destination: &str) -> FlightRecord {
        FlightRecord {
            flight_id: id.into(),
            airline: airline.into(),
            origin: Some(origin.into()),
            destination: Some(destination.into()),
            departure: None,
            arrival: None,
            delay_minutes: 0.0,
            status: None,
        }
    }

    fn sample() -> Vec<FlightRecord> {
        vec![
            flight("1", "IndiGo", "DEL", "BOM"),
            flight("2", "IndiGo", "BLR", "DEL"),
            flight("3", "Vistara", "BOM", "BLR"),
            flight("4", "Vistara", "DEL", "MAA"),
        ]
    }

    #[test]
    fn test_no_criteria_passes_everything() {
        assert_eq!(filter(&sample(), None, None).len(), 4);
        assert!(FilterCriteria::default().is_empty());
    }

    #[test]
    fn test_airport_matches_origin_or_destination() {
        let out = filter(&sample(), None, Some("DEL"));

        let ids: Vec<_> = out.iter().map(|r| r.flight_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
        assert!(out.iter().all(|r| r.touches_airport("DEL")));
    }

    #[test]
    fn test_airline_and_airport_are_conjunctive() {
        let out = filter(&sample(), Some("Vistara"), Some("DEL"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].flight_id, "4");
    }

    #[test]
    fn test_unknown_airline_gives_empty_result() {
        assert!(filter(&sample(), Some("Pan Am"), None).is_empty());
    }

    #[test]
    fn test_airline_match_is_exact() {
        assert!(filter(&sample(), Some("indigo"), None).is_empty());
    }
}
