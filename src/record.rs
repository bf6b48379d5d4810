//! Flight record types: the raw loaded row and its cleaned form.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Columns every input file must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "flight_id",
    "airline",
    "origin",
    "destination",
    "departure_time",
    "arrival_time",
    "delay_minutes",
    "status",
];

/// One input row exactly as loaded. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub flight_id: Option<String>,
    pub airline: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub delay_minutes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    OnTime,
    Delayed,
    Cancelled,
}

impl FlightStatus {
    /// Parses the status labels seen in flight exports. Unknown labels yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on-time" | "on time" | "ontime" | "on_time" => Some(Self::OnTime),
            "delayed" => Some(Self::Delayed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTime => "on-time",
            Self::Delayed => "delayed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A cleaned flight. Only produced by [`crate::cleaner::clean`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRecord {
    pub flight_id: String,
    pub airline: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure: Option<NaiveTime>,
    pub arrival: Option<NaiveTime>,
    pub delay_minutes: f64,
    pub status: Option<FlightStatus>,
}

impl FlightRecord {
    pub fn is_delayed(&self) -> bool {
        self.delay_minutes > 0.0
    }

    pub fn is_on_time(&self) -> bool {
        self.delay_minutes == 0.0
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == Some(FlightStatus::Cancelled)
    }

    /// True if the flight departs from or arrives at `airport`.
    pub fn touches_airport(&self, airport: &str) -> bool {
        self.origin.as_deref() == Some(airport) || self.destination.as_deref() == Some(airport)
    }
}

/// Turns a cleaned record back into loader form so it can be re-cleaned.
impl From<&FlightRecord> for RawRecord {
    fn from(r: &FlightRecord) -> Self {
        RawRecord {
            flight_id: Some(r.flight_id.clone()),
            airline: Some(r.airline.clone()),
            origin: r.origin.clone(),
            destination: r.destination.clone(),
            departure_time: r.departure.map(|t| t.format("%H:%M:%S").to_string()),
            arrival_time: r.arrival.map(|t| t.format("%H:%M:%S").to_string()),
            delay_minutes: Some(r.delay_minutes.to_string()),
            status: r.status.map(|s| s.as_str().to_string()),
        }
    }
}

/// Parses a time of day from `HH:MM`, `HH:MM:SS`, or a full timestamp.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    for fmt in ["%H:%M", "%H:%M:%S"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.time());
        }
    }
    None
}
