use serde::Serialize;

/// Delay band of a single flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayCategory {
    OnTime,
    Moderate,
    High,
}

impl DelayCategory {
    /// Upper bound (inclusive) of a moderate delay, in minutes.
    pub const MODERATE_LIMIT: f64 = 30.0;

    /// Classifies a non-negative delay.
    ///
    /// | Delay (min)  | Category |
    /// |--------------|----------|
    /// | 0            | OnTime   |
    /// | (0, 30]      | Moderate |
    /// | > 30         | High     |
    pub fn of(delay_minutes: f64) -> Self {
        match delay_minutes {
            d if d <= 0.0 => Self::OnTime,
            d if d <= Self::MODERATE_LIMIT => Self::Moderate,
            _ => Self::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTime => "On-time",
            Self::Moderate => "Moderate Delay",
            Self::High => "High Delay",
        }
    }
}

/// Count of flights per delay band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub on_time: usize,
    pub moderate: usize,
    pub high: usize,
}

impl CategoryBreakdown {
    pub fn from_delays(delays: &[f64]) -> Self {
        let mut b = Self::default();
        for &d in delays {
            match DelayCategory::of(d) {
                DelayCategory::OnTime => b.on_time += 1,
                DelayCategory::Moderate => b.moderate += 1,
                DelayCategory::High => b.high += 1,
            }
        }
        b
    }

    pub fn total(&self) -> usize {
        self.on_time + self.moderate + self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(DelayCategory::of(0.0), DelayCategory::OnTime);
        assert_eq!(DelayCategory::of(0.5), DelayCategory::Moderate);
        assert_eq!(DelayCategory::of(30.0), DelayCategory::Moderate);
        assert_eq!(DelayCategory::of(30.01), DelayCategory::High);
        assert_eq!(DelayCategory::of(240.0), DelayCategory::High);
    }

    #[test]
    fn test_breakdown_counts() {
        let b = CategoryBreakdown::from_delays(&[0.0, 0.0, 12.0, 30.0, 31.0]);
        assert_eq!(
            b,
            CategoryBreakdown {
                on_time: 2,
                moderate: 2,
                high: 1
            }
        );
        assert_eq!(b.total(), 5);
    }
}
