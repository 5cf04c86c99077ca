use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::series::{Frequency, TimeSeries};
use super::usage::UsageRecord;

/// Weekly national solar forecast derived from the hourly feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    /// Weekly production total (MWh).
    pub weekly_total: TimeSeries,
    /// Weekly mean production per hour (MWh/h).
    pub hourly_mean: TimeSeries,
}

impl ForecastSeries {
    pub fn empty() -> Self {
        Self {
            weekly_total: TimeSeries::empty("forecast_total_mwh", Frequency::Weekly),
            hourly_mean: TimeSeries::empty("forecast_mwh_per_hour", Frequency::Weekly),
        }
    }
}

/// Every table loaded for a session. Never mutated after loading; filters
/// and aggregations build derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub usage: Vec<UsageRecord>,
    pub search_index: TimeSeries,
    pub forecast: ForecastSeries,
    pub gas_price: TimeSeries,
}

impl Tables {
    /// Earliest and latest usage dates.
    pub fn usage_date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.usage.iter().map(|r| r.date).min()?;
        let max = self.usage.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Largest daily production value, used for slider bounds.
    pub fn max_production(&self) -> f64 {
        self.usage
            .iter()
            .map(|r| r.produced)
            .fold(0.0_f64, f64::max)
    }
}
