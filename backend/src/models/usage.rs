use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One household on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub user_id: String,
    pub date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Owner age in years; `None` when unknown or outside the accepted age bounds.
    pub age: Option<u32>,
    /// Total power produced (kWh).
    pub produced: f64,
    /// Produced power consumed by the household itself (kWh).
    pub self_used: f64,
    /// Power bought from the grid (kWh).
    pub bought: f64,
    /// Total power used (kWh).
    pub used: f64,
    /// Power used during night hours (kWh).
    pub night_usage: f64,
}

impl UsageRecord {
    /// `(longitude, latitude)` when both coordinates are known.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }
}

/// Numeric columns of the usage table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Produced,
    SelfUsed,
    Bought,
    Used,
    NightUsage,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Produced,
        Metric::SelfUsed,
        Metric::Bought,
        Metric::Used,
        Metric::NightUsage,
    ];

    pub fn value(self, record: &UsageRecord) -> f64 {
        match self {
            Metric::Produced => record.produced,
            Metric::SelfUsed => record.self_used,
            Metric::Bought => record.bought,
            Metric::Used => record.used,
            Metric::NightUsage => record.night_usage,
        }
    }

    /// Field name used in chart data rows.
    pub fn field(self) -> &'static str {
        match self {
            Metric::Produced => "produced",
            Metric::SelfUsed => "self_used",
            Metric::Bought => "bought",
            Metric::Used => "used",
            Metric::NightUsage => "night_usage",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Produced => "Power produced (kWh)",
            Metric::SelfUsed => "Power self-used (kWh)",
            Metric::Bought => "Power bought (kWh)",
            Metric::Used => "Power used (kWh)",
            Metric::NightUsage => "Night usage (kWh)",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "produced" => Ok(Metric::Produced),
            "self_used" => Ok(Metric::SelfUsed),
            "bought" => Ok(Metric::Bought),
            "used" => Ok(Metric::Used),
            "night_usage" => Ok(Metric::NightUsage),
            other => Err(format!("unknown metric '{}'", other)),
        }
    }
}
