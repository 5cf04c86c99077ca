use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Sampling frequency of a time series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    pub fn step(self) -> Duration {
        match self {
            Frequency::Daily => Duration::days(1),
            Frequency::Weekly => Duration::weeks(1),
        }
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A named series of points with strictly increasing dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub name: String,
    pub frequency: Frequency,
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// Build a series, sorting by date. When a date occurs more than once the
    /// first occurrence wins.
    pub fn new(name: impl Into<String>, frequency: Frequency, mut points: Vec<TimeSeriesPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self {
            name: name.into(),
            frequency,
            points,
        }
    }

    pub fn empty(name: impl Into<String>, frequency: Frequency) -> Self {
        Self::new(name, frequency, Vec::new())
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Value observed exactly at `date`, if any.
    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// Copy of this series keeping only points accepted by `keep`.
    pub fn retain_points<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&TimeSeriesPoint) -> bool,
    {
        Self {
            name: self.name.clone(),
            frequency: self.frequency,
            points: self.points.iter().copied().filter(|p| keep(p)).collect(),
        }
    }
}
