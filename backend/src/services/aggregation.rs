//! Aggregation layer: group usage rows by a key and reduce numeric columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{week_start, Frequency, Metric, Month, TimeSeries, TimeSeriesPoint, UsageRecord};

/// Reduction applied to one column within a group.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    Mean,
    Sum,
    Min,
    Max,
}

impl Reduction {
    pub fn name(self) -> &'static str {
        match self {
            Reduction::Mean => "mean",
            Reduction::Sum => "sum",
            Reduction::Min => "min",
            Reduction::Max => "max",
        }
    }
}

/// Grouping key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Month,
    UserId,
    Date,
}

impl GroupKey {
    pub fn field(self) -> &'static str {
        match self {
            GroupKey::Month => "month",
            GroupKey::UserId => "user_id",
            GroupKey::Date => "date",
        }
    }

    fn value_of(self, record: &UsageRecord) -> GroupValue {
        match self {
            GroupKey::Month => GroupValue::Month(Month::from_date(record.date)),
            GroupKey::UserId => GroupValue::User(record.user_id.clone()),
            GroupKey::Date => GroupValue::Date(record.date),
        }
    }
}

/// Value of a group key. Ordering is calendar order for months, id order
/// for users and chronological for dates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupValue {
    Month(Month),
    User(String),
    Date(NaiveDate),
}

impl GroupValue {
    pub fn label(&self) -> String {
        match self {
            GroupValue::Month(m) => m.name().to_string(),
            GroupValue::User(u) => u.clone(),
            GroupValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Which reduction to apply to which column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggSpec {
    pub columns: Vec<(Metric, Reduction)>,
}

impl AggSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: Metric, reduction: Reduction) -> Self {
        self.columns.push((metric, reduction));
        self
    }
}

/// One reduced column of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedValue {
    pub metric: Metric,
    pub reduction: Reduction,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub key: GroupValue,
    pub count: usize,
    pub values: Vec<AggregatedValue>,
}

impl AggregatedRow {
    pub fn get(&self, metric: Metric, reduction: Reduction) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.metric == metric && v.reduction == reduction)
            .map(|v| v.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTable {
    pub key: GroupKey,
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn reduce(&self, reduction: Reduction) -> f64 {
        match reduction {
            Reduction::Mean => self.sum / self.count as f64,
            Reduction::Sum => self.sum,
            Reduction::Min => self.min,
            Reduction::Max => self.max,
        }
    }
}

/// Group `records` by `key` and apply `spec` within each group.
///
/// Only groups present in the input are emitted; months come out in
/// calendar order.
pub fn aggregate(records: &[UsageRecord], key: GroupKey, spec: &AggSpec) -> AggregatedTable {
    let mut groups: BTreeMap<GroupValue, (usize, Vec<Accumulator>)> = BTreeMap::new();

    for record in records {
        let (count, accs) = groups
            .entry(key.value_of(record))
            .or_insert_with(|| (0, vec![Accumulator::new(); spec.columns.len()]));
        *count += 1;
        for (acc, (metric, _)) in accs.iter_mut().zip(&spec.columns) {
            acc.push(metric.value(record));
        }
    }

    let rows = groups
        .into_iter()
        .map(|(group, (count, accs))| AggregatedRow {
            key: group,
            count,
            values: accs
                .iter()
                .zip(&spec.columns)
                .map(|(acc, (metric, reduction))| AggregatedValue {
                    metric: *metric,
                    reduction: *reduction,
                    value: acc.reduce(*reduction),
                })
                .collect(),
        })
        .collect();

    AggregatedTable { key, rows }
}

/// Resample observations into weeks starting Monday. `points` may repeat a
/// date (hourly feeds); every observation counts.
pub fn resample_weekly(name: &str, points: &[TimeSeriesPoint], reduction: Reduction) -> TimeSeries {
    let mut weeks: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for point in points {
        weeks
            .entry(week_start(point.date))
            .or_insert_with(Accumulator::new)
            .push(point.value);
    }

    let points = weeks
        .into_iter()
        .map(|(week, acc)| TimeSeriesPoint::new(week, acc.reduce(reduction)))
        .collect();
    TimeSeries::new(name, Frequency::Weekly, points)
}

/// Daily series of one metric across all households.
pub fn daily_series(records: &[UsageRecord], metric: Metric, reduction: Reduction) -> TimeSeries {
    let table = aggregate(records, GroupKey::Date, &AggSpec::new().with(metric, reduction));
    let points = table
        .rows
        .iter()
        .filter_map(|row| match row.key {
            GroupValue::Date(date) => row.get(metric, reduction).map(|v| TimeSeriesPoint::new(date, v)),
            _ => None,
        })
        .collect();
    TimeSeries::new(metric.field(), Frequency::Daily, points)
}

#[cfg(test)]
#[path = "aggregation_tests.rs"]
mod aggregation_tests;
