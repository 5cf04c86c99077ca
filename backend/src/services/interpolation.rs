//! Alignment of two series with different sampling onto one date axis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Frequency, TimeSeries, TimeSeriesPoint};

/// Values of both series at one axis date.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPoint {
    pub date: NaiveDate,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub left_name: String,
    pub right_name: String,
    pub points: Vec<AlignedPoint>,
}

/// Shared axis: a regular grid at `frequency` from the earliest to the latest
/// observation of either series, plus every observed date (outer join).
pub fn shared_axis(a: &TimeSeries, b: &TimeSeries, frequency: Frequency) -> Vec<NaiveDate> {
    let firsts = [a.first_date(), b.first_date()];
    let lasts = [a.last_date(), b.last_date()];
    let (Some(start), Some(end)) = (
        firsts.into_iter().flatten().min(),
        lasts.into_iter().flatten().max(),
    ) else {
        return Vec::new();
    };

    let mut axis: Vec<NaiveDate> = Vec::new();
    let step = frequency.step();
    let mut cursor = start;
    while cursor <= end {
        axis.push(cursor);
        cursor += step;
    }
    axis.extend(a.points().iter().map(|p| p.date));
    axis.extend(b.points().iter().map(|p| p.date));
    axis.sort();
    axis.dedup();
    axis
}

/// Evaluate a sorted, non-empty set of points at each (sorted) axis date.
///
/// Between observations the value is interpolated linearly in time. Before
/// the first and after the last observation the nearest observed value is
/// carried. Observed dates return the observed value exactly.
pub fn interpolate_at(points: &[TimeSeriesPoint], axis: &[NaiveDate]) -> Vec<f64> {
    let Some((first, last)) = points.first().zip(points.last()) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(axis.len());
    let mut j = 0;
    for &date in axis {
        if date <= first.date {
            out.push(first.value);
            continue;
        }
        if date >= last.date {
            out.push(last.value);
            continue;
        }
        // Advance to the segment [j, j + 1] containing `date`
        while points[j + 1].date < date {
            j += 1;
        }
        let (p0, p1) = (points[j], points[j + 1]);
        if date == p1.date {
            out.push(p1.value);
        } else if date == p0.date {
            out.push(p0.value);
        } else {
            let span = (p1.date - p0.date).num_days() as f64;
            let offset = (date - p0.date).num_days() as f64;
            out.push(p0.value + (p1.value - p0.value) * offset / span);
        }
    }
    out
}

/// Align two series on a shared axis. `None` when either series is empty.
pub fn align(left: &TimeSeries, right: &TimeSeries, frequency: Frequency) -> Option<AlignedSeries> {
    if left.is_empty() || right.is_empty() {
        return None;
    }

    let axis = shared_axis(left, right, frequency);
    let left_values = interpolate_at(left.points(), &axis);
    let right_values = interpolate_at(right.points(), &axis);

    let points = axis
        .into_iter()
        .zip(left_values.into_iter().zip(right_values))
        .map(|(date, (l, r))| AlignedPoint {
            date,
            left: l,
            right: r,
        })
        .collect();

    Some(AlignedSeries {
        left_name: left.name.clone(),
        right_name: right.name.clone(),
        points,
    })
}
