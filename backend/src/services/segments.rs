//! Threshold segmentation for colour-coded line charts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::TimeSeriesPoint;

/// A point tagged with its threshold classification and run id.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub above: bool,
    pub segment: usize,
}

/// Split a series into maximal runs of points on the same side of
/// `threshold` (strictly above counts as above).
///
/// Runs are numbered from 0 in order. At every crossing the last point of
/// the previous run is repeated once as the first point of the new run, so
/// consecutive runs share an endpoint and the drawn line stays connected.
pub fn segment_by_threshold(points: &[TimeSeriesPoint], threshold: f64) -> Vec<SegmentedPoint> {
    let mut out = Vec::with_capacity(points.len() + points.len() / 2);
    let mut segment = 0;
    let mut previous: Option<(TimeSeriesPoint, bool)> = None;

    for point in points {
        let above = point.value > threshold;
        if let Some((prev, prev_above)) = previous {
            if above != prev_above {
                segment += 1;
                out.push(SegmentedPoint {
                    date: prev.date,
                    value: prev.value,
                    above,
                    segment,
                });
            }
        }
        out.push(SegmentedPoint {
            date: point.date,
            value: point.value,
            above,
            segment,
        });
        previous = Some((*point, above));
    }

    out
}

/// Number of threshold crossings in a series.
pub fn crossing_count(points: &[TimeSeriesPoint], threshold: f64) -> usize {
    points
        .windows(2)
        .filter(|w| (w[0].value > threshold) != (w[1].value > threshold))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<TimeSeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint::new(start + chrono::Duration::weeks(i as i64), *v))
            .collect()
    }

    #[test]
    fn test_single_run() {
        let out = segment_by_threshold(&points(&[1.0, 2.0, 3.0]), 10.0);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.segment == 0 && !p.above));
    }

    #[test]
    fn test_runs_and_boundary_duplicates() {
        let input = points(&[1.0, 12.0, 15.0, 4.0]);
        let out = segment_by_threshold(&input, 10.0);

        // 4 points + one duplicate per crossing (2 crossings)
        assert_eq!(out.len(), 6);
        let segments: Vec<_> = out.iter().map(|p| p.segment).collect();
        assert_eq!(segments, vec![0, 1, 1, 1, 2, 2]);
        let flags: Vec<_> = out.iter().map(|p| p.above).collect();
        assert_eq!(flags, vec![false, true, true, true, false, false]);

        // The duplicate repeats the previous run's last point
        assert_eq!(out[1].date, input[0].date);
        assert_eq!(out[1].value, input[0].value);
        assert_eq!(out[4].date, input[2].date);
    }

    #[test]
    fn test_one_duplicate_per_crossing() {
        let input = points(&[0.0, 20.0, 0.0, 20.0, 0.0, 20.0]);
        let out = segment_by_threshold(&input, 10.0);
        let crossings = crossing_count(&input, 10.0);
        assert_eq!(crossings, 5);
        assert_eq!(out.len(), input.len() + crossings);

        // Each (date, value) appears at most twice
        for p in &input {
            let n = out
                .iter()
                .filter(|o| o.date == p.date && o.value == p.value)
                .count();
            assert!(n <= 2);
        }
    }

    #[test]
    fn test_value_equal_to_threshold_is_below() {
        let out = segment_by_threshold(&points(&[10.0, 10.0]), 10.0);
        assert!(out.iter().all(|p| !p.above));
    }

    #[test]
    fn test_empty_series() {
        assert!(segment_by_threshold(&[], 1.0).is_empty());
        assert_eq!(crossing_count(&[], 1.0), 0);
    }
}
