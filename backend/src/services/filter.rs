//! Filter layer: `(table, filter state) -> filtered table`.

use crate::models::{DateRange, FilterState, TimeSeries, UsageRecord};
use crate::routes::pages::Notice;

/// Notice shown while the date picker holds fewer than two bounds.
pub const PICK_RANGE_MESSAGE: &str = "Please pick a start and an end date to filter by date.";

/// Filtered rows plus any notices raised while filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub records: Vec<UsageRecord>,
    pub notices: Vec<Notice>,
}

/// Notice for an incomplete date range, `None` if the range is usable.
pub fn range_notice(range: &DateRange) -> Option<Notice> {
    (!range.is_complete()).then(|| Notice::info(PICK_RANGE_MESSAGE))
}

/// Keep the rows satisfying every active predicate.
///
/// - date within the range, inclusive (skipped with a notice when incomplete)
/// - age within one of the selected groups (rows without age are excluded
///   whenever a group is selected)
/// - daily production within the production range, inclusive
pub fn filter_usage(records: &[UsageRecord], state: &FilterState) -> FilterOutcome {
    let bounds = state.date_range.bounds();
    let notices = range_notice(&state.date_range).into_iter().collect();

    let records = records
        .iter()
        .filter(|r| bounds.is_none_or(|(start, end)| r.date >= start && r.date <= end))
        .filter(|r| {
            state.age_groups.is_empty()
                || r
                    .age
                    .is_some_and(|age| state.age_groups.iter().any(|g| g.contains(age)))
        })
        .filter(|r| {
            state
                .production
                .is_none_or(|range| range.contains(r.produced))
        })
        .cloned()
        .collect();

    FilterOutcome { records, notices }
}

/// Restrict a time series to a date range. Incomplete ranges leave the
/// series unchanged.
pub fn filter_series(series: &TimeSeries, range: &DateRange) -> TimeSeries {
    match range.bounds() {
        Some((start, end)) => series.retain_points(|p| p.date >= start && p.date <= end),
        None => series.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeGroup, Frequency, TimeSeriesPoint, ValueRange};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(user: &str, date: NaiveDate, age: Option<u32>, produced: f64) -> UsageRecord {
        UsageRecord {
            user_id: user.to_string(),
            date,
            latitude: None,
            longitude: None,
            age,
            produced,
            self_used: 0.0,
            bought: 0.0,
            used: 0.0,
            night_usage: 0.0,
        }
    }

    fn sample() -> Vec<UsageRecord> {
        vec![
            record("a", d(2022, 1, 1), Some(25), 10.0),
            record("a", d(2022, 1, 2), Some(25), 20.0),
            record("b", d(2022, 1, 3), Some(45), 30.0),
            record("c", d(2022, 1, 4), None, 40.0),
            record("d", d(2022, 1, 5), Some(72), 50.0),
        ]
    }

    #[test]
    fn test_inclusive_date_range() {
        let state = FilterState::default()
            .with_date_range(DateRange::between(d(2022, 1, 2), d(2022, 1, 4)));
        let outcome = filter_usage(&sample(), &state);

        let dates: Vec<_> = outcome.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(2022, 1, 2), d(2022, 1, 3), d(2022, 1, 4)]);
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn test_single_day_range() {
        let state = FilterState::default()
            .with_date_range(DateRange::between(d(2022, 1, 3), d(2022, 1, 3)));
        let outcome = filter_usage(&sample(), &state);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].user_id, "b");
    }

    #[test]
    fn test_incomplete_range_skips_filter_with_notice() {
        let state = FilterState::default()
            .with_date_range(DateRange::new(Some(d(2022, 1, 3)), None));
        let outcome = filter_usage(&sample(), &state);

        assert_eq!(outcome.records.len(), 5);
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].message, PICK_RANGE_MESSAGE);
    }

    #[test]
    fn test_age_groups_exclude_unknown_age() {
        let state = FilterState::default()
            .with_date_range(DateRange::between(d(2022, 1, 1), d(2022, 1, 5)))
            .with_age_groups([AgeGroup::From18To29, AgeGroup::From70To99]);
        let outcome = filter_usage(&sample(), &state);

        let users: Vec<_> = outcome.records.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(users, vec!["a", "a", "d"]);
    }

    #[test]
    fn test_no_age_groups_keeps_unknown_age() {
        let state = FilterState::default()
            .with_date_range(DateRange::between(d(2022, 1, 1), d(2022, 1, 5)));
        let outcome = filter_usage(&sample(), &state);
        assert!(outcome.records.iter().any(|r| r.age.is_none()));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let state = FilterState::default()
            .with_date_range(DateRange::between(d(2022, 1, 1), d(2022, 1, 3)))
            .with_age_groups([AgeGroup::From18To29, AgeGroup::From40To49])
            .with_production(ValueRange::new(15.0, 35.0));
        let outcome = filter_usage(&sample(), &state);

        let produced: Vec<_> = outcome.records.iter().map(|r| r.produced).collect();
        assert_eq!(produced, vec![20.0, 30.0]);
    }

    #[test]
    fn test_source_table_untouched() {
        let records = sample();
        let before = records.clone();
        let state = FilterState::default()
            .with_date_range(DateRange::between(d(2022, 1, 1), d(2022, 1, 1)));
        let _ = filter_usage(&records, &state);
        assert_eq!(records, before);
    }

    #[test]
    fn test_filter_series() {
        let series = TimeSeries::new(
            "gas",
            Frequency::Daily,
            (1..=5)
                .map(|day| TimeSeriesPoint::new(d(2022, 1, day), day as f64))
                .collect(),
        );
        let filtered = filter_series(&series, &DateRange::between(d(2022, 1, 2), d(2022, 1, 3)));
        assert_eq!(filtered.len(), 2);

        let untouched = filter_series(&series, &DateRange::default());
        assert_eq!(untouched.len(), 5);
    }
}
