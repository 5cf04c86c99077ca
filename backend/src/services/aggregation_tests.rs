use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn record(user: &str, date: NaiveDate, produced: f64, bought: f64) -> UsageRecord {
    UsageRecord {
        user_id: user.to_string(),
        date,
        latitude: None,
        longitude: None,
        age: None,
        produced,
        self_used: produced / 2.0,
        bought,
        used: produced / 2.0 + bought,
        night_usage: 0.0,
    }
}

#[test]
fn test_months_in_calendar_order() {
    // Input deliberately out of order; lexicographic order would put April first
    let records = vec![
        record("a", d(2022, 12, 1), 1.0, 0.0),
        record("a", d(2022, 4, 1), 2.0, 0.0),
        record("a", d(2022, 1, 1), 3.0, 0.0),
        record("a", d(2022, 8, 1), 4.0, 0.0),
    ];
    let table = aggregate(
        &records,
        GroupKey::Month,
        &AggSpec::new().with(Metric::Produced, Reduction::Mean),
    );

    let labels: Vec<_> = table.rows.iter().map(|r| r.key.label()).collect();
    assert_eq!(labels, vec!["January", "April", "August", "December"]);
}

#[test]
fn test_absent_months_not_fabricated() {
    let records = vec![
        record("a", d(2022, 2, 1), 1.0, 0.0),
        record("b", d(2022, 2, 15), 3.0, 0.0),
    ];
    let table = aggregate(
        &records,
        GroupKey::Month,
        &AggSpec::new().with(Metric::Produced, Reduction::Sum),
    );
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].key, GroupValue::Month(Month::February));
    assert_eq!(table.rows[0].count, 2);
}

#[test]
fn test_all_twelve_months() {
    let records: Vec<_> = (1..=12)
        .rev()
        .map(|m| record("a", d(2022, m, 10), m as f64, 0.0))
        .collect();
    let table = aggregate(
        &records,
        GroupKey::Month,
        &AggSpec::new().with(Metric::Produced, Reduction::Mean),
    );
    let months: Vec<_> = table
        .rows
        .iter()
        .map(|r| match r.key {
            GroupValue::Month(m) => m,
            _ => panic!("expected month key"),
        })
        .collect();
    assert_eq!(months, Month::ALL.to_vec());
}

#[test]
fn test_reductions() {
    let records = vec![
        record("a", d(2022, 5, 1), 10.0, 1.0),
        record("a", d(2022, 5, 2), 20.0, 5.0),
        record("a", d(2022, 5, 3), 60.0, 3.0),
    ];
    let spec = AggSpec::new()
        .with(Metric::Produced, Reduction::Mean)
        .with(Metric::Produced, Reduction::Sum)
        .with(Metric::Bought, Reduction::Min)
        .with(Metric::Bought, Reduction::Max);
    let table = aggregate(&records, GroupKey::UserId, &spec);

    assert_eq!(table.rows.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.get(Metric::Produced, Reduction::Mean), Some(30.0));
    assert_eq!(row.get(Metric::Produced, Reduction::Sum), Some(90.0));
    assert_eq!(row.get(Metric::Bought, Reduction::Min), Some(1.0));
    assert_eq!(row.get(Metric::Bought, Reduction::Max), Some(5.0));
    assert_eq!(row.get(Metric::Used, Reduction::Mean), None);
}

#[test]
fn test_group_by_user_sorted_by_id() {
    let records = vec![
        record("c", d(2022, 5, 1), 1.0, 0.0),
        record("a", d(2022, 5, 1), 1.0, 0.0),
        record("b", d(2022, 5, 1), 1.0, 0.0),
    ];
    let table = aggregate(
        &records,
        GroupKey::UserId,
        &AggSpec::new().with(Metric::Produced, Reduction::Sum),
    );
    let users: Vec<_> = table.rows.iter().map(|r| r.key.label()).collect();
    assert_eq!(users, vec!["a", "b", "c"]);
}

#[test]
fn test_empty_input() {
    let table = aggregate(
        &[],
        GroupKey::Month,
        &AggSpec::new().with(Metric::Produced, Reduction::Mean),
    );
    assert!(table.is_empty());
}

#[test]
fn test_resample_weekly() {
    // 2022-06-13 is a Monday
    let points = vec![
        TimeSeriesPoint::new(d(2022, 6, 13), 1.0),
        TimeSeriesPoint::new(d(2022, 6, 15), 3.0),
        TimeSeriesPoint::new(d(2022, 6, 20), 10.0),
    ];
    let weekly = resample_weekly("gas_price", &points, Reduction::Mean);
    assert_eq!(weekly.frequency, Frequency::Weekly);
    assert_eq!(weekly.len(), 2);
    assert_eq!(weekly.value_at(d(2022, 6, 13)), Some(2.0));
    assert_eq!(weekly.value_at(d(2022, 6, 20)), Some(10.0));
}

#[test]
fn test_resample_weekly_counts_repeated_dates() {
    // three hourly readings on the same Monday
    let points = vec![
        TimeSeriesPoint::new(d(2022, 1, 3), 100.0),
        TimeSeriesPoint::new(d(2022, 1, 3), 200.0),
        TimeSeriesPoint::new(d(2022, 1, 3), 300.0),
    ];
    let total = resample_weekly("total", &points, Reduction::Sum);
    let hourly = resample_weekly("hourly", &points, Reduction::Mean);
    assert_eq!(total.name, "total");
    assert_eq!(total.value_at(d(2022, 1, 3)), Some(600.0));
    assert_eq!(hourly.value_at(d(2022, 1, 3)), Some(200.0));
}

#[test]
fn test_daily_series() {
    let records = vec![
        record("a", d(2022, 5, 2), 10.0, 0.0),
        record("b", d(2022, 5, 2), 30.0, 0.0),
        record("a", d(2022, 5, 1), 5.0, 0.0),
    ];
    let series = daily_series(&records, Metric::Produced, Reduction::Mean);
    assert_eq!(series.len(), 2);
    assert_eq!(series.value_at(d(2022, 5, 1)), Some(5.0));
    assert_eq!(series.value_at(d(2022, 5, 2)), Some(20.0));
}
