mod support;

use chrono::NaiveDate;
use solar_dash::models::Frequency;
use solar_dash::parsing;
use solar_dash::store::{CsvTableSource, DashboardError, SessionStore, TableSource};
use std::sync::Arc;
use std::time::Duration;
use support::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_usage_rows_dropped_and_clamped() {
    let (_dir, config) = standard_fixture();
    let (tables, reports) = parsing::load_tables(&config.data, &config.limits).unwrap();

    assert_eq!(tables.usage.len(), 6);
    let usage = reports.iter().find(|r| r.table == "usage").unwrap();
    assert_eq!(usage.rows_read, 8);
    assert_eq!(usage.rows_kept, 6);
    assert_eq!(usage.rows_dropped, 2);
    assert_eq!(usage.values_clamped, 2);

    let feb = tables
        .usage
        .iter()
        .find(|r| r.user_id == "u1" && r.date == d(2022, 2, 7))
        .unwrap();
    assert_eq!(feb.produced, 500.0);
    let mar = tables
        .usage
        .iter()
        .find(|r| r.user_id == "u1" && r.date == d(2022, 3, 7))
        .unwrap();
    assert_eq!(mar.bought, 0.0);
}

#[test]
fn test_missing_coordinates_kept() {
    let tables = sample_tables();
    let row = tables
        .usage
        .iter()
        .find(|r| r.user_id == "u2" && r.date == d(2022, 2, 7))
        .unwrap();
    assert_eq!(row.location(), None);
}

#[test]
fn test_ages_joined_and_bounded() {
    let tables = sample_tables();
    let age_of = |user: &str| tables.usage.iter().find(|r| r.user_id == user).unwrap().age;
    assert_eq!(age_of("u1"), Some(43));
    assert_eq!(age_of("u2"), Some(93));
    assert_eq!(age_of("u3"), None);
}

#[test]
fn test_forecast_resampled_to_weeks() {
    let (_dir, config) = standard_fixture();
    let (tables, reports) = parsing::load_tables(&config.data, &config.limits).unwrap();

    let totals = &tables.forecast.weekly_total;
    assert_eq!(totals.frequency, Frequency::Weekly);
    assert_eq!(totals.len(), 2);
    assert_eq!(totals.value_at(d(2022, 1, 3)), Some(1000.0));
    assert_eq!(totals.value_at(d(2022, 1, 10)), Some(1200.0));

    let hourly = &tables.forecast.hourly_mean;
    let first = hourly.value_at(d(2022, 1, 3)).unwrap();
    assert!((first - 1000.0 / 3.0).abs() < 1e-9);

    let forecast = reports.iter().find(|r| r.table == "forecast").unwrap();
    assert_eq!(forecast.rows_kept, 4);
    assert_eq!(forecast.rows_dropped, 1);
}

#[test]
fn test_series_tables() {
    let tables = sample_tables();
    assert_eq!(tables.search_index.len(), 3);
    assert_eq!(tables.gas_price.value_at(d(2022, 2, 7)), Some(150.0));
}

#[test]
fn test_missing_file_is_load_error() {
    let dir = write_files(&[("merged_usage.csv", USAGE_CSV)]);
    let config = config_for(dir.path());

    let err = parsing::load_tables(&config.data, &config.limits).unwrap_err();
    match err {
        DashboardError::Load { context, .. } => {
            assert_eq!(context.entity.as_deref(), Some("ages"));
            assert!(context.entity_id.unwrap().ends_with("ages.csv"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_missing_column_is_load_error() {
    let (dir, config) = standard_fixture();
    std::fs::write(dir.path().join("gas_price.csv"), "date,cost\n2022-01-01,1\n").unwrap();
    let err = parsing::load_tables(&config.data, &config.limits).unwrap_err();
    assert!(err.to_string().contains("price"));
}

#[test]
fn test_session_cache_loads_from_disk_once() {
    let (dir, config) = standard_fixture();
    let source = CsvTableSource::new(Arc::new(config));
    let store = SessionStore::new(Duration::from_secs(60));
    let id = store.create();
    let cache = store.get(id).unwrap();

    let first = cache.tables(&source).unwrap();
    // Files removed after the first load do not matter to this session
    std::fs::remove_file(dir.path().join("merged_usage.csv")).unwrap();
    let second = cache.tables(&source).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // A fresh load reports the missing file
    assert!(source.load_tables().is_err());
}

#[test]
fn test_config_from_env() {
    let (dir, _config) = standard_fixture();
    let path = dir.path().join("dashboard.toml");
    std::fs::write(&path, "[charts]\ntop_households = 3\n").unwrap();

    let config = with_scoped_env(&[("DASHBOARD_CONFIG", Some(path.to_str().unwrap()))], || {
        solar_dash::config::DashboardConfig::load().unwrap()
    });
    assert_eq!(config.charts.top_households, 3);
    assert_eq!(config.data.directory, dir.path().join("data"));
}
