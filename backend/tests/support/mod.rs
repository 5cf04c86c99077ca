#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use solar_dash::config::DashboardConfig;
use solar_dash::models::Tables;
use solar_dash::parsing;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the variables on unwind and serializes access to process-global
/// env vars, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// CSV fixtures
// =============================================================================

/// Eight usage rows: six valid, one with a bad date, one with a bad number.
/// Two valid rows carry out-of-range values, one has no coordinates.
pub const USAGE_CSV: &str = "\
user_id,date,latitude,longitude,total_power_produced,total_power_self_used,total_power_bought,total_power_used,night_usage
u1,2022-01-03,56.1,10.2,12.5,6.0,8.0,14.0,3.0
u1,2022-02-07,56.1,10.2,505,7.0,7.5,14.5,3.1
u1,2022-03-07,56.1,10.2,20.0,9.0,-10,15.0,3.2
u2,2022-01-03,55.7,12.6,8.0,4.0,9.0,13.0,4.0
u2,2022-02-07,,,9.5,4.5,8.5,13.0,4.1
u2,not-a-date,55.7,12.6,1,1,1,1,1
u3,2022-01-03,55.4,10.4,abc,1,1,1,1
u3,2022-03-07,55.4,10.4,15.0,7.0,6.0,13.0,3.5
";

/// u1 is 43, u2 is 93, u3 is too young to count.
pub const AGES_CSV: &str = "\
user_id;birth_date
u1;15-04-1980
u2;01.06.1930
u3;02-02-2010
";

pub const SEARCH_CSV: &str = "\
date,value
2022-01-03,40
2022-01-17,70
2022-01-31,55
";

/// Two weeks of solar rows, a wind row to ignore and a malformed row.
pub const FORECAST_CSV: &str = "\
HourUTC;HourDK;ForecastType;ForecastCurrent
2022-01-02T23:00:00;2022-01-03T00:00:00;Solar;0,0
2022-01-03T11:00:00;2022-01-03T12:00:00;Solar;600,5
2022-01-03T11:00:00;2022-01-03T12:00:00;Onshore Wind;900,0
2022-01-09T11:00:00;2022-01-09T12:00:00;Solar;399,5
2022-01-10T11:00:00;2022-01-10T12:00:00;Solar;1.200,0
2022-01-10T12:00:00;2022-01-10T13:00:00;Solar;n/a
";

pub const GAS_CSV: &str = "\
date,price
2022-01-03,100.0
2022-02-07,150.0
2022-03-07,120.0
";

pub const NOTEBOOK: &str = r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#;

/// Write `files` into a fresh temporary directory.
pub fn write_files(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

/// Default configuration pointed at `dir`.
pub fn config_for(dir: &Path) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    config.data.directory = dir.to_path_buf();
    config
}

/// A data directory holding every standard fixture file.
pub fn standard_fixture() -> (TempDir, DashboardConfig) {
    let dir = write_files(&[
        ("merged_usage.csv", USAGE_CSV),
        ("ages.csv", AGES_CSV),
        ("search_index.csv", SEARCH_CSV),
        ("energy_forecast.csv", FORECAST_CSV),
        ("gas_price.csv", GAS_CSV),
        ("solar_analysis.ipynb", NOTEBOOK),
    ]);
    let config = config_for(dir.path());
    (dir, config)
}

/// Tables loaded from the standard fixture.
pub fn sample_tables() -> Tables {
    let (_dir, config) = standard_fixture();
    let (tables, _reports) = parsing::load_tables(&config.data, &config.limits).unwrap();
    tables
}
