//! Loaders for the dashboard's input tables.
//!
//! Files are read with polars into string frames and converted row by row.
//! A missing or unreadable file aborts the load; malformed rows are dropped
//! and counted in a [`LoadReport`].

pub mod ages;
pub mod csv_reader;
pub mod report;
pub mod series;
pub mod usage;
pub mod values;

pub use report::LoadReport;

use std::path::Path;

use crate::config::{DataConfig, LimitsConfig};
use crate::models::{Frequency, Tables};
use crate::store::error::{DashboardError, DashboardResult, ErrorContext};

fn load_error(table: &str, path: &Path, err: anyhow::Error) -> DashboardError {
    DashboardError::load(
        format!("{:#}", err),
        ErrorContext::new("load_tables")
            .with_entity(table)
            .with_entity_id(path.display()),
    )
}

/// Load every input table and join ages into the usage records.
pub fn load_tables(
    data: &DataConfig,
    limits: &LimitsConfig,
) -> DashboardResult<(Tables, Vec<LoadReport>)> {
    let usage_path = data.resolve(&data.usage.file);
    let (mut usage, usage_report) =
        usage::load_usage(&usage_path, &data.usage, &limits.plausible_range())
            .map_err(|e| load_error("usage", &usage_path, e))?;

    let ages_path = data.resolve(&data.ages.file);
    let (ages, ages_report) = ages::load_age_lookup(&ages_path, &data.ages, limits)
        .map_err(|e| load_error("ages", &ages_path, e))?;
    ages::attach_ages(&mut usage, &ages);

    let search_path = data.resolve(&data.search_index.file);
    let (search_index, search_report) = series::load_series(
        &search_path,
        &data.search_index,
        "search_index",
        Frequency::Weekly,
    )
    .map_err(|e| load_error("search_index", &search_path, e))?;

    let forecast_path = data.resolve(&data.forecast.file);
    let (forecast, forecast_report) = series::load_forecast(&forecast_path, &data.forecast)
        .map_err(|e| load_error("forecast", &forecast_path, e))?;

    let gas_path = data.resolve(&data.gas_price.file);
    let (gas_price, gas_report) =
        series::load_series(&gas_path, &data.gas_price, "gas_price", Frequency::Daily)
            .map_err(|e| load_error("gas_price", &gas_path, e))?;

    let reports = vec![
        usage_report,
        ages_report,
        search_report,
        forecast_report,
        gas_report,
    ];
    for report in &reports {
        report.log();
    }

    Ok((
        Tables {
            usage,
            search_index,
            forecast,
            gas_price,
        },
        reports,
    ))
}
