use anyhow::Result;
use std::path::Path;

use super::csv_reader::{read_string_frame, required_column};
use super::report::LoadReport;
use super::values::{parse_date, parse_datetime, parse_number};
use crate::config::{ForecastTableConfig, SeriesTableConfig};
use crate::models::{ForecastSeries, Frequency, TimeSeries, TimeSeriesPoint};
use crate::services::aggregation::{resample_weekly, Reduction};

/// Load a `date,value` table (search index, gas price).
pub fn load_series(
    path: &Path,
    config: &SeriesTableConfig,
    name: &str,
    frequency: Frequency,
) -> Result<(TimeSeries, LoadReport)> {
    let df = read_string_frame(path, config.separator)?;
    let mut report = LoadReport::new(name);

    let dates = required_column(&df, &config.date_column)?;
    let values = required_column(&df, &config.value_column)?;

    let mut points = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let date = dates.get(i).and_then(parse_date);
        let value = values
            .get(i)
            .and_then(|v| parse_number(v, config.decimal_comma));
        match (date, value) {
            (Some(date), Some(value)) => {
                points.push(TimeSeriesPoint::new(date, value));
                report.keep();
            }
            _ => report.drop_row(),
        }
    }

    Ok((TimeSeries::new(name, frequency, points), report))
}

/// Load the hourly forecast feed and resample it to weeks starting Monday.
///
/// Only rows whose type column matches the configured forecast type are used.
/// Each week yields the production total and the mean production per hour.
pub fn load_forecast(
    path: &Path,
    config: &ForecastTableConfig,
) -> Result<(ForecastSeries, LoadReport)> {
    let df = read_string_frame(path, config.separator)?;
    let mut report = LoadReport::new("forecast");

    let timestamps = required_column(&df, &config.timestamp_column)?;
    let values = required_column(&df, &config.value_column)?;
    let types = if config.type_column.is_empty() {
        None
    } else {
        Some(required_column(&df, &config.type_column)?)
    };

    let mut hourly = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let Some(types) = types {
            let matches = types
                .get(i)
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(&config.forecast_type));
            if !matches {
                // Other forecast types are not malformed, just not ours.
                continue;
            }
        }

        let timestamp = timestamps.get(i).and_then(parse_datetime);
        let value = values
            .get(i)
            .and_then(|v| parse_number(v, config.decimal_comma));
        let (Some(timestamp), Some(value)) = (timestamp, value) else {
            report.drop_row();
            continue;
        };

        hourly.push(TimeSeriesPoint::new(timestamp.date(), value));
        report.keep();
    }

    Ok((
        ForecastSeries {
            weekly_total: resample_weekly("forecast_total_mwh", &hourly, Reduction::Sum),
            hourly_mean: resample_weekly("forecast_mwh_per_hour", &hourly, Reduction::Mean),
        },
        report,
    ))
}
