use anyhow::Result;
use std::path::Path;

use super::csv_reader::{optional_column, read_string_frame, required_column};
use super::report::LoadReport;
use super::values::{parse_date, parse_number};
use crate::config::UsageTableConfig;
use crate::models::{UsageRecord, ValueRange};

/// Load the merged usage/production table.
///
/// Rows with a missing user id, an unparseable date or a missing/malformed
/// power value are dropped. Power values are clamped into `plausible`.
/// Coordinates are optional; a malformed coordinate is treated as missing.
pub fn load_usage(
    path: &Path,
    config: &UsageTableConfig,
    plausible: &ValueRange,
) -> Result<(Vec<UsageRecord>, LoadReport)> {
    let df = read_string_frame(path, config.separator)?;
    let mut report = LoadReport::new("usage");

    let user_ids = required_column(&df, &config.user_id_column)?;
    let dates = required_column(&df, &config.date_column)?;
    let produced = required_column(&df, &config.produced_column)?;
    let self_used = required_column(&df, &config.self_used_column)?;
    let bought = required_column(&df, &config.bought_column)?;
    let used = required_column(&df, &config.used_column)?;
    let night_usage = required_column(&df, &config.night_usage_column)?;
    let latitudes = optional_column(&df, &config.latitude_column);
    let longitudes = optional_column(&df, &config.longitude_column);

    let decimal_comma = config.decimal_comma;
    let mut records = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let user_id = match user_ids.get(i).map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                report.drop_row();
                continue;
            }
        };
        let Some(date) = dates.get(i).and_then(parse_date) else {
            report.drop_row();
            continue;
        };

        let power = [produced, self_used, bought, used, night_usage]
            .map(|col| col.get(i).and_then(|s| parse_number(s, decimal_comma)));
        let [Some(p), Some(s), Some(b), Some(u), Some(n)] = power else {
            report.drop_row();
            continue;
        };

        let mut clamp = |value: f64| {
            let clamped = plausible.clamp(value);
            if clamped != value {
                report.values_clamped += 1;
            }
            clamped
        };
        let (p, s, b, u, n) = (clamp(p), clamp(s), clamp(b), clamp(u), clamp(n));

        let coord = |col: Option<&polars::prelude::StringChunked>| {
            col.and_then(|c| c.get(i))
                .and_then(|v| parse_number(v, decimal_comma))
        };
        let latitude = coord(latitudes).filter(|v| (-90.0..=90.0).contains(v));
        let longitude = coord(longitudes).filter(|v| (-180.0..=180.0).contains(v));

        records.push(UsageRecord {
            user_id,
            date,
            latitude,
            longitude,
            age: None,
            produced: p,
            self_used: s,
            bought: b,
            used: u,
            night_usage: n,
        });
        report.keep();
    }

    Ok((records, report))
}
