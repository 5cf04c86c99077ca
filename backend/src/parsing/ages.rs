use anyhow::Result;
use chrono::Datelike;
use std::collections::HashMap;
use std::path::Path;

use super::csv_reader::{read_string_frame, required_column};
use super::report::LoadReport;
use super::values::parse_date;
use crate::config::{AgeTableConfig, LimitsConfig};
use crate::models::UsageRecord;

/// Load the age lookup, keyed by user id.
///
/// Birth dates are Danish formatted (`DD-MM-YYYY`); a bare year is accepted
/// too. Users whose age falls outside the configured bounds map to `None`,
/// which keeps them out of age-filtered views.
pub fn load_age_lookup(
    path: &Path,
    config: &AgeTableConfig,
    limits: &LimitsConfig,
) -> Result<(HashMap<String, Option<u32>>, LoadReport)> {
    let df = read_string_frame(path, config.separator)?;
    let mut report = LoadReport::new("ages");

    let user_ids = required_column(&df, &config.user_id_column)?;
    let birth_dates = required_column(&df, &config.birth_date_column)?;

    let mut lookup = HashMap::with_capacity(df.height());
    for i in 0..df.height() {
        let Some(user_id) = user_ids.get(i).map(str::trim).filter(|s| !s.is_empty()) else {
            report.drop_row();
            continue;
        };
        let Some(birth_year) = birth_dates.get(i).and_then(parse_birth_year) else {
            report.drop_row();
            continue;
        };

        lookup
            .entry(user_id.to_string())
            .or_insert_with(|| limits.age_for_birth_year(birth_year));
        report.keep();
    }

    Ok((lookup, report))
}

fn parse_birth_year(raw: &str) -> Option<i32> {
    parse_date(raw)
        .map(|d| d.year())
        .or_else(|| raw.trim().parse::<i32>().ok().filter(|y| *y > 1800))
}

/// Join ages into usage records by user id. Users absent from the lookup
/// keep `age = None`.
pub fn attach_ages(records: &mut [UsageRecord], lookup: &HashMap<String, Option<u32>>) {
    for record in records.iter_mut() {
        record.age = lookup.get(&record.user_id).copied().flatten();
    }
}
