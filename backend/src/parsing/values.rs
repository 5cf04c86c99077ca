//! Cell-level parsing shared by the table loaders.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M",
];

/// Parse a timestamp. Date-only cells are read as midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    // Drop fractional seconds and zone suffixes ("2022-01-01T00:00:00.000Z")
    let s = s.trim_end_matches('Z');
    let s = s.split('.').next().filter(|head| head.len() >= 16).unwrap_or(s);

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Parse a calendar date in ISO or Danish (`DD-MM-YYYY`, `DD.MM.YYYY`) form.
/// Timestamps are truncated to their date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a number. With `decimal_comma`, `.` is a thousands separator and
/// `,` the decimal mark. Non-finite values are rejected.
pub fn parse_number(raw: &str, decimal_comma: bool) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let value: f64 = if decimal_comma {
        s.replace('.', "").replace(',', ".").parse().ok()?
    } else {
        s.parse().ok()?
    };

    value.is_finite().then_some(value)
}
