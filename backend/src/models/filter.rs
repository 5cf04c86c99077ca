//! Filter state assembled from the sidebar widgets for one render pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::range::ValueRange;
use super::usage::Metric;

/// Date range picked in the sidebar. Either bound may still be missing while
/// the user is picking.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// Both bounds in ascending order, or `None` if the range is incomplete.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(a), Some(b)) if a <= b => Some((a, b)),
            (Some(a), Some(b)) => Some((b, a)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.bounds().is_some()
    }
}

/// Owner age brackets offered by the age multi-select.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-29")]
    From18To29,
    #[serde(rename = "30-39")]
    From30To39,
    #[serde(rename = "40-49")]
    From40To49,
    #[serde(rename = "50-59")]
    From50To59,
    #[serde(rename = "60-69")]
    From60To69,
    #[serde(rename = "70-99")]
    From70To99,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 6] = [
        AgeGroup::From18To29,
        AgeGroup::From30To39,
        AgeGroup::From40To49,
        AgeGroup::From50To59,
        AgeGroup::From60To69,
        AgeGroup::From70To99,
    ];

    /// Inclusive `(min, max)` ages.
    pub fn bounds(self) -> (u32, u32) {
        match self {
            AgeGroup::From18To29 => (18, 29),
            AgeGroup::From30To39 => (30, 39),
            AgeGroup::From40To49 => (40, 49),
            AgeGroup::From50To59 => (50, 59),
            AgeGroup::From60To69 => (60, 69),
            AgeGroup::From70To99 => (70, 99),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::From18To29 => "18-29",
            AgeGroup::From30To39 => "30-39",
            AgeGroup::From40To49 => "40-49",
            AgeGroup::From50To59 => "50-59",
            AgeGroup::From60To69 => "60-69",
            AgeGroup::From70To99 => "70-99",
        }
    }

    pub fn contains(self, age: u32) -> bool {
        let (min, max) = self.bounds();
        age >= min && age <= max
    }

    pub fn of(age: u32) -> Option<AgeGroup> {
        Self::ALL.iter().copied().find(|g| g.contains(age))
    }
}

impl std::str::FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.label() == trimmed)
            .ok_or_else(|| format!("unknown age group '{}'", trimmed))
    }
}

/// Metric shown on the map page (radio button).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMetric {
    #[default]
    Produced,
    Used,
    Bought,
}

impl MapMetric {
    pub const ALL: [MapMetric; 3] = [MapMetric::Produced, MapMetric::Used, MapMetric::Bought];

    pub fn metric(self) -> Metric {
        match self {
            MapMetric::Produced => Metric::Produced,
            MapMetric::Used => Metric::Used,
            MapMetric::Bought => Metric::Bought,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            MapMetric::Produced => "produced",
            MapMetric::Used => "used",
            MapMetric::Bought => "bought",
        }
    }
}

impl std::str::FromStr for MapMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown map metric '{}'", s.trim()))
    }
}

/// Colour picked in the sidebar, always `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineColor(String);

impl LineColor {
    pub const DEFAULT: &'static str = "#f5a623";

    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim();
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| format!("colour '{}' must start with '#'", value))?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("colour '{}' is not of the form #rrggbb", value));
        }
        Ok(Self(format!("#{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LineColor {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl TryFrom<String> for LineColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LineColor> for String {
    fn from(value: LineColor) -> Self {
        value.0
    }
}

/// Boolean display toggles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayToggles {
    pub show_self_used: bool,
    pub show_bought: bool,
    pub show_night_usage: bool,
    /// Colour forecast segments above the production threshold.
    pub highlight_threshold: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self {
            show_self_used: true,
            show_bought: true,
            show_night_usage: false,
            highlight_threshold: true,
        }
    }
}

/// Snapshot of every widget value for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub date_range: DateRange,
    /// Selected age groups; empty means no age filter.
    pub age_groups: BTreeSet<AgeGroup>,
    /// Inclusive range on daily production.
    pub production: Option<ValueRange>,
    pub toggles: DisplayToggles,
    pub map_metric: MapMetric,
    pub line_color: LineColor,
}

impl FilterState {
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn with_age_groups<I: IntoIterator<Item = AgeGroup>>(mut self, groups: I) -> Self {
        self.age_groups = groups.into_iter().collect();
        self
    }

    pub fn with_production(mut self, range: ValueRange) -> Self {
        self.production = Some(range);
        self
    }

    pub fn with_map_metric(mut self, metric: MapMetric) -> Self {
        self.map_metric = metric;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_incomplete_range_has_no_bounds() {
        assert_eq!(DateRange::default().bounds(), None);
        assert_eq!(DateRange::new(Some(d(2022, 1, 1)), None).bounds(), None);
        assert!(!DateRange::new(None, Some(d(2022, 1, 1))).is_complete());
    }

    #[test]
    fn test_reversed_range_is_normalised() {
        let range = DateRange::between(d(2022, 5, 1), d(2022, 1, 1));
        assert_eq!(range.bounds(), Some((d(2022, 1, 1), d(2022, 5, 1))));
    }

    #[test]
    fn test_age_group_lookup() {
        assert_eq!(AgeGroup::of(18), Some(AgeGroup::From18To29));
        assert_eq!(AgeGroup::of(45), Some(AgeGroup::From40To49));
        assert_eq!(AgeGroup::of(99), Some(AgeGroup::From70To99));
        assert_eq!(AgeGroup::of(17), None);
        assert_eq!(AgeGroup::of(100), None);
        assert_eq!("30-39".parse::<AgeGroup>(), Ok(AgeGroup::From30To39));
        assert!("30-40".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn test_line_color_validation() {
        assert_eq!(LineColor::parse("#FF8800").unwrap().as_str(), "#ff8800");
        assert!(LineColor::parse("ff8800").is_err());
        assert!(LineColor::parse("#ff88").is_err());
        assert!(LineColor::parse("#gg8800").is_err());
        assert_eq!(LineColor::default().as_str(), LineColor::DEFAULT);
    }

    #[test]
    fn test_map_metric_parse() {
        assert_eq!("Bought".parse::<MapMetric>(), Ok(MapMetric::Bought));
        assert_eq!(MapMetric::Used.metric(), Metric::Used);
        assert!("night".parse::<MapMetric>().is_err());
    }
}
