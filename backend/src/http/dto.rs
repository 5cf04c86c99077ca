//! Data Transfer Objects for the HTTP API.
//!
//! Page and widget payloads are re-exported from the routes module since they
//! already derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::api::{PageInfo, PageView, WidgetSpec};
use crate::models::{AgeGroup, DateRange, FilterState, LineColor, MapMetric, ValueRange};
use crate::parsing::values::parse_date;
use crate::store::{DashboardError, ErrorContext};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of open sessions
    pub sessions: usize,
}

/// Response for session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreatedResponse {
    pub session_id: String,
    /// Page to show first
    pub initial_page: String,
}

/// Page navigation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageListResponse {
    pub pages: Vec<PageInfo>,
    pub initial: String,
}

/// Sidebar widget declarations for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetListResponse {
    pub widgets: Vec<WidgetSpec>,
}

/// Widget values sent with a page request. Every parameter is optional;
/// missing values fall back to the widget defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// Comma-separated age group labels, e.g. `18-29,30-39`
    #[serde(default)]
    pub age_groups: Option<String>,
    #[serde(default)]
    pub min_production: Option<f64>,
    #[serde(default)]
    pub max_production: Option<f64>,
    #[serde(default)]
    pub show_self_used: Option<bool>,
    #[serde(default)]
    pub show_bought: Option<bool>,
    #[serde(default)]
    pub show_night_usage: Option<bool>,
    #[serde(default)]
    pub highlight: Option<bool>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

fn invalid(parameter: &str, message: impl Into<String>) -> DashboardError {
    DashboardError::invalid_input(
        message,
        ErrorContext::new("parse_page_query").with_entity(parameter),
    )
}

fn optional_date(parameter: &str, raw: Option<&str>) -> Result<Option<chrono::NaiveDate>, DashboardError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| invalid(parameter, format!("'{}' is not a date", raw))),
    }
}

fn finite(parameter: &str, value: Option<f64>) -> Result<Option<f64>, DashboardError> {
    match value {
        Some(v) if !v.is_finite() => Err(invalid(parameter, "value must be finite")),
        other => Ok(other),
    }
}

impl PageQuery {
    /// Build the filter state for one render pass.
    pub fn try_into_filter_state(&self) -> Result<FilterState, DashboardError> {
        let mut state = FilterState::default().with_date_range(DateRange::new(
            optional_date("start", self.start.as_deref())?,
            optional_date("end", self.end.as_deref())?,
        ));

        if let Some(groups) = &self.age_groups {
            let groups = groups
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<AgeGroup>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| invalid("age_groups", e))?;
            state = state.with_age_groups(groups);
        }

        let min = finite("min_production", self.min_production)?;
        let max = finite("max_production", self.max_production)?;
        if min.is_some() || max.is_some() {
            state = state.with_production(ValueRange::new(
                min.unwrap_or(f64::NEG_INFINITY),
                max.unwrap_or(f64::INFINITY),
            ));
        }

        let toggles = &mut state.toggles;
        if let Some(v) = self.show_self_used {
            toggles.show_self_used = v;
        }
        if let Some(v) = self.show_bought {
            toggles.show_bought = v;
        }
        if let Some(v) = self.show_night_usage {
            toggles.show_night_usage = v;
        }
        if let Some(v) = self.highlight {
            toggles.highlight_threshold = v;
        }

        if let Some(metric) = &self.metric {
            let metric = metric.parse::<MapMetric>().map_err(|e| invalid("metric", e))?;
            state = state.with_map_metric(metric);
        }
        if let Some(color) = &self.color {
            state.line_color = LineColor::parse(color).map_err(|e| invalid("color", e))?;
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_query_gives_defaults() {
        let state = PageQuery::default().try_into_filter_state().unwrap();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_full_query() {
        let query = PageQuery {
            start: Some("2022-01-01".into()),
            end: Some("31-03-2022".into()),
            age_groups: Some("18-29, 70-99".into()),
            min_production: Some(2.0),
            max_production: Some(40.0),
            show_bought: Some(false),
            highlight: Some(false),
            metric: Some("bought".into()),
            color: Some("#00AA00".into()),
            ..PageQuery::default()
        };
        let state = query.try_into_filter_state().unwrap();
        assert_eq!(
            state.date_range.bounds(),
            Some((
                NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2022, 3, 31).unwrap()
            ))
        );
        assert_eq!(state.age_groups.len(), 2);
        assert_eq!(state.production, Some(ValueRange::new(2.0, 40.0)));
        assert!(!state.toggles.show_bought);
        assert!(!state.toggles.highlight_threshold);
        assert_eq!(state.map_metric, MapMetric::Bought);
        assert_eq!(state.line_color.as_str(), "#00aa00");
    }

    #[test]
    fn test_blank_end_leaves_range_incomplete() {
        let query = PageQuery {
            start: Some("2022-01-01".into()),
            end: Some("".into()),
            ..PageQuery::default()
        };
        let state = query.try_into_filter_state().unwrap();
        assert!(!state.date_range.is_complete());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_date = PageQuery {
            start: Some("yesterday".into()),
            ..PageQuery::default()
        };
        assert!(matches!(
            bad_date.try_into_filter_state(),
            Err(DashboardError::InvalidInput { .. })
        ));

        let bad_group = PageQuery {
            age_groups: Some("10-17".into()),
            ..PageQuery::default()
        };
        assert!(bad_group.try_into_filter_state().is_err());

        let bad_color = PageQuery {
            color: Some("red".into()),
            ..PageQuery::default()
        };
        assert!(bad_color.try_into_filter_state().is_err());

        let nan = PageQuery {
            min_production: Some(f64::NAN),
            ..PageQuery::default()
        };
        assert!(nan.try_into_filter_state().is_err());
    }
}
