use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// Sidebar widget declarations
// =========================================================

/// Kind and default value of a sidebar widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetKind {
    Select {
        options: Vec<String>,
        default: String,
    },
    DateRange {
        min: Option<NaiveDate>,
        max: Option<NaiveDate>,
        default_start: Option<NaiveDate>,
        default_end: Option<NaiveDate>,
    },
    MultiSelect {
        options: Vec<String>,
        default: Vec<String>,
    },
    RangeSlider {
        min: f64,
        max: f64,
        step: f64,
        default: (f64, f64),
    },
    Toggle {
        default: bool,
    },
    Radio {
        options: Vec<String>,
        default: String,
    },
    ColorPicker {
        default: String,
    },
}

/// One sidebar widget. `id` is the query parameter carrying its value; a
/// date range is sent as `start` and `end`, a range slider as `min_<id>` and
/// `max_<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSpec {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub widget: WidgetKind,
    /// Pages on which the widget is shown; empty means all pages.
    pub pages: Vec<String>,
}
