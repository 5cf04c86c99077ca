//! Public API surface of the dashboard backend.
//!
//! Consolidates the types exchanged with the frontend. All of them derive
//! Serialize/Deserialize.

pub use crate::models::{
    AgeGroup, DateRange, DisplayToggles, FilterState, LineColor, MapMetric, Metric, Tables,
    TimeSeries, TimeSeriesPoint, UsageRecord, ValueRange,
};
pub use crate::routes::charts::{ChartKind, ChartSpec, ColorRule, EncodingSpec, FieldEncoding, FieldType};
pub use crate::routes::pages::{Kpi, Notice, NoticeLevel, Page, PageInfo, PageView};
pub use crate::routes::widgets::{WidgetKind, WidgetSpec};
pub use crate::store::SessionId;
