//! Sidebar widget declarations with defaults derived from the loaded data.

use crate::models::{AgeGroup, DisplayToggles, LineColor, MapMetric, Tables};
use crate::routes::pages::Page;
use crate::routes::widgets::{WidgetKind, WidgetSpec};

/// Pages rendered from filtered usage rows; the row filters apply to all of them.
const USAGE_PAGES: [Page; 4] = [Page::Overview, Page::Households, Page::Map, Page::Gas];

fn on_pages(pages: &[Page]) -> Vec<String> {
    pages.iter().map(|p| p.key().to_string()).collect()
}

/// Widgets shown in the sidebar, in display order.
pub fn declare_widgets(tables: &Tables) -> Vec<WidgetSpec> {
    let span = tables.usage_date_span();
    let toggles = DisplayToggles::default();
    let max_production = tables.max_production().ceil().max(1.0);

    vec![
        WidgetSpec {
            id: "page".into(),
            label: "Page".into(),
            widget: WidgetKind::Select {
                options: Page::ALL.iter().map(|p| p.key().to_string()).collect(),
                default: Page::initial().key().to_string(),
            },
            pages: Vec::new(),
        },
        WidgetSpec {
            id: "date_range".into(),
            label: "Date range".into(),
            widget: WidgetKind::DateRange {
                min: span.map(|(a, _)| a),
                max: span.map(|(_, b)| b),
                default_start: span.map(|(a, _)| a),
                default_end: span.map(|(_, b)| b),
            },
            pages: on_pages(&[Page::Overview, Page::Households, Page::Map, Page::Interest, Page::Gas]),
        },
        WidgetSpec {
            id: "age_groups".into(),
            label: "Owner age".into(),
            widget: WidgetKind::MultiSelect {
                options: AgeGroup::ALL.iter().map(|g| g.label().to_string()).collect(),
                default: Vec::new(),
            },
            pages: on_pages(&USAGE_PAGES),
        },
        WidgetSpec {
            id: "production".into(),
            label: "Daily production (kWh)".into(),
            widget: WidgetKind::RangeSlider {
                min: 0.0,
                max: max_production,
                step: 0.5,
                default: (0.0, max_production),
            },
            pages: on_pages(&USAGE_PAGES),
        },
        WidgetSpec {
            id: "show_self_used".into(),
            label: "Show self-used power".into(),
            widget: WidgetKind::Toggle {
                default: toggles.show_self_used,
            },
            pages: on_pages(&[Page::Overview]),
        },
        WidgetSpec {
            id: "show_bought".into(),
            label: "Show bought power".into(),
            widget: WidgetKind::Toggle {
                default: toggles.show_bought,
            },
            pages: on_pages(&[Page::Overview]),
        },
        WidgetSpec {
            id: "show_night_usage".into(),
            label: "Show night usage".into(),
            widget: WidgetKind::Toggle {
                default: toggles.show_night_usage,
            },
            pages: on_pages(&[Page::Overview]),
        },
        WidgetSpec {
            id: "highlight".into(),
            label: "Highlight weeks above threshold".into(),
            widget: WidgetKind::Toggle {
                default: toggles.highlight_threshold,
            },
            pages: on_pages(&[Page::Interest]),
        },
        WidgetSpec {
            id: "metric".into(),
            label: "Map metric".into(),
            widget: WidgetKind::Radio {
                options: MapMetric::ALL.iter().map(|m| m.key().to_string()).collect(),
                default: MapMetric::default().key().to_string(),
            },
            pages: on_pages(&[Page::Map]),
        },
        WidgetSpec {
            id: "color".into(),
            label: "Line colour".into(),
            widget: WidgetKind::ColorPicker {
                default: LineColor::DEFAULT.to_string(),
            },
            pages: on_pages(&[Page::Overview, Page::Households, Page::Map, Page::Interest, Page::Gas]),
        },
    ]
}
