//! Chart renderer: tables in, declarative chart specifications out.

use serde_json::{json, Value};

use super::aggregation::{AggregatedTable, GroupValue, Reduction};
use super::hexbin::{HexCell, WeightedPoint};
use super::interpolation::AlignedSeries;
use super::segments::SegmentedPoint;
use crate::models::{Metric, Month, TimeSeries};
use crate::routes::charts::{ChartKind, ChartSpec, ColorRule, EncodingSpec, FieldEncoding, FieldType};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Colours assigned to categories when a chart has several series.
const CATEGORY_COLORS: [&str; 5] = ["#f5a623", "#2ca02c", "#1f77b4", "#9467bd", "#8c564b"];

fn field_json(field: &FieldEncoding) -> Value {
    serde_json::to_value(field).unwrap_or(Value::Null)
}

/// Build a Vega-Lite document for a line or bar chart.
pub fn vega_lite(title: &str, kind: ChartKind, rows: Vec<Value>, encoding: &EncodingSpec) -> Value {
    let mark_type = match kind {
        ChartKind::Bar => "bar",
        _ => "line",
    };
    let mut mark = json!({ "type": mark_type, "tooltip": true });
    let mut channels = serde_json::Map::new();
    channels.insert("x".into(), field_json(&encoding.x));
    channels.insert("y".into(), field_json(&encoding.y));

    match &encoding.color {
        ColorRule::Fixed { color } => {
            mark["color"] = json!(color);
        }
        ColorRule::ByField { field } => {
            let mut color = field_json(field);
            color["scale"] = json!({ "range": CATEGORY_COLORS });
            channels.insert("color".into(), color);
            if kind == ChartKind::Bar {
                channels.insert("xOffset".into(), json!({ "field": field.field }));
            }
        }
        ColorRule::Threshold {
            flag_field,
            segment_field,
            threshold,
            above,
            below,
        } => {
            channels.insert(
                "color".into(),
                json!({
                    "field": flag_field,
                    "type": "nominal",
                    "title": format!("Threshold {}", threshold),
                    "scale": { "domain": ["below", "above"], "range": [below, above] },
                }),
            );
            channels.insert(
                "detail".into(),
                json!({ "field": segment_field, "type": "nominal" }),
            );
        }
    }

    if !encoding.tooltip.is_empty() {
        channels.insert(
            "tooltip".into(),
            Value::Array(encoding.tooltip.iter().map(field_json).collect()),
        );
    }

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": title,
        "width": "container",
        "data": { "values": rows },
        "mark": mark,
        "encoding": Value::Object(channels),
    })
}

fn chart(id: &str, title: &str, kind: ChartKind, rows: Vec<Value>, encoding: &EncodingSpec) -> ChartSpec {
    ChartSpec {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        spec: vega_lite(title, kind, rows, encoding),
    }
}

/// Grouped bar chart of monthly values, months in calendar order.
pub fn monthly_bar_chart(
    id: &str,
    title: &str,
    table: &AggregatedTable,
    metrics: &[Metric],
    reduction: Reduction,
    color: &str,
) -> ChartSpec {
    let mut rows = Vec::new();
    for row in &table.rows {
        let GroupValue::Month(month) = row.key else {
            continue;
        };
        for &metric in metrics {
            if let Some(value) = row.get(metric, reduction) {
                rows.push(json!({
                    "month": month.name(),
                    "metric": metric.label(),
                    "value": value,
                    "days": row.count,
                }));
            }
        }
    }

    let color = if metrics.len() > 1 {
        ColorRule::ByField {
            field: FieldEncoding::new("metric", FieldType::Nominal).titled("Metric"),
        }
    } else {
        ColorRule::Fixed {
            color: color.to_string(),
        }
    };
    let encoding = EncodingSpec {
        x: FieldEncoding::new("month", FieldType::Ordinal)
            .titled("Month")
            .sorted(Month::canonical_names()),
        y: FieldEncoding::new("value", FieldType::Quantitative)
            .titled(format!("{} per household per day (kWh)", reduction.name())),
        color,
        tooltip: vec![
            FieldEncoding::new("month", FieldType::Ordinal),
            FieldEncoding::new("metric", FieldType::Nominal),
            FieldEncoding::new("value", FieldType::Quantitative),
            FieldEncoding::new("days", FieldType::Quantitative).titled("Records"),
        ],
    };
    chart(id, title, ChartKind::Bar, rows, &encoding)
}

/// Plain line chart of a single series.
pub fn series_line_chart(id: &str, title: &str, series: &TimeSeries, y_title: &str, color: &str) -> ChartSpec {
    let rows = series
        .points()
        .iter()
        .map(|p| json!({ "date": p.date, "value": p.value }))
        .collect();
    let encoding = EncodingSpec {
        x: FieldEncoding::new("date", FieldType::Temporal).titled("Date"),
        y: FieldEncoding::new("value", FieldType::Quantitative).titled(y_title),
        color: ColorRule::Fixed {
            color: color.to_string(),
        },
        tooltip: vec![
            FieldEncoding::new("date", FieldType::Temporal),
            FieldEncoding::new("value", FieldType::Quantitative).titled(y_title),
        ],
    };
    chart(id, title, ChartKind::Line, rows, &encoding)
}

/// Line chart coloured by threshold runs.
pub fn segmented_line_chart(
    id: &str,
    title: &str,
    points: &[SegmentedPoint],
    threshold: f64,
    y_title: &str,
    above: &str,
    below: &str,
) -> ChartSpec {
    let rows = points
        .iter()
        .map(|p| {
            json!({
                "date": p.date,
                "value": p.value,
                "band": if p.above { "above" } else { "below" },
                "segment": p.segment,
            })
        })
        .collect();
    let encoding = EncodingSpec {
        x: FieldEncoding::new("date", FieldType::Temporal).titled("Week"),
        y: FieldEncoding::new("value", FieldType::Quantitative).titled(y_title),
        color: ColorRule::Threshold {
            flag_field: "band".to_string(),
            segment_field: "segment".to_string(),
            threshold,
            above: above.to_string(),
            below: below.to_string(),
        },
        tooltip: vec![
            FieldEncoding::new("date", FieldType::Temporal),
            FieldEncoding::new("value", FieldType::Quantitative).titled(y_title),
            FieldEncoding::new("band", FieldType::Nominal),
        ],
    };
    chart(id, title, ChartKind::Line, rows, &encoding)
}

/// Scale values so the largest equals 100. Series without a positive
/// maximum are returned unchanged.
pub fn index_to_max(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        values.iter().map(|v| v / max * 100.0).collect()
    } else {
        values.to_vec()
    }
}

/// Two aligned series on one indexed axis (largest value = 100 per series).
pub fn aligned_line_chart(
    id: &str,
    title: &str,
    aligned: &AlignedSeries,
    left_label: &str,
    right_label: &str,
) -> ChartSpec {
    let left: Vec<f64> = aligned.points.iter().map(|p| p.left).collect();
    let right: Vec<f64> = aligned.points.iter().map(|p| p.right).collect();
    let (left_idx, right_idx) = (index_to_max(&left), index_to_max(&right));

    let mut rows = Vec::with_capacity(aligned.points.len() * 2);
    for (i, p) in aligned.points.iter().enumerate() {
        rows.push(json!({ "date": p.date, "series": left_label, "index": left_idx[i], "value": p.left }));
        rows.push(json!({ "date": p.date, "series": right_label, "index": right_idx[i], "value": p.right }));
    }

    let encoding = EncodingSpec {
        x: FieldEncoding::new("date", FieldType::Temporal).titled("Date"),
        y: FieldEncoding::new("index", FieldType::Quantitative).titled("Index (max = 100)"),
        color: ColorRule::ByField {
            field: FieldEncoding::new("series", FieldType::Nominal).titled("Series"),
        },
        tooltip: vec![
            FieldEncoding::new("date", FieldType::Temporal),
            FieldEncoding::new("series", FieldType::Nominal),
            FieldEncoding::new("value", FieldType::Quantitative),
        ],
    };
    chart(id, title, ChartKind::Line, rows, &encoding)
}

/// Bar chart of per-household values, bars in the given order.
pub fn household_bar_chart(id: &str, title: &str, bars: &[(String, f64)], y_title: &str, color: &str) -> ChartSpec {
    let rows = bars
        .iter()
        .map(|(user, value)| json!({ "user_id": user, "value": value }))
        .collect();
    let encoding = EncodingSpec {
        x: FieldEncoding::new("user_id", FieldType::Nominal)
            .titled("Household")
            .sorted(bars.iter().map(|(u, _)| u.clone()).collect()),
        y: FieldEncoding::new("value", FieldType::Quantitative).titled(y_title),
        color: ColorRule::Fixed {
            color: color.to_string(),
        },
        tooltip: vec![
            FieldEncoding::new("user_id", FieldType::Nominal),
            FieldEncoding::new("value", FieldType::Quantitative).titled(y_title),
        ],
    };
    chart(id, title, ChartKind::Bar, rows, &encoding)
}

/// Initial map view centred on the points (Denmark when empty).
fn view_state(lons: impl Iterator<Item = f64>, lats: impl Iterator<Item = f64>) -> Value {
    let (lons, lats): (Vec<f64>, Vec<f64>) = (lons.collect(), lats.collect());
    let centre = |v: &[f64], fallback: f64| {
        if v.is_empty() {
            fallback
        } else {
            v.iter().sum::<f64>() / v.len() as f64
        }
    };
    json!({
        "longitude": centre(&lons, 10.5),
        "latitude": centre(&lats, 56.0),
        "zoom": 6.5,
        "pitch": 45,
    })
}

/// Extruded hexagon layer; elevation and colour follow the cell mean.
pub fn hexagon_map(id: &str, title: &str, cells: &[HexCell], metric: Metric, radius_deg: f64, color: &str) -> ChartSpec {
    let max_mean = cells.iter().map(|c| c.mean).fold(0.0_f64, f64::max);
    let data: Vec<Value> = cells
        .iter()
        .map(|c| {
            json!({
                "position": [c.center_lon, c.center_lat],
                "count": c.count,
                "mean": c.mean,
                "sum": c.sum,
            })
        })
        .collect();

    ChartSpec {
        id: id.to_string(),
        title: title.to_string(),
        kind: ChartKind::HexagonMap,
        spec: json!({
            "layer": "HexagonLayer",
            "data": data,
            "radius_deg": radius_deg,
            "elevation_field": "mean",
            "elevation_domain": [0.0, max_mean],
            "color_field": "mean",
            "base_color": color,
            "extruded": true,
            "tooltip": { "metric": metric.label(), "fields": ["count", "mean"] },
            "initial_view_state": view_state(
                cells.iter().map(|c| c.center_lon),
                cells.iter().map(|c| c.center_lat),
            ),
        }),
    }
}

/// Weighted heatmap layer.
pub fn heatmap(id: &str, title: &str, points: &[WeightedPoint], metric: Metric) -> ChartSpec {
    let data: Vec<Value> = points
        .iter()
        .map(|p| json!({ "position": [p.lon, p.lat], "weight": p.weight }))
        .collect();

    ChartSpec {
        id: id.to_string(),
        title: title.to_string(),
        kind: ChartKind::Heatmap,
        spec: json!({
            "layer": "HeatmapLayer",
            "data": data,
            "weight_field": "weight",
            "aggregation": "MEAN",
            "tooltip": { "metric": metric.label() },
            "initial_view_state": view_state(points.iter().map(|p| p.lon), points.iter().map(|p| p.lat)),
        }),
    }
}

#[cfg(test)]
#[path = "charts_tests.rs"]
mod charts_tests;
