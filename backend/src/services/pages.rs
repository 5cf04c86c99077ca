//! Page controller: `(tables, filter state, page) -> page view`.
//!
//! Rendering is a pure function of its inputs. Every page except `about`
//! starts from the filtered usage rows so the row count and the date-range
//! notice behave the same everywhere.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::aggregation::{aggregate, daily_series, AggSpec, GroupKey, GroupValue, Reduction};
use super::charts::{
    aligned_line_chart, heatmap, hexagon_map, household_bar_chart, monthly_bar_chart,
    segmented_line_chart, series_line_chart,
};
use super::filter::{filter_series, filter_usage};
use super::hexbin::{hexbin, WeightedPoint};
use super::interpolation::align;
use super::segments::{crossing_count, segment_by_threshold};
use super::stats::{compute_stats, correlation, mean};
use crate::config::ChartsConfig;
use crate::models::{FilterState, Frequency, Metric, Tables, UsageRecord};
use crate::routes::pages::{Kpi, Notice, Page, PageView};

/// Shown when the filters leave no usage rows.
pub const NO_DATA_MESSAGE: &str = "No households match the selected filters.";

/// Link offered on the about page.
pub const NOTEBOOK_LINK: &str = "/v1/notebook";

const ABOUT_TEXT: &str = "This dashboard shows daily production, self-consumption and grid \
purchases of Danish households with rooftop solar panels. Use the sidebar to restrict the \
period, the owners' age and the production range. The interest page compares the national \
solar forecast with public search interest, the gas page compares gas prices with the power \
households buy from the grid. The analysis notebook behind the figures can be downloaded \
below.";

fn kpi(label: &str, value: f64, unit: &str) -> Kpi {
    Kpi {
        label: label.to_string(),
        value,
        unit: unit.to_string(),
    }
}

fn chart_id(page: Page, name: &str) -> String {
    format!("{}-{}", page.key(), name)
}

fn household_count(records: &[UsageRecord]) -> usize {
    records.iter().map(|r| r.user_id.as_str()).collect::<BTreeSet<_>>().len()
}

/// Render one page.
pub fn render_page(tables: &Tables, state: &FilterState, page: Page, charts: &ChartsConfig) -> PageView {
    let mut view = PageView {
        page,
        title: page.title().to_string(),
        body: None,
        kpis: Vec::new(),
        charts: Vec::new(),
        notices: Vec::new(),
        row_count: 0,
    };

    if page == Page::About {
        view.body = Some(format!("{}\n\nNotebook: {}", ABOUT_TEXT, NOTEBOOK_LINK));
        view.row_count = tables.usage.len();
        return view;
    }

    let outcome = filter_usage(&tables.usage, state);
    view.row_count = outcome.records.len();
    view.notices = outcome.notices;

    match page {
        Page::Overview => overview(&mut view, &outcome.records, state),
        Page::Households => households(&mut view, &outcome.records, state, charts),
        Page::Map => map(&mut view, &outcome.records, state, charts),
        Page::Interest => interest(&mut view, tables, state, charts),
        Page::Gas => gas(&mut view, tables, &outcome.records, state),
        Page::About => {}
    }

    debug!(
        page = page.key(),
        rows = view.row_count,
        charts = view.charts.len(),
        notices = view.notices.len(),
        "Rendered page"
    );
    view
}

fn overview(view: &mut PageView, records: &[UsageRecord], state: &FilterState) {
    if records.is_empty() {
        view.notices.push(Notice::warning(NO_DATA_MESSAGE));
        return;
    }

    let toggles = &state.toggles;
    let mut metrics = vec![Metric::Produced];
    if toggles.show_self_used {
        metrics.push(Metric::SelfUsed);
    }
    if toggles.show_bought {
        metrics.push(Metric::Bought);
    }
    if toggles.show_night_usage {
        metrics.push(Metric::NightUsage);
    }

    let spec = metrics
        .iter()
        .fold(AggSpec::new(), |spec, &m| spec.with(m, Reduction::Mean));
    let monthly = aggregate(records, GroupKey::Month, &spec);
    view.charts.push(monthly_bar_chart(
        &chart_id(Page::Overview, "monthly"),
        "Mean daily power per household by month",
        &monthly,
        &metrics,
        Reduction::Mean,
        state.line_color.as_str(),
    ));

    let daily = daily_series(records, Metric::Produced, Reduction::Mean);
    view.charts.push(series_line_chart(
        &chart_id(Page::Overview, "daily"),
        "Mean daily production per household",
        &daily,
        Metric::Produced.label(),
        state.line_color.as_str(),
    ));

    let produced: f64 = records.iter().map(|r| r.produced).sum();
    let self_used: f64 = records.iter().map(|r| r.self_used).sum();
    view.kpis.push(kpi("Households", household_count(records) as f64, ""));
    view.kpis.push(kpi("Total production", produced / 1000.0, "MWh"));
    if produced > 0.0 {
        view.kpis.push(kpi("Self-consumed share", self_used / produced * 100.0, "%"));
    }
}

fn households(view: &mut PageView, records: &[UsageRecord], state: &FilterState, charts: &ChartsConfig) {
    if records.is_empty() {
        view.notices.push(Notice::warning(NO_DATA_MESSAGE));
        return;
    }

    let spec = AggSpec::new()
        .with(Metric::Produced, Reduction::Sum)
        .with(Metric::Used, Reduction::Sum);
    let per_user = aggregate(records, GroupKey::UserId, &spec);

    let mut totals: Vec<(String, f64)> = per_user
        .rows
        .iter()
        .filter_map(|row| {
            row.get(Metric::Produced, Reduction::Sum)
                .map(|v| (row.key.label(), v))
        })
        .collect();
    // Largest producers first, ties by id
    totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let values: Vec<f64> = totals.iter().map(|(_, v)| *v).collect();
    let stats = compute_stats(&values);

    totals.truncate(charts.top_households);
    view.charts.push(household_bar_chart(
        &chart_id(Page::Households, "top"),
        &format!("Top {} producing households", totals.len()),
        &totals,
        "Total production (kWh)",
        state.line_color.as_str(),
    ));

    let used: Vec<f64> = per_user
        .rows
        .iter()
        .filter_map(|row| row.get(Metric::Used, Reduction::Sum))
        .collect();

    view.kpis.push(kpi("Households", stats.count as f64, ""));
    view.kpis.push(kpi("Mean production per household", stats.mean, "kWh"));
    view.kpis.push(kpi("Median production per household", stats.median, "kWh"));
    view.kpis.push(kpi("Min production per household", stats.min, "kWh"));
    view.kpis.push(kpi("Max production per household", stats.max, "kWh"));
    if let Some(mean_used) = mean(&used) {
        view.kpis.push(kpi("Mean usage per household", mean_used, "kWh"));
    }
}

fn map(view: &mut PageView, records: &[UsageRecord], state: &FilterState, charts: &ChartsConfig) {
    let metric = state.map_metric.metric();

    // Geospatial views need both coordinates and age
    let located: Vec<UsageRecord> = records
        .iter()
        .filter(|r| r.location().is_some() && r.age.is_some())
        .cloned()
        .collect();

    let mut locations: HashMap<&str, (f64, f64)> = HashMap::new();
    for record in &located {
        if let Some(location) = record.location() {
            locations.entry(record.user_id.as_str()).or_insert(location);
        }
    }

    let per_user = aggregate(&located, GroupKey::UserId, &AggSpec::new().with(metric, Reduction::Mean));

    let points: Vec<WeightedPoint> = per_user
        .rows
        .iter()
        .filter_map(|row| {
            let GroupValue::User(user) = &row.key else {
                return None;
            };
            let (lon, lat) = *locations.get(user.as_str())?;
            let weight = row.get(metric, Reduction::Mean)?;
            Some(WeightedPoint { lon, lat, weight })
        })
        .collect();

    let unlocated = household_count(records).saturating_sub(points.len());
    if unlocated > 0 {
        view.notices.push(Notice::info(format!(
            "{} household(s) without a known location or age are not shown on the map.",
            unlocated
        )));
    }
    if points.is_empty() {
        view.notices.push(Notice::warning(NO_DATA_MESSAGE));
        return;
    }

    let cells = hexbin(&points, charts.hexagon_radius_deg);
    view.charts.push(hexagon_map(
        &chart_id(Page::Map, "hexagons"),
        &format!("{} per household per day", metric.label()),
        &cells,
        metric,
        charts.hexagon_radius_deg,
        state.line_color.as_str(),
    ));
    view.charts.push(heatmap(
        &chart_id(Page::Map, "heatmap"),
        &format!("{} heatmap", metric.label()),
        &points,
        metric,
    ));

    let weights: Vec<f64> = points.iter().map(|p| p.weight).collect();
    view.kpis.push(kpi("Households on map", points.len() as f64, ""));
    view.kpis.push(kpi("Occupied cells", cells.len() as f64, ""));
    if let Some(m) = mean(&weights) {
        view.kpis.push(kpi(metric.label(), m, "kWh/day"));
    }
}

fn interest(view: &mut PageView, tables: &Tables, state: &FilterState, charts: &ChartsConfig) {
    let range = &state.date_range;
    let hourly = filter_series(&tables.forecast.hourly_mean, range);
    let weekly = filter_series(&tables.forecast.weekly_total, range);
    let search = filter_series(&tables.search_index, range);

    if hourly.is_empty() {
        view.notices
            .push(Notice::warning("No forecast data in the selected period."));
    } else {
        let threshold = charts.threshold_mwh_per_hour;
        let chart = if state.toggles.highlight_threshold {
            let points = segment_by_threshold(hourly.points(), threshold);
            segmented_line_chart(
                &chart_id(Page::Interest, "forecast"),
                "Forecast solar production per hour, weekly mean",
                &points,
                threshold,
                "MWh/h",
                &charts.threshold_color,
                &charts.below_threshold_color,
            )
        } else {
            series_line_chart(
                &chart_id(Page::Interest, "forecast"),
                "Forecast solar production per hour, weekly mean",
                &hourly,
                "MWh/h",
                state.line_color.as_str(),
            )
        };
        view.charts.push(chart);

        let above = hourly.points().iter().filter(|p| p.value > threshold).count();
        view.kpis.push(kpi("Weeks above threshold", above as f64, ""));
        view.kpis.push(kpi(
            "Threshold crossings",
            crossing_count(hourly.points(), threshold) as f64,
            "",
        ));
    }

    match align(&weekly, &search, Frequency::Weekly) {
        Some(aligned) => {
            view.charts.push(aligned_line_chart(
                &chart_id(Page::Interest, "aligned"),
                "Forecast production and search interest",
                &aligned,
                "Forecast production (MWh)",
                "Search interest",
            ));
            let (left, right): (Vec<f64>, Vec<f64>) =
                aligned.points.iter().map(|p| (p.left, p.right)).unzip();
            if let Some(r) = correlation(&left, &right) {
                view.kpis.push(kpi("Correlation", r, ""));
            }
        }
        None => view.notices.push(Notice::info(
            "Forecast or search interest data is missing for the selected period.",
        )),
    }
}

fn gas(view: &mut PageView, tables: &Tables, records: &[UsageRecord], state: &FilterState) {
    let prices = filter_series(&tables.gas_price, &state.date_range);
    if prices.is_empty() {
        view.notices
            .push(Notice::warning("No gas prices in the selected period."));
        return;
    }

    view.charts.push(series_line_chart(
        &chart_id(Page::Gas, "price"),
        "Gas price",
        &prices,
        "Price",
        state.line_color.as_str(),
    ));
    let price_values: Vec<f64> = prices.points().iter().map(|p| p.value).collect();
    if let Some(m) = mean(&price_values) {
        view.kpis.push(kpi("Mean gas price", m, ""));
    }

    let bought = daily_series(records, Metric::Bought, Reduction::Mean);
    match align(&prices, &bought, Frequency::Daily) {
        Some(aligned) => {
            view.charts.push(aligned_line_chart(
                &chart_id(Page::Gas, "aligned"),
                "Gas price and power bought from the grid",
                &aligned,
                "Gas price",
                "Mean power bought (kWh)",
            ));
            let (left, right): (Vec<f64>, Vec<f64>) =
                aligned.points.iter().map(|p| (p.left, p.right)).unzip();
            if let Some(r) = correlation(&left, &right) {
                view.kpis.push(kpi("Correlation", r, ""));
            }
        }
        None => view.notices.push(Notice::warning(NO_DATA_MESSAGE)),
    }
}

#[cfg(test)]
#[path = "pages_tests.rs"]
mod pages_tests;
