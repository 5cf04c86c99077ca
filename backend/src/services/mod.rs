//! Service layer: filtering, aggregation and chart rendering.
//!
//! Everything here is synchronous and pure. The HTTP layer hands in loaded
//! tables and a filter state and receives a finished page view.

pub mod aggregation;
pub mod charts;
pub mod filter;
pub mod hexbin;
pub mod interpolation;
pub mod pages;
pub mod segments;
pub mod stats;
pub mod widgets;

pub use aggregation::{aggregate, AggSpec, AggregatedTable, GroupKey, Reduction};
pub use filter::{filter_series, filter_usage, FilterOutcome};
pub use interpolation::{align, AlignedSeries};
pub use pages::render_page;
pub use segments::segment_by_threshold;
pub use widgets::declare_widgets;
