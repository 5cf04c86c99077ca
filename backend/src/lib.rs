//! # Solar dashboard backend
//!
//! Data service behind a multi-page dashboard of Danish household solar
//! production and usage.
//!
//! The crate loads the dashboard's CSV tables once per session, applies the
//! sidebar filters and renders each page as declarative chart specifications
//! (Vega-Lite for line and bar charts, deck.gl-style layers for the maps).
//!
//! ## Architecture
//!
//! - [`parsing`]: CSV loaders for usage, age, search-index, forecast and gas tables
//! - [`store`]: session caches, table sources and error types
//! - [`services`]: filter, aggregation, interpolation and chart rendering
//! - [`routes`]: page, widget and chart types shared with the frontend
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`config`]: `dashboard.toml` settings
//!
//! Control flow for one interaction:
//!
//! ```text
//! request -> SessionCache (load once) -> filter -> aggregate -> charts -> PageView
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod parsing;
pub mod routes;
pub mod services;
pub mod store;

#[cfg(feature = "http-server")]
pub mod http;
