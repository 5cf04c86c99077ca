//! Solar dashboard HTTP server binary
//!
//! Main entry point for the dashboard REST API. It loads the configuration,
//! sets up the session store and router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin solar-dash-server
//!
//! # Explicit configuration file
//! DASHBOARD_CONFIG=/etc/solar/dashboard.toml cargo run --bin solar-dash-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `DASHBOARD_CONFIG`: Path to `dashboard.toml` (default: search standard locations)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use solar_dash::config::DashboardConfig;
use solar_dash::http::{create_router, AppState};
use solar_dash::store::{CsvTableSource, SessionStore, TableSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting solar dashboard server");

    let config = Arc::new(DashboardConfig::load()?);
    info!(
        data_dir = %config.data.directory.display(),
        idle_ttl_secs = config.session.idle_ttl_secs,
        "Configuration loaded"
    );

    let source = Arc::new(CsvTableSource::new(config.clone())) as Arc<dyn TableSource>;
    let state = AppState::new(source, config.clone());

    spawn_session_sweeper(
        state.sessions.clone(),
        Duration::from_secs(config.session.sweep_interval_secs.max(1)),
    );

    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    Ok(())
}

/// Periodically drop sessions that have been idle past their TTL.
fn spawn_session_sweeper(sessions: SessionStore, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            sessions.evict_idle(Instant::now());
        }
    });
}
