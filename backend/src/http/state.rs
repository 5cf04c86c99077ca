//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::config::DashboardConfig;
use crate::store::{SessionStore, TableSource};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where new sessions load their tables from
    pub source: Arc<dyn TableSource>,
    /// Open sessions and their cached tables
    pub sessions: SessionStore,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    /// Create a new application state. The session TTL comes from `config`.
    pub fn new(source: Arc<dyn TableSource>, config: Arc<DashboardConfig>) -> Self {
        let sessions = SessionStore::new(Duration::from_secs(config.session.idle_ttl_secs));
        Self {
            source,
            sessions,
            config,
        }
    }
}
