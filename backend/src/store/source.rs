use std::sync::Arc;

use super::error::DashboardResult;
use crate::config::DashboardConfig;
use crate::models::Tables;
use crate::parsing;

/// Where a session's tables come from.
pub trait TableSource: Send + Sync {
    /// Build the full set of tables. Called at most once per session.
    fn load_tables(&self) -> DashboardResult<Tables>;

    /// Short human-readable description for logs.
    fn describe(&self) -> String;
}

/// Reads the configured CSV files from disk.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    config: Arc<DashboardConfig>,
}

impl CsvTableSource {
    pub fn new(config: Arc<DashboardConfig>) -> Self {
        Self { config }
    }
}

impl TableSource for CsvTableSource {
    fn load_tables(&self) -> DashboardResult<Tables> {
        let started = std::time::Instant::now();
        let (tables, reports) = parsing::load_tables(&self.config.data, &self.config.limits)?;
        tracing::info!(
            usage_rows = tables.usage.len(),
            tables = reports.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded dashboard tables from {}",
            self.config.data.directory.display()
        );
        Ok(tables)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.config.data.directory.display())
    }
}

/// Serves a prebuilt set of tables, for tests and demos.
#[derive(Debug, Clone)]
pub struct InMemoryTableSource {
    tables: Tables,
}

impl InMemoryTableSource {
    pub fn new(tables: Tables) -> Self {
        Self { tables }
    }
}

impl TableSource for InMemoryTableSource {
    fn load_tables(&self) -> DashboardResult<Tables> {
        Ok(self.tables.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{} usage rows", self.tables.usage.len())
    }
}
