use serde::{Deserialize, Serialize};

/// Row accounting for one loaded table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub table: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows dropped because a required cell was missing or malformed.
    pub rows_dropped: usize,
    /// Cells pulled back into the plausible value range.
    pub values_clamped: usize,
}

impl LoadReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn keep(&mut self) {
        self.rows_read += 1;
        self.rows_kept += 1;
    }

    pub fn drop_row(&mut self) {
        self.rows_read += 1;
        self.rows_dropped += 1;
    }

    pub fn log(&self) {
        if self.rows_dropped > 0 || self.values_clamped > 0 {
            tracing::warn!(
                table = %self.table,
                rows_read = self.rows_read,
                rows_kept = self.rows_kept,
                rows_dropped = self.rows_dropped,
                values_clamped = self.values_clamped,
                "Loaded table with rejected or clamped cells"
            );
        } else {
            tracing::debug!(
                table = %self.table,
                rows_read = self.rows_read,
                "Loaded table"
            );
        }
    }
}
