//! Mapping run statistics and result reporting
//!
//! A [`MapReport`] is returned by every successful run: counts for
//! monitoring plus the accumulated row-level diagnostics, readable only
//! after the call returns.

use serde::{Deserialize, Serialize};

use crate::error::RowError;

/// Statistics and diagnostics for one mapping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapReport {
    /// Number of data rows encountered (header excluded)
    pub rows_total: usize,

    /// Number of records appended to the destination
    pub records_mapped: usize,

    /// Number of rows dropped by row-level aborts
    pub rows_dropped: usize,

    /// Recoverable per-row diagnostics, in no particular order across
    /// workers
    pub errors: Vec<RowError>,
}

impl MapReport {
    /// Create an empty report for a run over `rows_total` data rows
    pub fn new(rows_total: usize) -> Self {
        Self {
            rows_total,
            records_mapped: 0,
            rows_dropped: 0,
            errors: Vec::new(),
        }
    }

    /// Share of rows that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.rows_total == 0 {
            0.0
        } else {
            (self.records_mapped as f64 / self.rows_total as f64) * 100.0
        }
    }

    /// Whether the run completed without any row-level diagnostics
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.rows_dropped == 0
    }
}

impl Default for MapReport {
    fn default() -> Self {
        Self::new(0)
    }
}
