//! Configuration for mapping runs.
//!
//! A [`MapperConfig`] is applied once, before a run starts; nothing here is
//! consulted mid-run.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration surface for a mapping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    /// 0-based index of the header row within the input matrix
    pub header_index: usize,

    /// Sheet/section selector, meaningful only to the row-source reader.
    /// `None` selects the source's first sheet.
    pub sheet: Option<String>,

    /// Requested worker count: 0 or 1 runs the sequential path, anything
    /// larger a worker pool of that size (clamped to hardware parallelism)
    pub workers: usize,

    /// Recoverable-failure policy: `false` aborts on required/parse
    /// failures (strict), `true` records them and continues
    pub skip: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            header_index: 0,
            sheet: None,
            workers: 0,
            skip: false,
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header row index
    pub fn with_header_index(mut self, index: usize) -> Self {
        self.header_index = index;
        self
    }

    /// Select a sheet by name
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Request a worker pool of the given size
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Record recoverable failures instead of aborting
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    /// Worker count actually used for a run
    ///
    /// 0 means the sequential path. A request of 0 or 1 is sequential;
    /// larger requests keep the worker path even when hardware
    /// parallelism clamps the pool size, because the two paths differ in
    /// failure semantics, not just speed.
    pub fn effective_workers(&self) -> usize {
        if self.workers <= 1 {
            return 0;
        }
        let cores = num_cpus::get().max(1);
        if self.workers > cores {
            debug!(
                "Clamping requested worker count {} to {} available cores",
                self.workers, cores
            );
            cores
        } else {
            self.workers
        }
    }
}
