use rayon::ThreadPool;
use tracing::info;

use enpa_core::{Config, DataShare, EnpaError, Result};

use crate::date_filter::DateFilter;

/// Runs a [`DateFilter`] over in-memory batches on a dedicated rayon pool.
pub struct FilterRunner {
    filter: DateFilter,
    pool: ThreadPool,
}

impl FilterRunner {
    /// Build a runner with `worker_threads` threads (0 = available parallelism).
    pub fn new(filter: DateFilter, worker_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|i| format!("date-filter-{i}"))
            .build()
            .map_err(|e| EnpaError::ThreadPool(e.to_string()))?;

        info!(
            window = %filter.window(),
            threads = pool.current_num_threads(),
            "date filter runner ready"
        );
        Ok(Self { filter, pool })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let filter = DateFilter::from_config(config)?;
        Self::new(filter, config.workers.resolved_worker_threads())
    }

    pub fn filter(&self) -> &DateFilter {
        &self.filter
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn run(&self, shares: Vec<DataShare>) -> Vec<DataShare> {
        self.pool.install(|| self.filter.filter_par(shares))
    }
}
