use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::aggregate::{AggregationOptions, Aggregator, AlbumTally};
use crate::config::Config;
use crate::error::Result;
use crate::report::{AlbumReport, ReportOptions};
use crate::table::load_table;

/// Result of analyzing one file
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub source: String,
    pub analyzed_at: DateTime<Utc>,
    pub tally: AlbumTally,
}

impl PipelineResult {
    /// Sorted view using the configured sort keys
    pub fn report(&self, config: &Config) -> AlbumReport<'_> {
        AlbumReport::new(
            &self.tally,
            ReportOptions {
                composer_sort: config.aggregation.composer_sort,
                rollup_sort: config.aggregation.rollup_sort,
            },
        )
        .with_source(&self.source, self.analyzed_at)
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Load `path` and aggregate it. Every call starts from fresh accumulators.
    #[instrument(skip(config), fields(path = %path.display()))]
    pub fn run_for_file(path: &Path, config: &Config, sheet: Option<&str>) -> Result<PipelineResult> {
        let started = Instant::now();
        let table = load_table(path, sheet)?;
        let tally = Aggregator::new(AggregationOptions::from(config)).aggregate(&table)?;

        info!(
            "Pipeline finished in {:.1}ms: tracks={} composers={}",
            started.elapsed().as_secs_f64() * 1000.0,
            tally.track_count,
            tally.composers.len()
        );

        Ok(PipelineResult {
            source: path.display().to_string(),
            analyzed_at: Utc::now(),
            tally,
        })
    }
}
