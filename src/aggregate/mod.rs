//! Album-wide aggregation of rights-holder shares.
//!
//! Rows whose completeness marker contains the configured pattern count as
//! tracks. Each track contributes up to 100 points, split across the entries
//! of its composer cell (and publisher cell, for the publisher rollup).
//! Percentages are points over `tracks * 100`.

mod accumulator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::{ColumnLayout, Config};
use crate::constants::{
    get_supported_rollups, FULL_TRACK_MARKER, POINTS_PER_TRACK, ROLLUP_ORGANIZATIONS,
    ROLLUP_PUBLISHERS,
};
use crate::error::{AnalyzerError, Result};
use crate::parser::parse_cell;
use crate::table::Table;
use crate::types::RawRow;

pub use accumulator::{
    percentage_of, AccumulatorSet, OrgAccumulator, PersonAccumulator, Tally,
};

/// What the second accumulator set is keyed by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollupTarget {
    /// Publishers parsed from the publisher column
    #[default]
    Publishers,
    /// Rights organizations of the composer entries
    Organizations,
}

impl fmt::Display for RollupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollupTarget::Publishers => f.write_str(ROLLUP_PUBLISHERS),
            RollupTarget::Organizations => f.write_str(ROLLUP_ORGANIZATIONS),
        }
    }
}

impl FromStr for RollupTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            ROLLUP_PUBLISHERS => Ok(RollupTarget::Publishers),
            ROLLUP_ORGANIZATIONS => Ok(RollupTarget::Organizations),
            other => Err(format!(
                "unknown rollup '{}' (expected one of: {})",
                other,
                get_supported_rollups().join(", ")
            )),
        }
    }
}

/// Field a sorted view is ordered by (always descending)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Points,
    Percentage,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "points" => Ok(SortKey::Points),
            "percentage" => Ok(SortKey::Percentage),
            other => Err(format!(
                "unknown sort key '{}' (expected points or percentage)",
                other
            )),
        }
    }
}

/// Second accumulator set of an album
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "target", content = "entries", rename_all = "lowercase")]
pub enum Rollup {
    Publishers(AccumulatorSet<PersonAccumulator>),
    Organizations(AccumulatorSet<OrgAccumulator>),
}

impl Rollup {
    fn for_target(target: RollupTarget) -> Self {
        match target {
            RollupTarget::Publishers => Rollup::Publishers(AccumulatorSet::new()),
            RollupTarget::Organizations => Rollup::Organizations(AccumulatorSet::new()),
        }
    }

    pub fn target(&self) -> RollupTarget {
        match self {
            Rollup::Publishers(_) => RollupTarget::Publishers,
            Rollup::Organizations(_) => RollupTarget::Organizations,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Rollup::Publishers(set) => set.len(),
            Rollup::Organizations(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn normalize(&mut self, total_points: u64) {
        match self {
            Rollup::Publishers(set) => set.normalize(total_points),
            Rollup::Organizations(set) => set.normalize(total_points),
        }
    }
}

/// Counters collected while aggregating
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub rows_scanned: usize,
    pub rows_qualifying: usize,
    pub tokens_seen: usize,
    pub entries_parsed: usize,
    pub tokens_dropped: usize,
    /// Names holding more points than the album has
    pub over_allocated: Vec<String>,
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Serialize)]
pub struct AlbumTally {
    pub track_count: usize,
    pub total_points: u64,
    pub composers: AccumulatorSet<PersonAccumulator>,
    pub rollup: Rollup,
    pub stats: RunStats,
}

/// Settings for one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOptions {
    pub layout: ColumnLayout,
    pub marker_pattern: String,
    pub rollup: RollupTarget,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            marker_pattern: FULL_TRACK_MARKER.to_string(),
            rollup: RollupTarget::Publishers,
        }
    }
}

impl From<&Config> for AggregationOptions {
    fn from(config: &Config) -> Self {
        Self {
            layout: config.columns.clone(),
            marker_pattern: config.aggregation.marker_pattern.clone(),
            rollup: config.aggregation.rollup,
        }
    }
}

pub struct Aggregator {
    options: AggregationOptions,
}

impl Aggregator {
    pub fn new(options: AggregationOptions) -> Self {
        Self { options }
    }

    /// Aggregate a loaded table. Missing columns or no qualifying rows
    /// yield `AnalyzerError::InvalidInput`.
    #[instrument(skip_all, fields(rollup = %self.options.rollup))]
    pub fn aggregate(&self, table: &Table) -> Result<AlbumTally> {
        for col in self.options.layout.required(self.options.rollup) {
            if !table.has_column(col) {
                warn!(
                    "Rejecting table: column {} missing (width {})",
                    col,
                    table.width()
                );
                return Err(AnalyzerError::InvalidInput(format!(
                    "column {} missing from table of width {}",
                    col,
                    table.width()
                )));
            }
        }
        self.aggregate_rows(table.raw_rows(&self.options.layout))
    }

    /// Aggregate already projected rows. Yields `InvalidInput` when no row qualifies.
    pub fn aggregate_rows<I>(&self, rows: I) -> Result<AlbumTally>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut stats = RunStats::default();
        let mut composers: AccumulatorSet<PersonAccumulator> = AccumulatorSet::new();
        let mut rollup = Rollup::for_target(self.options.rollup);

        for row in rows {
            stats.rows_scanned += 1;
            if !row.is_full_track(&self.options.marker_pattern) {
                continue;
            }
            stats.rows_qualifying += 1;

            let (entries, dropped) = parse_cell(&row.composers);
            stats.tokens_seen += entries.len() + dropped;
            stats.entries_parsed += entries.len();
            stats.tokens_dropped += dropped;

            for entry in &entries {
                composers
                    .get_or_insert_with(&entry.name, || PersonAccumulator::new(&entry.name))
                    .record(entry);
            }

            match &mut rollup {
                Rollup::Organizations(orgs) => {
                    for entry in entries.iter().filter(|e| !e.org.is_empty()) {
                        orgs.get_or_insert_with(&entry.org, || OrgAccumulator::new(&entry.org))
                            .record(entry);
                    }
                }
                Rollup::Publishers(publishers) => {
                    let cell = row.publishers.as_deref().unwrap_or("");
                    let (entries, dropped) = parse_cell(cell);
                    stats.tokens_seen += entries.len() + dropped;
                    stats.entries_parsed += entries.len();
                    stats.tokens_dropped += dropped;

                    for entry in &entries {
                        publishers
                            .get_or_insert_with(&entry.name, || {
                                PersonAccumulator::new(&entry.name)
                            })
                            .record(entry);
                    }
                }
            }
        }

        let track_count = stats.rows_qualifying;
        if track_count == 0 {
            warn!(
                "Rejecting table: no row marked '{}' among {} rows",
                self.options.marker_pattern, stats.rows_scanned
            );
            return Err(AnalyzerError::InvalidInput(format!(
                "no rows contain marker '{}'",
                self.options.marker_pattern
            )));
        }

        let total_points = track_count as u64 * POINTS_PER_TRACK;
        composers.normalize(total_points);
        rollup.normalize(total_points);

        stats.over_allocated = composers
            .over_limit(total_points)
            .map(|c| c.key().to_string())
            .collect();
        if let Rollup::Publishers(publishers) = &rollup {
            stats
                .over_allocated
                .extend(publishers.over_limit(total_points).map(|p| p.key().to_string()));
        }
        if !stats.over_allocated.is_empty() {
            warn!(
                "Points exceed the album total of {} for: {}",
                total_points,
                stats.over_allocated.join(", ")
            );
        }

        debug!("Aggregation stats: {:?}", stats);
        info!(
            "Aggregated {} tracks: composers={} {}={} dropped_tokens={}",
            track_count,
            composers.len(),
            rollup.target(),
            rollup.len(),
            stats.tokens_dropped
        );

        Ok(AlbumTally {
            track_count,
            total_points,
            composers,
            rollup,
            stats,
        })
    }
}
