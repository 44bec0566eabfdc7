use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{AlbumTally, OrgAccumulator, PersonAccumulator, Rollup, RunStats, SortKey};
use crate::error::Result;

/// Format a percentage with at most two decimals and no trailing zeros,
/// e.g. `33.333 -> "33.33%"`, `10.10 -> "10.1%"`, `0 -> "0%"`.
pub fn format_percentage(value: f64) -> String {
    if value == 0.0 {
        return "0%".to_string();
    }
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}

/// Order of the two displayed lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub composer_sort: SortKey,
    pub rollup_sort: SortKey,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            composer_sort: SortKey::Points,
            rollup_sort: SortKey::Percentage,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "target", content = "entries", rename_all = "lowercase")]
pub enum RollupView<'a> {
    Publishers(Vec<&'a PersonAccumulator>),
    Organizations(Vec<&'a OrgAccumulator>),
}

/// Sorted, display-ready view of an `AlbumTally`
#[derive(Debug, Serialize)]
pub struct AlbumReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
    pub track_count: usize,
    pub total_points: u64,
    pub composers: Vec<&'a PersonAccumulator>,
    pub rollup: RollupView<'a>,
    pub stats: &'a RunStats,
}

impl<'a> AlbumReport<'a> {
    pub fn new(tally: &'a AlbumTally, options: ReportOptions) -> Self {
        let rollup = match &tally.rollup {
            Rollup::Publishers(set) => RollupView::Publishers(set.sorted_by(options.rollup_sort)),
            Rollup::Organizations(set) => {
                RollupView::Organizations(set.sorted_by(options.rollup_sort))
            }
        };
        Self {
            source: None,
            analyzed_at: None,
            track_count: tally.track_count,
            total_points: tally.total_points,
            composers: tally.composers.sorted_by(options.composer_sort),
            rollup,
            stats: &tally.stats,
        }
    }

    /// Attach the analyzed file and time; shown in JSON output only
    pub fn with_source(mut self, source: &'a str, analyzed_at: DateTime<Utc>) -> Self {
        self.source = Some(source);
        self.analyzed_at = Some(analyzed_at);
        self
    }

    /// Plain-text rendering: lists, album summary, then one line per composer
    pub fn render_text(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Composers: {}", join_people(&self.composers)));
        match &self.rollup {
            RollupView::Publishers(publishers) => {
                lines.push(format!("Publishers: {}", join_people(publishers)));
            }
            RollupView::Organizations(orgs) => {
                let joined = orgs
                    .iter()
                    .map(|o| format!("{} {}", o.org, format_percentage(o.percentage)))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("PRO requirements: {}", joined));
            }
        }

        lines.push(format!(
            "The album has {} tracks ({} points)",
            self.track_count, self.total_points
        ));

        for composer in &self.composers {
            match self.rollup {
                RollupView::Publishers(_) => {
                    lines.push(format!("{}: {} points", composer.name, composer.points));
                }
                RollupView::Organizations(_) => lines.push(format!(
                    "{}: {} points ({})",
                    composer.name,
                    composer.points,
                    format_percentage(composer.percentage)
                )),
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn format_person(p: &PersonAccumulator) -> String {
    format!(
        "{} ({}) {} [{}]",
        p.name,
        p.org,
        format_percentage(p.percentage),
        p.identifier
    )
}

fn join_people(people: &[&PersonAccumulator]) -> String {
    people
        .iter()
        .map(|p| format_person(p))
        .collect::<Vec<_>>()
        .join(", ")
}
