use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregate::{RollupTarget, SortKey};
use crate::constants::{
    DEFAULT_COMPOSER_COLUMN, DEFAULT_MARKER_COLUMN, DEFAULT_PUBLISHER_COLUMN, FULL_TRACK_MARKER,
};
use crate::error::{AnalyzerError, Result};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnLayout,
    pub aggregation: AggregationConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Zero-based column positions in a header-less sheet
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnLayout {
    pub marker: usize,
    pub composers: usize,
    pub publishers: Option<usize>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER_COLUMN,
            composers: DEFAULT_COMPOSER_COLUMN,
            publishers: Some(DEFAULT_PUBLISHER_COLUMN),
        }
    }
}

impl ColumnLayout {
    /// Columns the configured rollup needs to be present in the table
    pub fn required(&self, rollup: RollupTarget) -> Vec<usize> {
        let mut cols = vec![self.marker, self.composers];
        if rollup == RollupTarget::Publishers {
            cols.extend(self.publishers);
        }
        cols
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AggregationConfig {
    /// Substring that marks a row as a full track
    pub marker_pattern: String,
    pub rollup: RollupTarget,
    /// Order of the composer list and per-composer lines
    pub composer_sort: SortKey,
    /// Order of the publisher / organization list
    pub rollup_sort: SortKey,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            marker_pattern: FULL_TRACK_MARKER.to_string(),
            rollup: RollupTarget::Publishers,
            composer_sort: SortKey::Points,
            rollup_sort: SortKey::Percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// When set, a daily-rolling JSON log is written here
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            AnalyzerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `default_path` if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>, default_path: &Path) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if default_path.is_file() => Self::load(default_path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.aggregation.marker_pattern.is_empty() {
            return Err(AnalyzerError::Config(
                "aggregation.marker_pattern must not be empty".to_string(),
            ));
        }
        if self.aggregation.rollup == RollupTarget::Publishers && self.columns.publishers.is_none()
        {
            return Err(AnalyzerError::Config(
                "rollup 'publishers' requires columns.publishers".to_string(),
            ));
        }
        Ok(())
    }
}
