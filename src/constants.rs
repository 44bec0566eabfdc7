/// Column and grammar constants shared across the loader, aggregator and CLI.
/// Column indices are zero-based and refer to a header-less sheet.

// Default column layout of the split-sheet export
pub const DEFAULT_MARKER_COLUMN: usize = 18;
pub const DEFAULT_COMPOSER_COLUMN: usize = 22;
pub const DEFAULT_PUBLISHER_COLUMN: usize = 26;

/// Substring a completeness marker must contain for the row to count as a track
pub const FULL_TRACK_MARKER: &str = "Full";

/// Separator between rights-holder entries inside one cell
pub const ENTRY_SEPARATOR: char = ',';

/// Points available per qualifying track
pub const POINTS_PER_TRACK: u64 = 100;

/// The one message users see for a structurally unusable file
pub const INVALID_INPUT_MESSAGE: &str = "Invalid file or file format";

// Rollup target names (used in config and CLI)
pub const ROLLUP_PUBLISHERS: &str = "publishers";
pub const ROLLUP_ORGANIZATIONS: &str = "organizations";

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "analyzer.toml";

/// Get all supported rollup target names
pub fn get_supported_rollups() -> Vec<&'static str> {
    vec![ROLLUP_PUBLISHERS, ROLLUP_ORGANIZATIONS]
}
