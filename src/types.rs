use serde::{Deserialize, Serialize};

/// One rights-holder parsed out of a composer or publisher cell,
/// e.g. `Alice (ASCAP 60) [00012345678]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    /// Performance rights organization, e.g. `ASCAP`
    pub org: String,
    /// Percentage of the track attributed to this entry
    pub share: u32,
    /// IPI or similar identifier; empty when the token carries none
    pub identifier: String,
}

/// The fields of one sheet row the aggregator cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub marker: String,
    pub composers: String,
    pub publishers: Option<String>,
}

impl RawRow {
    /// Whether the completeness marker contains `pattern` (case-sensitive substring)
    pub fn is_full_track(&self, pattern: &str) -> bool {
        self.marker.contains(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FULL_TRACK_MARKER;

    fn row(marker: &str) -> RawRow {
        RawRow {
            marker: marker.to_string(),
            composers: String::new(),
            publishers: None,
        }
    }

    #[test]
    fn test_marker_is_substring_match() {
        assert!(row("Full").is_full_track(FULL_TRACK_MARKER));
        assert!(row("Full track").is_full_track(FULL_TRACK_MARKER));
        assert!(row("Not Full").is_full_track(FULL_TRACK_MARKER));
        assert!(!row("full").is_full_track(FULL_TRACK_MARKER));
        assert!(!row("Partial").is_full_track(FULL_TRACK_MARKER));
        assert!(!row("").is_full_track(FULL_TRACK_MARKER));
    }
}
