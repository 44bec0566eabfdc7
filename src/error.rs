use thiserror::Error;

use crate::constants::INVALID_INPUT_MESSAGE;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet read failed: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Required columns are missing or no row qualifies as a full track.
    /// The reason is kept for logs; users only ever see the fixed message.
    #[error("{}", INVALID_INPUT_MESSAGE)]
    InvalidInput(String),
}

impl AnalyzerError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalyzerError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
