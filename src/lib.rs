pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod types;

pub use aggregate::{AggregationOptions, Aggregator, AlbumTally, RollupTarget, SortKey};
pub use error::{AnalyzerError, Result};
pub use parser::parse_entry;
pub use report::format_percentage;
