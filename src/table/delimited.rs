use std::path::Path;

use tracing::debug;

use super::{Table, TableReader};
use crate::error::Result;

/// Reads comma-separated exports. No header row; rows may be ragged.
pub struct CsvReader;

impl CsvReader {
    pub fn new() -> Self {
        Self
    }

    fn read_from<R: std::io::Read>(&self, source: R) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!("CsvReader: read {} records", rows.len());
        Ok(Table::new(rows))
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader for CsvReader {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let file = std::fs::File::open(path)?;
        self.read_from(file)
    }
}
