//! Header-less, untyped view of a spreadsheet.
//!
//! Every cell is kept as the string it would print as, and columns are
//! addressed purely by zero-based position.

mod delimited;
mod workbook;

use std::path::Path;

use tracing::{info, instrument};

use crate::config::ColumnLayout;
use crate::error::{AnalyzerError, Result};
use crate::types::RawRow;

pub use delimited::CsvReader;
pub use workbook::WorkbookReader;

/// A fully loaded sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    /// Number of columns of the widest row
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A column exists when any row reaches it
    pub fn has_column(&self, index: usize) -> bool {
        index < self.width
    }

    /// Cell text, or `""` when the row is shorter than `col`
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Project every row onto the columns of `layout`.
    /// Callers check `has_column` first; short rows read as empty cells.
    pub fn raw_rows<'a>(&'a self, layout: &'a ColumnLayout) -> impl Iterator<Item = RawRow> + 'a {
        (0..self.rows.len()).map(move |i| RawRow {
            marker: self.cell(i, layout.marker).to_string(),
            composers: self.cell(i, layout.composers).to_string(),
            publishers: layout
                .publishers
                .map(|col| self.cell(i, col).to_string()),
        })
    }
}

/// Source of a `Table` for one family of file formats
pub trait TableReader {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Load the whole file into memory
    fn read(&self, path: &Path) -> Result<Table>;
}

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];
const CSV_EXTENSIONS: &[&str] = &["csv"];

/// Pick a reader from the file extension
pub fn create_reader(path: &Path, sheet: Option<&str>) -> Result<Box<dyn TableReader>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        Ok(Box::new(WorkbookReader::new(sheet.map(str::to_string))))
    } else if CSV_EXTENSIONS.contains(&extension.as_str()) {
        Ok(Box::new(CsvReader::new()))
    } else {
        Err(AnalyzerError::UnsupportedFormat(format!(
            "'{}' (expected one of: {})",
            path.display(),
            get_supported_extensions().join(", ")
        )))
    }
}

/// Get all file extensions a reader exists for
pub fn get_supported_extensions() -> Vec<&'static str> {
    WORKBOOK_EXTENSIONS
        .iter()
        .chain(CSV_EXTENSIONS.iter())
        .copied()
        .collect()
}

/// Load `path` with the reader matching its extension
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let reader = create_reader(path, sheet)?;
    let table = reader.read(path)?;
    info!(
        "Loaded table with {} reader: rows={} width={}",
        reader.name(),
        table.len(),
        table.width()
    );
    Ok(table)
}
