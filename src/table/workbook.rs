use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::{debug, warn};

use super::{Table, TableReader};
use crate::error::{AnalyzerError, Result};

/// Reads Excel and OpenDocument workbooks through calamine
pub struct WorkbookReader {
    /// Sheet to read; the first sheet when unset
    sheet: Option<String>,
}

impl WorkbookReader {
    pub fn new(sheet: Option<String>) -> Self {
        Self { sheet }
    }
}

impl TableReader for WorkbookReader {
    fn name(&self) -> &'static str {
        "workbook"
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names();
        debug!("WorkbookReader: sheets={:?}", sheet_names);

        let sheet = match &self.sheet {
            Some(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(AnalyzerError::Config(format!(
                        "sheet '{}' not found in '{}' (available: {})",
                        name,
                        path.display(),
                        sheet_names.join(", ")
                    )));
                }
                name.clone()
            }
            None => match sheet_names.first() {
                Some(first) => first.clone(),
                None => {
                    warn!("WorkbookReader: '{}' has no sheets", path.display());
                    return Ok(Table::default());
                }
            },
        };

        let range = workbook.worksheet_range(&sheet)?;
        Ok(range_to_table(&range))
    }
}

/// Convert a calamine range into positional rows.
/// calamine trims leading empty rows and columns, so the range is shifted
/// back to its absolute position to keep column indices stable.
fn range_to_table(range: &Range<Data>) -> Table {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }
    Table::new(rows)
}

/// Render a cell the way an untyped read prints it
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_string(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => float_to_string(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}

fn float_to_string(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}
