//! Workbook reader backed by `calamine`
//!
//! The first row of a sheet's used range is the header row; every following
//! row is data. Cells keep their stored type: text stays text even when it
//! looks like a time or a number.

use calamine::{
    open_workbook_auto, open_workbook_auto_from_rs, Data, ExcelDateTime, ExcelDateTimeType, Range,
    Reader, Sheets,
};
use sheetroll_core::{CellValue, SheetName, SheetSource, SheetTable, SourceError};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

use crate::normalize_headers;

/// Days between the 1900 and 1904 date system epochs
const EPOCH_1904_OFFSET: f64 = 1462.0;

/// A spreadsheet file opened for reading
pub struct XlsxWorkbook<RS> {
    sheets: Sheets<RS>,
}

impl XlsxWorkbook<BufReader<File>> {
    /// Open a workbook from disk; the format is picked from the extension
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let sheets = open_workbook_auto(path)
            .map_err(|e| SourceError::Open(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "opened workbook");
        Ok(Self { sheets })
    }
}

impl XlsxWorkbook<Cursor<Vec<u8>>> {
    /// Open a workbook held in memory, e.g. an uploaded file
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SourceError> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| SourceError::Open(e.to_string()))?;
        Ok(Self { sheets })
    }
}

impl<RS: Read + Seek> SheetSource for XlsxWorkbook<RS> {
    fn sheet_names(&self) -> Vec<SheetName> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, SourceError> {
        if !self.sheets.sheet_names().iter().any(|n| n == name) {
            return Err(SourceError::SheetNotFound(name.to_string()));
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| SourceError::Read {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(range_to_table(&range))
    }
}

/// Split a used range into headers and data rows
pub fn range_to_table(range: &Range<Data>) -> SheetTable {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return SheetTable::default();
    };

    let header_cells: Vec<CellValue> = header_row.iter().map(convert_cell).collect();
    let mut table = SheetTable::new(normalize_headers(&header_cells));
    table.rows = rows
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();
    table
}

/// Map a calamine cell onto the core cell model without coercion
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Duration(dt.as_f64()),
        Data::DateTime(dt) => CellValue::DateTime(serial_1900(dt)),
        // ODS stores dates and durations as ISO text
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// Serial of a date cell in the 1900 date system.
///
/// Workbooks saved with the 1904 date system count from 1904-01-01; their
/// serials are shifted so every `CellValue::DateTime` shares one epoch.
fn serial_1900(dt: &ExcelDateTime) -> f64 {
    let value = dt.as_f64();
    if *dt == ExcelDateTime::new(value, ExcelDateTimeType::DateTime, true) {
        value + EPOCH_1904_OFFSET
    } else {
        value
    }
}
