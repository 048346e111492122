//! # sheetroll-core
//!
//! Core domain model and operations for filtering daily attendance sheets by
//! team leader.
//!
//! This crate provides:
//! - Domain types: `CellValue`, `SheetTable`, `MemoryWorkbook`, `FilteredResult`
//! - Core traits: `SheetSource`, `Renderer`
//! - The filtering pipeline: date sheet classification, supervisor column
//!   resolution, row selection across sheets
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sheetroll_core::{
//!     filter_rows, index_workbook, CellValue, FilterConfig, FilterRequest, MemoryWorkbook,
//!     SheetTable,
//! };
//!
//! let mut workbook = MemoryWorkbook::new()
//!     .sheet(
//!         "01.06.2024",
//!         SheetTable::new(vec!["Name".into(), "Team Leader".into()])
//!             .row(vec![CellValue::text("Agent 1"), CellValue::text("John")])
//!             .row(vec![CellValue::text("Agent 2"), CellValue::text("Sarah")]),
//!     );
//!
//! let config = FilterConfig::default();
//! let index = index_workbook(&mut workbook, &config).unwrap();
//! let request = FilterRequest::new(
//!     "john",
//!     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//! );
//! let result = filter_rows(&mut workbook, &index, &request, &config).unwrap();
//! assert_eq!(result.len(), 1);
//! ```

pub mod config;
pub mod filter;
pub mod resolver;
pub mod sheet_date;

pub use config::{FilterConfig, InvalidSheetPolicy};
pub use filter::{filter_rows, index_workbook, DateSheet, FilterRequest, WorkbookIndex};
pub use resolver::{resolve_supervisor_column, Vocabulary, DEFAULT_VOCABULARY};
pub use sheet_date::{format_sheet_date, is_date_sheet, parse_sheet_date, parse_user_date};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Type Aliases & Constants
// ============================================================================

/// Name of a worksheet within a workbook
pub type SheetName = String;

/// Column appended to every surviving row, holding its originating sheet name
pub const SOURCE_SHEET_COLUMN: &str = "Source_Sheet";

// ============================================================================
// Cells
// ============================================================================

/// A single cell value as read from a source workbook.
///
/// Values are carried through the pipeline without coercion: a time of day
/// typed into the sheet as text stays `Text`, a numeric date stays `DateTime`.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Spreadsheet serial date (days since 1899-12-30, fraction = time of day)
    DateTime(f64),
    /// Spreadsheet serial duration in fractional days
    Duration(f64),
    /// Formula error such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Missing values never match a filter
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text as a reader would see it; used for matching, previews and width fitting
    pub fn display_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            Self::DateTime(serial) => match serial_to_datetime(*serial) {
                Some(dt) if dt.time() == NaiveTime::MIN => dt.date().to_string(),
                Some(dt) => dt.to_string(),
                None => format_float(*serial),
            },
            Self::Duration(days) => format_duration(*days),
            Self::Error(e) => e.clone(),
        }
    }

    /// Calendar value of a `DateTime` cell
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(serial) => serial_to_datetime(*serial),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn format_duration(days: f64) -> String {
    let total_seconds = (days * 86_400.0).round() as i64;
    let sign = if total_seconds < 0 { "-" } else { "" };
    let seconds = total_seconds.unsigned_abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Convert a spreadsheet serial number (1900 date system) to a date-time
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(TimeDelta::try_days(days)?)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

// ============================================================================
// Tables & Workbooks
// ============================================================================

/// One worksheet with its header row split off.
///
/// Rows may be shorter than the header; missing trailing cells read as `Empty`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a data row
    pub fn row(mut self, cells: Vec<CellValue>) -> Self {
        self.rows.push(cells);
        self
    }

    /// Cell at (row, column), `Empty` when out of bounds
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// An in-memory workbook: ordered, named sheets
#[derive(Clone, Debug, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(SheetName, SheetTable)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet, keeping insertion order
    pub fn sheet(mut self, name: impl Into<SheetName>, table: SheetTable) -> Self {
        self.sheets.push((name.into(), table));
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// Rows kept by one filter invocation, concatenated in ascending sheet-date order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredResult {
    /// Union of the contributing sheets' columns in first-appearance order
    pub columns: Vec<String>,
    /// Every row has exactly `columns.len()` cells
    pub rows: Vec<Vec<CellValue>>,
    /// Date sheets whose date fell inside the requested range, in processing order
    pub sheets_in_range: Vec<SheetName>,
    /// In-range sheets skipped because no supervisor column was found
    pub sheets_without_supervisor: Vec<SheetName>,
}

/// How a finished filter invocation should be reported
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultStatus {
    Rows(usize),
    /// No date sheet lies inside the requested range
    NoSheetsInRange,
    /// Sheets were scanned but no row matched the supervisor
    NoMatches,
}

impl FilteredResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn status(&self) -> ResultStatus {
        if !self.rows.is_empty() {
            ResultStatus::Rows(self.rows.len())
        } else if self.sheets_in_range.is_empty() {
            ResultStatus::NoSheetsInRange
        } else {
            ResultStatus::NoMatches
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Vec<&CellValue> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|row| &row[idx]).collect(),
            None => Vec::new(),
        }
    }

    /// The `Source_Sheet` tag of every row
    pub fn source_sheets(&self) -> Vec<String> {
        self.column_values(SOURCE_SHEET_COLUMN)
            .into_iter()
            .map(CellValue::display_text)
            .collect()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Read access to a workbook's sheets
pub trait SheetSource {
    /// Sheet names in workbook order
    fn sheet_names(&self) -> Vec<SheetName>;

    /// Read one sheet, first row as headers
    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, SourceError>;
}

impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<SheetName> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, SourceError> {
        self.sheets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, table)| table.clone())
            .ok_or_else(|| SourceError::SheetNotFound(name.to_string()))
    }
}

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a filtered result to the output format
    fn render(&self, result: &FilteredResult) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Filtering error
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("No sheets found with date format dd.mm.yyyy")]
    NoDateSheets,

    #[error("No team leaders found in any sheets")]
    NoSupervisorsFound,

    #[error("Sheet '{sheet}' is named like a date but is not a valid calendar date: {reason}")]
    InvalidSheetDate { sheet: SheetName, reason: String },

    #[error("Invalid date '{0}': expected dd.mm.yyyy")]
    InvalidDate(String),

    #[error(
        "Start date {} cannot be after end date {}",
        .start.format("%d.%m.%Y"),
        .end.format("%d.%m.%Y")
    )]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Workbook access error, independent of the reading library
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open workbook: {0}")]
    Open(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(SheetName),

    #[error("Failed to read sheet '{sheet}': {message}")]
    Read { sheet: SheetName, message: String },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
