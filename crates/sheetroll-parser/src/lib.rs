//! # sheetroll-parser
//!
//! Readers that turn spreadsheet files into `sheetroll-core` tables.
//!
//! This crate provides:
//! - `XlsxWorkbook`: a `SheetSource` over `.xlsx`/`.xlsm`/`.xls`/`.ods` files,
//!   opened from disk or from an in-memory upload
//! - Header normalization matching data-frame conventions
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheetroll_core::{index_workbook, FilterConfig};
//! use sheetroll_parser::XlsxWorkbook;
//!
//! let mut workbook = XlsxWorkbook::open("attendance.xlsx")?;
//! let index = index_workbook(&mut workbook, &FilterConfig::default())?;
//! println!("{} date sheets", index.date_sheets.len());
//! ```

pub mod xlsx;

pub use xlsx::XlsxWorkbook;

use sheetroll_core::CellValue;
use std::collections::HashSet;

/// Header names for a sheet's first row.
///
/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
/// suffixes so every column stays addressable by name.
pub fn normalize_headers(cells: &[CellValue]) -> Vec<String> {
    let mut seen = HashSet::new();
    cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = match cell.display_text() {
                text if text.trim().is_empty() => format!("Unnamed: {idx}"),
                text => text,
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}
