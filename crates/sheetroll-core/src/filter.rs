//! Workbook indexing and row filtering
//!
//! Indexing enumerates the date sheets (sorted by date) and collects the
//! supervisor names offered to the user. Filtering walks the in-range sheets in
//! that order and keeps rows whose supervisor cell contains the requested name,
//! case-insensitively. State flows through [`WorkbookIndex`]; nothing is cached
//! between invocations.

use crate::{
    is_date_sheet, parse_sheet_date, resolve_supervisor_column, CellValue, FilterConfig,
    FilterError, FilteredResult, InvalidSheetPolicy, SheetName, SheetSource, SOURCE_SHEET_COLUMN,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// A sheet recognized as one calendar day
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateSheet {
    pub name: SheetName,
    pub date: NaiveDate,
}

/// What indexing learned about a workbook
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkbookIndex {
    /// Date sheets in ascending date order
    pub date_sheets: Vec<DateSheet>,
    /// Distinct supervisor values across all date sheets, sorted
    pub supervisors: Vec<String>,
    /// Sheets named like a date but holding an impossible one
    pub skipped: Vec<SheetName>,
}

impl WorkbookIndex {
    /// First and last sheet date
    pub fn default_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.date_sheets.first()?;
        let last = self.date_sheets.last()?;
        Some((first.date, last.date))
    }

    /// Date sheets inside `[start, end]`, in ascending date order
    pub fn sheets_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &DateSheet> + '_ {
        self.date_sheets
            .iter()
            .filter(move |sheet| start <= sheet.date && sheet.date <= end)
    }
}

/// Supervisor name and inclusive date range to filter by
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterRequest {
    pub supervisor: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FilterRequest {
    pub fn new(supervisor: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            supervisor: supervisor.into(),
            start,
            end,
        }
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        if self.start > self.end {
            return Err(FilterError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Select and sort the date sheets among `names`.
///
/// Returns the sorted date sheets and the names skipped under
/// [`InvalidSheetPolicy::Skip`].
pub fn collect_date_sheets(
    names: &[SheetName],
    policy: InvalidSheetPolicy,
) -> Result<(Vec<DateSheet>, Vec<SheetName>), FilterError> {
    let mut sheets = Vec::new();
    let mut skipped = Vec::new();

    for name in names.iter().filter(|n| is_date_sheet(n)) {
        match parse_sheet_date(name) {
            Ok(date) => sheets.push(DateSheet {
                name: name.clone(),
                date,
            }),
            Err(err) => match policy {
                InvalidSheetPolicy::Fail => return Err(err),
                InvalidSheetPolicy::Skip => {
                    warn!(sheet = %name, "skipping sheet: {err}");
                    skipped.push(name.clone());
                }
            },
        }
    }

    // Stable: equal dates keep workbook order
    sheets.sort_by_key(|sheet| sheet.date);
    Ok((sheets, skipped))
}

/// Enumerate date sheets and collect the supervisors they mention
pub fn index_workbook<S: SheetSource + ?Sized>(
    source: &mut S,
    config: &FilterConfig,
) -> Result<WorkbookIndex, FilterError> {
    let names = source.sheet_names();
    let (date_sheets, skipped) = collect_date_sheets(&names, config.invalid_sheet_policy)?;

    if date_sheets.is_empty() {
        return Err(FilterError::NoDateSheets);
    }

    let mut supervisors = BTreeSet::new();
    for sheet in &date_sheets {
        let table = source.read_sheet(&sheet.name)?;
        let Some(col) = resolve_supervisor_column(&table.headers, &config.vocabulary) else {
            debug!(sheet = %sheet.name, "no supervisor column");
            continue;
        };
        supervisors.extend(
            (0..table.height())
                .map(|row| table.cell(row, col))
                .filter(|cell| !cell.is_empty())
                .map(CellValue::display_text),
        );
    }

    if supervisors.is_empty() {
        return Err(FilterError::NoSupervisorsFound);
    }

    info!(
        date_sheets = date_sheets.len(),
        supervisors = supervisors.len(),
        "indexed workbook"
    );

    Ok(WorkbookIndex {
        date_sheets,
        supervisors: supervisors.into_iter().collect(),
        skipped,
    })
}

/// Keep rows whose supervisor contains the requested name, across in-range sheets.
///
/// An empty result is not an error; see [`FilteredResult::status`].
pub fn filter_rows<S: SheetSource + ?Sized>(
    source: &mut S,
    index: &WorkbookIndex,
    request: &FilterRequest,
    config: &FilterConfig,
) -> Result<FilteredResult, FilterError> {
    request.validate()?;

    let needle = request.supervisor.to_lowercase();
    let mut result = FilteredResult::default();

    for sheet in index.sheets_in_range(request.start, request.end) {
        result.sheets_in_range.push(sheet.name.clone());

        let table = source.read_sheet(&sheet.name)?;
        let Some(col) = resolve_supervisor_column(&table.headers, &config.vocabulary) else {
            debug!(sheet = %sheet.name, "no supervisor column, sheet skipped");
            result.sheets_without_supervisor.push(sheet.name.clone());
            continue;
        };

        let matching: Vec<usize> = (0..table.height())
            .filter(|&row| {
                let cell = table.cell(row, col);
                !cell.is_empty() && cell.display_text().to_lowercase().contains(&needle)
            })
            .collect();

        if matching.is_empty() {
            continue;
        }

        // Sheets contribute columns only when they contribute rows
        let positions: Vec<usize> = table
            .headers
            .iter()
            .map(|header| column_position(&mut result.columns, header))
            .collect();
        let source_position = column_position(&mut result.columns, SOURCE_SHEET_COLUMN);

        for row in matching {
            let mut cells = vec![CellValue::Empty; result.columns.len()];
            for (col, &position) in positions.iter().enumerate() {
                cells[position] = table.cell(row, col).clone();
            }
            cells[source_position] = CellValue::Text(sheet.name.clone());
            result.rows.push(cells);
        }

        debug!(sheet = %sheet.name, rows = result.rows.len(), "sheet filtered");
    }

    let width = result.columns.len();
    for row in &mut result.rows {
        row.resize(width, CellValue::Empty);
    }

    info!(
        supervisor = %request.supervisor,
        sheets = result.sheets_in_range.len(),
        rows = result.rows.len(),
        "filter complete"
    );

    Ok(result)
}

fn column_position(columns: &mut Vec<String>, name: &str) -> usize {
    match columns.iter().position(|c| c == name) {
        Some(position) => position,
        None => {
            columns.push(name.to_string());
            columns.len() - 1
        }
    }
}
