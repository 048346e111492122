//! Date-named sheet recognition
//!
//! Daily exports name each tab after its day in `DD.MM.YYYY` form. Recognition
//! is purely syntactic; calendar validity is checked separately when parsing,
//! so `31.02.2024` is a date sheet that fails to parse.

use crate::FilterError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const SHEET_DATE_FORMAT: &str = "%d.%m.%Y";

fn sheet_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("sheet name pattern is valid")
    })
}

/// Whether a sheet name is exactly `DD.MM.YYYY`
pub fn is_date_sheet(name: &str) -> bool {
    sheet_name_pattern().is_match(name)
}

/// Parse a date sheet name strictly as day.month.year
pub fn parse_sheet_date(name: &str) -> Result<NaiveDate, FilterError> {
    if !is_date_sheet(name) {
        return Err(FilterError::InvalidSheetDate {
            sheet: name.to_string(),
            reason: "name does not match dd.mm.yyyy".into(),
        });
    }
    NaiveDate::parse_from_str(name, SHEET_DATE_FORMAT).map_err(|e| {
        FilterError::InvalidSheetDate {
            sheet: name.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Parse a date typed by the user (`dd.mm.yyyy`, leading zeros optional)
pub fn parse_user_date(input: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(input.trim(), SHEET_DATE_FORMAT)
        .map_err(|_| FilterError::InvalidDate(input.to_string()))
}

/// Inverse of [`parse_sheet_date`]
pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FORMAT).to_string()
}
