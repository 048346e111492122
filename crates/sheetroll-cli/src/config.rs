//! Configuration loading
//!
//! ```toml
//! vocabulary = ["team leader", "supervisor", "coach"]
//! invalid_sheet_policy = "fail"
//! output_sheet_name = "Filtered_Data"
//! preview_rows = 10
//! ```

use anyhow::{Context, Result};
use sheetroll_core::{FilterConfig, InvalidSheetPolicy};
use std::fs;
use std::path::Path;

/// Read the config file, or fall back to defaults when none is given
pub fn load(path: Option<&Path>) -> Result<FilterConfig> {
    let Some(path) = path else {
        return Ok(FilterConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid config {}", path.display()))
}

pub fn parse(text: &str) -> Result<FilterConfig> {
    Ok(toml::from_str(text)?)
}

/// `--strict-dates` only ever tightens the configured policy
pub fn apply_strict_dates(config: &mut FilterConfig, strict: bool) {
    if strict {
        config.invalid_sheet_policy = InvalidSheetPolicy::Fail;
    }
}
