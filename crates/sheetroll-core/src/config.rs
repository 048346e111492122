//! Filter configuration
//!
//! Every field has a default, so an empty TOML document is a valid config.

use crate::Vocabulary;
use serde::Deserialize;

/// What to do with a sheet named like a date that is not a real calendar date
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidSheetPolicy {
    /// Leave the sheet out and log a warning
    #[default]
    Skip,
    /// Abort with `FilterError::InvalidSheetDate`
    Fail,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Header terms identifying the supervisor column
    pub vocabulary: Vocabulary,
    pub invalid_sheet_policy: InvalidSheetPolicy,
    /// Name of the single sheet in the output workbook
    pub output_sheet_name: String,
    /// Rows shown by the text preview
    pub preview_rows: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            invalid_sheet_policy: InvalidSheetPolicy::Skip,
            output_sheet_name: "Summary".into(),
            preview_rows: 5,
        }
    }
}
