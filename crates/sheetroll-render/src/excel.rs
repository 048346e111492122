//! Excel export of a filtered result
//!
//! Writes a single-sheet workbook:
//! - Row 1 holds the column names, bold white on dark blue
//! - Data rows follow unstyled, values written with their original cell type
//! - Every column is sized to its longest rendered value
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: Summary
//! | Name    | Team Leader | Login Time | Handled Inbound | Source_Sheet |
//! |---------|-------------|------------|-----------------|--------------|
//! | Agent 1 | John        | 08:45:00   | 65              | 01.06.2024   |
//! | Agent 2 | John        | 09:00:00   | 50              | 02.06.2024   |
//! ```
//!
//! Column width is `(longest value + 2) × 1.2` character units, capped at the
//! spreadsheet maximum of 255.

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use sheetroll_core::{CellValue, FilteredResult, RenderError, Renderer};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::info;

/// Widest column a worksheet accepts
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Excel summary renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Name of the output sheet
    pub sheet_name: String,
    /// Header fill color (RGB)
    pub header_background: u32,
    /// Header font color (RGB)
    pub header_font_color: u32,
    /// Characters added to the longest value of a column
    pub width_padding: usize,
    /// Multiplier applied after padding
    pub width_factor: f64,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Summary".into(),
            header_background: 0x003366,
            header_font_color: 0xFFFFFF,
            width_padding: 2,
            width_factor: 1.2,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output sheet name ("Summary", "Filtered_Data", ...)
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set header fill and font colors
    pub fn header_colors(mut self, background: u32, font: u32) -> Self {
        self.header_background = background;
        self.header_font_color = font;
        self
    }

    /// Format applied to every header cell
    pub fn header_format(&self) -> Format {
        Format::new()
            .set_bold()
            .set_font_color(self.header_font_color)
            .set_background_color(self.header_background)
    }

    /// Auto-fit width of every column, header included
    pub fn column_widths(&self, result: &FilteredResult) -> Vec<f64> {
        result
            .columns
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let longest = result
                    .rows
                    .iter()
                    .map(|row| row.get(col).map_or(0, |cell| cell.display_text().chars().count()))
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                ((longest + self.width_padding) as f64 * self.width_factor).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, result: &FilteredResult) -> Result<Vec<u8>, RenderError> {
        if result.rows.len() + 1 > MAX_ROWS {
            return Err(RenderError::InvalidData(format!(
                "{} rows exceed the worksheet limit",
                result.rows.len()
            )));
        }
        if result.columns.len() > MAX_COLUMNS {
            return Err(RenderError::InvalidData(format!(
                "{} columns exceed the worksheet limit",
                result.columns.len()
            )));
        }

        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for (col, header) in result.columns.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, header, &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        for (idx, row) in result.rows.iter().enumerate() {
            for (col, cell) in row.iter().enumerate() {
                Self::write_cell(sheet, idx as u32 + 1, col as u16, cell, &formats)?;
            }
        }

        for (col, width) in self.column_widths(result).into_iter().enumerate() {
            sheet
                .set_column_width(col as u16, width)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Render and write to `path`.
    ///
    /// The workbook is staged in a temporary file next to the destination and
    /// renamed into place, so a failed write never leaves a truncated file.
    /// A replaced file keeps its permissions; a new one gets the same mode a
    /// plain file creation would.
    pub fn save(&self, result: &FilteredResult, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        let bytes = self.render(result)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let previous = fs::metadata(path)
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.permissions());

        let mut staged = staging_file(dir)?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| RenderError::Io(e.error))?;
        if let Some(permissions) = previous {
            fs::set_permissions(path, permissions)?;
        }

        info!(path = %path.display(), rows = result.len(), "wrote summary workbook");
        Ok(())
    }

    fn create_formats(&self) -> ExcelFormats {
        ExcelFormats {
            header: self.header_format(),
            date: Format::new().set_num_format("dd.mm.yyyy"),
            datetime: Format::new().set_num_format("dd.mm.yyyy hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }

    fn write_cell(
        sheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &CellValue,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let written = match cell {
            CellValue::Empty => return Ok(()),
            CellValue::Text(s) | CellValue::Error(s) => sheet.write_string(row, col, s),
            CellValue::Int(i) => sheet.write_number(row, col, *i as f64),
            CellValue::Float(f) => sheet.write_number(row, col, *f),
            CellValue::Bool(b) => sheet.write_boolean(row, col, *b),
            CellValue::DateTime(serial) if serial.fract() == 0.0 => {
                sheet.write_number_with_format(row, col, *serial, &formats.date)
            }
            CellValue::DateTime(serial) => {
                sheet.write_number_with_format(row, col, *serial, &formats.datetime)
            }
            CellValue::Duration(days) => {
                sheet.write_number_with_format(row, col, *days, &formats.duration)
            }
        };
        written.map_err(|e| RenderError::Format(e.to_string()))?;
        Ok(())
    }
}

/// Temporary file in `dir`, created with the process's default file mode
#[cfg(unix)]
fn staging_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .prefix(".sheetroll")
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn staging_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().prefix(".sheetroll").tempfile_in(dir)
}

/// Formats shared by all cells of one export
struct ExcelFormats {
    header: Format,
    date: Format,
    datetime: Format,
    duration: Format,
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, result: &FilteredResult) -> Result<Vec<u8>, RenderError> {
        if result.is_empty() {
            return Err(RenderError::InvalidData("No rows to export".into()));
        }
        self.render_to_bytes(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetroll_core::SOURCE_SHEET_COLUMN;

    fn sample_result() -> FilteredResult {
        FilteredResult {
            columns: vec!["Name".into(), "Team Leader".into(), SOURCE_SHEET_COLUMN.into()],
            rows: vec![
                vec![
                    CellValue::text("Agent 1"),
                    CellValue::text("John"),
                    CellValue::text("01.06.2024"),
                ],
                vec![
                    CellValue::text("Agent with a long name"),
                    CellValue::text("John"),
                    CellValue::text("02.06.2024"),
                ],
            ],
            sheets_in_range: vec!["01.06.2024".into(), "02.06.2024".into()],
            sheets_without_supervisor: Vec::new(),
        }
    }

    #[test]
    fn excel_renderer_creation() {
        let renderer = ExcelRenderer::new();
        assert_eq!(renderer.sheet_name, "Summary");
        assert_eq!(renderer.header_background, 0x003366);
        assert_eq!(renderer.header_font_color, 0xFFFFFF);
    }

    #[test]
    fn excel_renderer_with_options() {
        let renderer = ExcelRenderer::new()
            .sheet_name("Filtered_Data")
            .header_colors(0x4472C4, 0x000000);
        assert_eq!(renderer.sheet_name, "Filtered_Data");
        assert_eq!(renderer.header_background, 0x4472C4);
        assert_eq!(renderer.header_font_color, 0x000000);
    }

    #[test]
    fn header_format_is_bold_white_on_dark_blue() {
        let expected = Format::new()
            .set_bold()
            .set_font_color(0xFFFFFF)
            .set_background_color(0x003366);
        assert_eq!(ExcelRenderer::new().header_format(), expected);
    }

    #[test]
    fn widths_follow_longest_value() {
        let widths = ExcelRenderer::new().column_widths(&sample_result());
        // "Agent with a long name" = 22 chars
        assert_eq!(widths[0], (22.0 + 2.0) * 1.2);
        // header "Team Leader" (11) beats "John"
        assert_eq!(widths[1], (11.0 + 2.0) * 1.2);
        // "Source_Sheet" (12) beats "01.06.2024"
        assert_eq!(widths[2], (12.0 + 2.0) * 1.2);
    }

    #[test]
    fn widths_are_capped() {
        let result = FilteredResult {
            columns: vec!["Notes".into()],
            rows: vec![vec![CellValue::Text("x".repeat(400))]],
            ..FilteredResult::default()
        };
        assert_eq!(ExcelRenderer::new().column_widths(&result), vec![MAX_COLUMN_WIDTH]);
    }

    #[test]
    fn excel_produces_valid_output() {
        let bytes = ExcelRenderer::new().render(&sample_result()).unwrap();
        // XLSX files start with PK (ZIP header)
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn excel_empty_result_fails() {
        let result = ExcelRenderer::new().render(&FilteredResult::default());
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn invalid_sheet_name_is_a_format_error() {
        let result = ExcelRenderer::new()
            .sheet_name("bad[name]")
            .render(&sample_result());
        assert!(matches!(result, Err(RenderError::Format(_))));
    }
}
