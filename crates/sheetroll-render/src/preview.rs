//! Plain-text preview of the first rows of a result

use sheetroll_core::{FilteredResult, RenderError, Renderer};

/// Renders the head of a result as an aligned text table
#[derive(Clone, Debug)]
pub struct PreviewRenderer {
    /// Rows shown before the result is truncated
    pub max_rows: usize,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self { max_rows: 5 }
    }
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows;
        self
    }
}

impl Renderer for PreviewRenderer {
    type Output = String;

    fn render(&self, result: &FilteredResult) -> Result<String, RenderError> {
        if result.columns.is_empty() {
            return Ok(String::from("(no data)\n"));
        }

        let shown: Vec<Vec<String>> = result
            .rows
            .iter()
            .take(self.max_rows)
            .map(|row| row.iter().map(|cell| cell.display_text()).collect())
            .collect();

        let widths: Vec<usize> = result
            .columns
            .iter()
            .enumerate()
            .map(|(col, header)| {
                shown
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        push_line(&mut out, result.columns.iter().map(String::as_str), &widths);
        out.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
        out.push('\n');
        for row in &shown {
            push_line(&mut out, row.iter().map(String::as_str), &widths);
        }

        let hidden = result.rows.len().saturating_sub(shown.len());
        if hidden > 0 {
            out.push_str(&format!("... {} more rows\n", hidden));
        }

        Ok(out)
    }
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetroll_core::CellValue;

    fn result(rows: usize) -> FilteredResult {
        FilteredResult {
            columns: vec!["Name".into(), "Source_Sheet".into()],
            rows: (1..=rows)
                .map(|i| {
                    vec![
                        CellValue::Text(format!("Agent {i}")),
                        CellValue::text("01.06.2024"),
                    ]
                })
                .collect(),
            ..FilteredResult::default()
        }
    }

    #[test]
    fn renders_aligned_table() {
        let text = PreviewRenderer::new().render(&result(2)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name    | Source_Sheet");
        assert_eq!(lines[1], "--------+-------------");
        assert_eq!(lines[2], "Agent 1 | 01.06.2024");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn truncates_to_max_rows() {
        let text = PreviewRenderer::new().max_rows(2).render(&result(5)).unwrap();
        assert!(text.contains("Agent 2"));
        assert!(!text.contains("Agent 3"));
        assert!(text.ends_with("... 3 more rows\n"));
    }

    #[test]
    fn empty_result_has_placeholder() {
        let text = PreviewRenderer::new().render(&FilteredResult::default()).unwrap();
        assert_eq!(text, "(no data)\n");
    }
}
