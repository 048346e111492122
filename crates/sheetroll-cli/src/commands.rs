//! Subcommand implementations
//!
//! Every outcome the user needs to see is printed here; the core only returns
//! values and errors.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use sheetroll_core::{
    filter_rows, format_sheet_date, index_workbook, FilterConfig, FilterRequest, Renderer,
    ResultStatus, WorkbookIndex,
};
use sheetroll_parser::XlsxWorkbook;
use sheetroll_render::{ExcelRenderer, PreviewRenderer};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::exit::ExitCode;
use crate::OutputFormat;

/// Arguments of `sheetroll filter` after parsing
#[derive(Debug)]
pub struct FilterArgs {
    pub file: PathBuf,
    pub supervisor: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub output: Option<PathBuf>,
    pub preview: bool,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    file: String,
    date_sheets: Vec<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    supervisors: Vec<String>,
    skipped_sheets: Vec<String>,
}

impl InspectReport {
    fn new(file: &Path, index: &WorkbookIndex) -> Self {
        let range = index.default_range();
        Self {
            file: file.display().to_string(),
            date_sheets: index.date_sheets.iter().map(|s| s.name.clone()).collect(),
            start_date: range.map(|(start, _)| format_sheet_date(start)),
            end_date: range.map(|(_, end)| format_sheet_date(end)),
            supervisors: index.supervisors.clone(),
            skipped_sheets: index.skipped.clone(),
        }
    }
}

type FileWorkbook = XlsxWorkbook<BufReader<File>>;

fn open_and_index(file: &Path, config: &FilterConfig) -> Result<(FileWorkbook, WorkbookIndex)> {
    let mut workbook = XlsxWorkbook::open(file)?;
    let index = index_workbook(&mut workbook, config)
        .with_context(|| format!("cannot process {}", file.display()))?;
    for sheet in &index.skipped {
        eprintln!("warning: sheet '{sheet}' is not a valid date and was skipped");
    }
    Ok((workbook, index))
}

/// `sheetroll inspect`
pub fn inspect(file: &Path, format: OutputFormat, config: &FilterConfig) -> Result<ExitCode> {
    let (_, index) = open_and_index(file, config)?;
    let report = InspectReport::new(file, &index);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!(
                "Loaded {} date sheets with {} team leaders",
                report.date_sheets.len(),
                report.supervisors.len()
            );
            if let (Some(start), Some(end)) = (&report.start_date, &report.end_date) {
                println!("Date range: {start} - {end}");
            }
            println!("Team leaders:");
            for supervisor in &report.supervisors {
                println!("  {supervisor}");
            }
        }
    }

    Ok(ExitCode::Success)
}

/// `sheetroll filter`
pub fn filter(args: &FilterArgs, config: &FilterConfig) -> Result<ExitCode> {
    let (mut workbook, index) = open_and_index(&args.file, config)?;

    let (start, end) = request_range(&index, args.from, args.to)?;
    let request = FilterRequest::new(args.supervisor.as_str(), start, end);

    let result = filter_rows(&mut workbook, &index, &request, config)
        .with_context(|| format!("cannot filter {}", args.file.display()))?;

    for sheet in &result.sheets_without_supervisor {
        eprintln!("warning: sheet '{sheet}' has no team leader column and was skipped");
    }

    match result.status() {
        ResultStatus::NoSheetsInRange => {
            println!(
                "No data: no sheets found between {} and {}",
                format_sheet_date(request.start),
                format_sheet_date(request.end)
            );
            return Ok(ExitCode::Success);
        }
        ResultStatus::NoMatches => {
            println!("No data found for team leader: {}", args.supervisor);
            return Ok(ExitCode::Success);
        }
        ResultStatus::Rows(count) => {
            println!("Found {count} records matching your criteria");
        }
    }

    if args.preview {
        let preview = PreviewRenderer::new()
            .max_rows(config.preview_rows)
            .render(&result)?;
        print!("{preview}");
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.file));
    ExcelRenderer::new()
        .sheet_name(config.output_sheet_name.as_str())
        .save(&result, &output)
        .with_context(|| format!("cannot write {}", output.display()))?;

    info!(output = %output.display(), "export complete");
    println!("Results saved to: {}", output.display());
    Ok(ExitCode::Success)
}

/// Fill unset bounds from the sheets actually present.
///
/// A defaulted bound never crosses an explicit one, so `--from` past the last
/// sheet gives an empty range instead of a reversed one.
fn request_range(
    index: &WorkbookIndex,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate)> {
    let (first, last) = index
        .default_range()
        .context("workbook has no date sheets")?;
    let start = from.unwrap_or_else(|| to.map_or(first, |to| first.min(to)));
    let end = to.unwrap_or_else(|| from.map_or(last, |from| last.max(from)));
    Ok((start, end))
}

/// `<dir>/<stem>_filtered.xlsx` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_filtered.xlsx"))
}
