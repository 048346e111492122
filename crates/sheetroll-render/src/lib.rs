//! # sheetroll-render
//!
//! Rendering backends for filtered results.
//!
//! This crate provides:
//! - Excel summary export (styled header, auto-fit columns, atomic save)
//! - Text preview of the first rows
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheetroll_core::Renderer;
//! use sheetroll_render::{ExcelRenderer, PreviewRenderer};
//!
//! // Quick look at what matched
//! let preview = PreviewRenderer::new().max_rows(5).render(&result)?;
//! print!("{preview}");
//!
//! // Summary workbook on disk
//! ExcelRenderer::new().sheet_name("Summary").save(&result, "team_john.xlsx")?;
//!
//! // Or as bytes, for a download response
//! let xlsx_bytes = ExcelRenderer::new().sheet_name("Filtered_Data").render(&result)?;
//! ```

pub mod excel;
pub mod preview;

pub use excel::ExcelRenderer;
pub use preview::PreviewRenderer;
