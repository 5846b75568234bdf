//! Output formatters for scan reports.
//!
//! This module provides different output formats for scan results:
//! - Text for people at a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! Every report type implements [`Render`], so [`write_report`] can emit any
//! of them in any format.
//!
//! # Example
//!
//! ```no_run
//! use namedupe::duplicates::{DuplicateFinder, SearchMode};
//! use namedupe::error::ExitCode;
//! use namedupe::output::json::JsonOutput;
//! use namedupe::scanner::EntryKind;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let report = finder
//!     .find_duplicates(Path::new("."), EntryKind::Folders, SearchMode::Perfect)
//!     .unwrap();
//!
//! let output = JsonOutput::new(&report, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::duplicates::{ComparisonReport, DuplicateReport, ScanReport};
use crate::error::ExitCode;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::{JsonOutput, JsonOutputError};
pub use self::text::TextOutput;

/// A report that can be written in every output format.
pub trait Render: Serialize {
    /// Write the human-readable form.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_text<W: Write>(&self, text: &TextOutput, out: &mut W) -> io::Result<()>;

    /// CSV formatter over this report's rows.
    fn csv(&self) -> CsvOutput<'_>;
}

impl Render for ScanReport {
    fn write_text<W: Write>(&self, text: &TextOutput, out: &mut W) -> io::Result<()> {
        text.write_scan(self, out)
    }

    fn csv(&self) -> CsvOutput<'_> {
        CsvOutput::from_entries(&self.entries)
    }
}

impl Render for DuplicateReport {
    fn write_text<W: Write>(&self, text: &TextOutput, out: &mut W) -> io::Result<()> {
        text.write_duplicates(self, out)
    }

    fn csv(&self) -> CsvOutput<'_> {
        CsvOutput::from_groups(&self.groups)
    }
}

impl Render for ComparisonReport {
    fn write_text<W: Write>(&self, text: &TextOutput, out: &mut W) -> io::Result<()> {
        text.write_comparison(self, out)
    }

    fn csv(&self) -> CsvOutput<'_> {
        CsvOutput::from_groups(&self.groups)
    }
}

/// Errors that can occur while writing a report.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// Writing text failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    /// JSON output failed.
    #[error(transparent)]
    Json(#[from] JsonOutputError),

    /// CSV output failed.
    #[error(transparent)]
    Csv(#[from] CsvOutputError),
}

/// Write `report` to `out` in the requested format.
///
/// # Errors
///
/// Returns `OutputError` if serialization or writing fails.
pub fn write_report<R: Render, W: Write>(
    report: &R,
    format: OutputFormat,
    color: bool,
    exit_code: ExitCode,
    out: &mut W,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Text => report.write_text(&TextOutput::new(color), out)?,
        OutputFormat::Json => JsonOutput::new(report, exit_code).write_to(out, true)?,
        OutputFormat::Csv => report.csv().write_to(&mut *out)?,
    }
    out.flush()?;
    Ok(())
}
