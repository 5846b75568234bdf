//! CSV output formatter for scan reports.
//!
//! Provides machine-readable CSV output for spreadsheets and data analysis.
//! Listings produce one row per entry; duplicate searches produce one row per
//! group member, with `group_id` tying members together.
//!
//! # Columns
//!
//! - `group_id`: 1-based group number (empty for listings)
//! - `kind`: `folder` or `file`
//! - `name`: Entry name as found on disk
//! - `path`: Path of the entry
//! - `source`: Root the entry came from (comparisons only)
//! - `size`: Size in bytes (recursive for folders)
//! - `file_count`: Nested file count (folders only)
//! - `extension`: File extension with leading dot (files only)
//! - `modified`: Last modified time, RFC 3339 (files only)
//!
//! # Example
//!
//! ```no_run
//! use namedupe::duplicates::{DuplicateFinder, SearchMode};
//! use namedupe::output::csv::CsvOutput;
//! use namedupe::scanner::EntryKind;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let report = finder
//!     .find_duplicates(Path::new("."), EntryKind::Files, SearchMode::Full)
//!     .unwrap();
//!
//! CsvOutput::from_groups(&report.groups).write_to(std::io::stdout()).unwrap();
//! ```

use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;
use crate::scanner::ScanEntry;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: Option<usize>,
    kind: &'static str,
    name: &'a str,
    path: String,
    source: String,
    size: u64,
    file_count: Option<u64>,
    extension: &'a str,
    modified: String,
}

impl<'a> CsvRow<'a> {
    fn new(group_id: Option<usize>, entry: &'a ScanEntry, source: Option<&Path>) -> Self {
        let (kind, extension, modified) = match entry {
            ScanEntry::Folder(_) => ("folder", "", String::new()),
            ScanEntry::File(file) => ("file", file.extension.as_str(), file.modified.to_rfc3339()),
        };

        Self {
            group_id,
            kind,
            name: entry.name(),
            path: entry.path().to_string_lossy().into_owned(),
            source: source
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: entry.size(),
            file_count: entry.file_count(),
            extension,
            modified,
        }
    }
}

enum Rows<'a> {
    Entries(&'a [ScanEntry]),
    Groups(&'a [DuplicateGroup]),
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    rows: Rows<'a>,
}

impl<'a> CsvOutput<'a> {
    /// Formatter for a listing.
    #[must_use]
    pub fn from_entries(entries: &'a [ScanEntry]) -> Self {
        Self {
            rows: Rows::Entries(entries),
        }
    }

    /// Formatter for duplicate groups.
    #[must_use]
    pub fn from_groups(groups: &'a [DuplicateGroup]) -> Self {
        Self {
            rows: Rows::Groups(groups),
        }
    }

    /// Write the CSV output to the given writer.
    ///
    /// A header row is always written, even when there are no rows.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record([
            "group_id",
            "kind",
            "name",
            "path",
            "source",
            "size",
            "file_count",
            "extension",
            "modified",
        ])?;

        match self.rows {
            Rows::Entries(entries) => {
                for entry in entries {
                    csv_writer.serialize(CsvRow::new(None, entry, None))?;
                }
            }
            Rows::Groups(groups) => {
                for (idx, group) in groups.iter().enumerate() {
                    for location in &group.locations {
                        csv_writer.serialize(CsvRow::new(
                            Some(idx + 1),
                            &location.entry,
                            location.source.as_deref(),
                        ))?;
                    }
                }
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
