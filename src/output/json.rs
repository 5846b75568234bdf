//! JSON output formatter for scan reports.
//!
//! Provides machine-readable JSON output for scripting and automation. The
//! report's own fields are emitted at the top level, followed by the exit
//! code of the run.
//!
//! # Output Schema (find)
//!
//! ```json
//! {
//!   "root": "/data",
//!   "kind": "folders",
//!   "mode": "perfect",
//!   "groups": [
//!     {
//!       "name": "Backup",
//!       "count": 2,
//!       "locations": [
//!         { "original_name": "Backup", "kind": "folder", "name": "Backup",
//!           "path": "/data/a/Backup", "depth": 1, "file_count": 5, "size": 100 }
//!       ]
//!     }
//!   ],
//!   "total_duplicates": 2,
//!   "total_analyzed": 40,
//!   "skipped": 0,
//!   "stats": { "total_entries": 40, "...": "..." },
//!   "scanned_at": "2024-01-01T00:00:00Z",
//!   "exit_code": 0,
//!   "exit_code_name": "ND000"
//! }
//! ```
//!
//! Comparison reports carry `roots` and `per_source_counts` instead of
//! `root`, and every location has a `source`.

use std::io::Write;

use serde::Serialize;

use crate::error::ExitCode;

/// A report together with the exit code it produced.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, R: Serialize> {
    /// The report, flattened into the top-level object
    #[serde(flatten)]
    pub report: &'a R,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "ND000")
    pub exit_code_name: &'static str,
}

impl<'a, R: Serialize> JsonOutput<'a, R> {
    /// Wrap a report for output.
    ///
    /// # Example
    ///
    /// ```
    /// use namedupe::error::ExitCode;
    /// use namedupe::output::json::JsonOutput;
    ///
    /// #[derive(serde::Serialize)]
    /// struct Tiny { total: usize }
    ///
    /// let report = Tiny { total: 3 };
    /// let output = JsonOutput::new(&report, ExitCode::Success);
    /// assert_eq!(output.to_json().unwrap(), r#"{"total":3,"exit_code":0,"exit_code_name":"ND000"}"#);
    /// ```
    #[must_use]
    pub fn new(report: &'a R, exit_code: ExitCode) -> Self {
        Self {
            report,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
