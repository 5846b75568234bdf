//! Human-readable output.
//!
//! Headings are bold and group names colored when color is enabled; sizes
//! are rendered with `bytesize`.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Condition, Paint};

use crate::duplicates::{ComparisonReport, DuplicateGroup, DuplicateReport, LocatedEntry, ScanReport};
use crate::scanner::{EntryKind, ScanEntry};

/// Plain-text report writer.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput {
    color: Condition,
}

impl TextOutput {
    /// Create a writer, with or without ANSI colors.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self {
            color: if color {
                Condition::ALWAYS
            } else {
                Condition::NEVER
            },
        }
    }

    /// Write a listing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_scan<W: Write>(&self, report: &ScanReport, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{}",
            format!(
                "{} {} under {} ({})",
                report.entries.len(),
                report.kind,
                report.root.display(),
                ByteSize::b(report.total_size)
            )
            .bold()
            .whenever(self.color)
        )?;

        for entry in &report.entries {
            writeln!(out, "  {}", describe(entry))?;
        }

        write_skipped(out, report.skipped)
    }

    /// Write the duplicates found under one root.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_duplicates<W: Write>(&self, report: &DuplicateReport, out: &mut W) -> io::Result<()> {
        let heading = format!(
            "{} duplicate {} in {} groups among {} analyzed under {} ({} mode)",
            report.total_duplicates,
            report.kind,
            report.groups.len(),
            report.total_analyzed,
            report.root.display(),
            report.mode
        );
        writeln!(out, "{}", heading.bold().whenever(self.color))?;

        self.write_groups(&report.groups, report.kind, out)?;
        write_skipped(out, report.skipped)
    }

    /// Write the duplicates found across several roots.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_comparison<W: Write>(
        &self,
        report: &ComparisonReport,
        out: &mut W,
    ) -> io::Result<()> {
        let heading = format!(
            "{} duplicate {} in {} groups across {} roots ({} mode)",
            report.total_duplicates,
            report.kind,
            report.groups.len(),
            report.roots.len(),
            report.mode
        );
        writeln!(out, "{}", heading.bold().whenever(self.color))?;

        for root in &report.roots {
            let contributed = report.per_source_counts.get(root).copied().unwrap_or(0);
            writeln!(out, "  {}: {} {}", root.display(), contributed, report.kind)?;
        }

        self.write_groups(&report.groups, report.kind, out)?;
        write_skipped(out, report.skipped)
    }

    fn write_groups<W: Write>(
        &self,
        groups: &[DuplicateGroup],
        kind: EntryKind,
        out: &mut W,
    ) -> io::Result<()> {
        if groups.is_empty() {
            writeln!(out)?;
            return writeln!(out, "No duplicate {kind} found.");
        }

        for (idx, group) in groups.iter().enumerate() {
            writeln!(out)?;
            writeln!(
                out,
                "[{}] {} ({} entries, {})",
                idx + 1,
                group.name.as_str().green().bold().whenever(self.color),
                group.count,
                ByteSize::b(group.total_size())
            )?;
            for location in &group.locations {
                writeln!(out, "    {}", describe_located(location))?;
            }
        }
        Ok(())
    }
}

fn describe(entry: &ScanEntry) -> String {
    match entry.file_count() {
        Some(files) => format!(
            "{}  ({} files, {})",
            entry.path().display(),
            files,
            ByteSize::b(entry.size())
        ),
        None => format!("{}  ({})", entry.path().display(), ByteSize::b(entry.size())),
    }
}

fn describe_located(location: &LocatedEntry) -> String {
    match location.source {
        Some(ref source) => format!("{}  [{}]", describe(&location.entry), source.display()),
        None => describe(&location.entry),
    }
}

fn write_skipped<W: Write>(out: &mut W, skipped: usize) -> io::Result<()> {
    if skipped > 0 {
        writeln!(out)?;
        writeln!(out, "{skipped} unreadable entries were skipped (see warnings)")?;
    }
    Ok(())
}
