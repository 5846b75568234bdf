//! Scan orchestration for single and multiple roots.
//!
//! # Overview
//!
//! [`DuplicateFinder`] ties the pieces together:
//! 1. **Validate** - every root must exist and be a directory
//! 2. **Walk** - collect folders or files with the [`Walker`]
//! 3. **Group** - bucket by name and cluster with [`group_entries`]
//!
//! Multi-root comparisons walk each root independently, tag every entry with
//! the root it came from and group the concatenated list exactly like a
//! single-root scan.
//!
//! # Example
//!
//! ```no_run
//! use namedupe::duplicates::{DuplicateFinder, SearchMode};
//! use namedupe::scanner::EntryKind;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let roots = vec![PathBuf::from("/mnt/disk1"), PathBuf::from("/mnt/disk2")];
//! let report = finder
//!     .compare_roots(&roots, EntryKind::Folders, SearchMode::Perfect)
//!     .unwrap();
//!
//! for group in &report.groups {
//!     println!("{} x{}", group.name, group.count);
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::groups::{group_entries, DuplicateGroup, GroupingStats, LocatedEntry, SearchMode};
use crate::progress::ProgressCallback;
use crate::scanner::{EntryKind, ScanEntry, ScanError, WalkResult, Walker, WalkerConfig};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that can occur during a scan.
///
/// Per-directory read failures are not errors at this level; they are
/// collected and reported as the `skipped` count of a report.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A comparison needs at least two non-blank roots.
    #[error("At least 2 paths are required for comparison, got {provided}")]
    TooFewRoots {
        /// Number of non-blank roots supplied
        provided: usize,
    },
}

/// Result of listing one root.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Root that was walked
    pub root: PathBuf,
    /// What was listed
    pub kind: EntryKind,
    /// Entries in walk order
    pub entries: Vec<ScanEntry>,
    /// Bytes covered by the listing, each file counted once
    pub total_size: u64,
    /// Number of directories or files that could not be read
    pub skipped: usize,
    /// When the scan started
    pub scanned_at: DateTime<Utc>,
    /// Non-fatal failures met during the walk
    #[serde(skip)]
    pub errors: Vec<ScanError>,
    /// Wall-clock time of the scan
    #[serde(skip)]
    pub scan_duration: Duration,
}

/// Result of a duplicate search under one root.
#[derive(Debug, Serialize)]
pub struct DuplicateReport {
    /// Root that was walked
    pub root: PathBuf,
    /// What was compared
    pub kind: EntryKind,
    /// Matching strictness
    pub mode: SearchMode,
    /// Duplicate groups, largest first
    pub groups: Vec<DuplicateGroup>,
    /// Sum of member counts across groups
    pub total_duplicates: usize,
    /// Number of entries walked and grouped
    pub total_analyzed: usize,
    /// Number of directories or files that could not be read
    pub skipped: usize,
    /// Grouping statistics
    pub stats: GroupingStats,
    /// When the scan started
    pub scanned_at: DateTime<Utc>,
    /// Non-fatal failures met during the walk
    #[serde(skip)]
    pub errors: Vec<ScanError>,
    /// Wall-clock time of the scan
    #[serde(skip)]
    pub scan_duration: Duration,
}

/// Result of a duplicate search across several roots.
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    /// Roots that were walked, blanks removed, in input order
    pub roots: Vec<PathBuf>,
    /// What was compared
    pub kind: EntryKind,
    /// Matching strictness
    pub mode: SearchMode,
    /// Duplicate groups, largest first; every location carries its source
    pub groups: Vec<DuplicateGroup>,
    /// Sum of member counts across groups
    pub total_duplicates: usize,
    /// Entries contributed by each root
    pub per_source_counts: BTreeMap<PathBuf, usize>,
    /// Number of entries walked and grouped across all roots
    pub total_analyzed: usize,
    /// Number of directories or files that could not be read
    pub skipped: usize,
    /// Grouping statistics
    pub stats: GroupingStats,
    /// When the scan started
    pub scanned_at: DateTime<Utc>,
    /// Non-fatal failures met during the walks
    #[serde(skip)]
    pub errors: Vec<ScanError>,
    /// Wall-clock time of the scan
    #[serde(skip)]
    pub scan_duration: Duration,
}

/// Entry point for listing and duplicate searches.
///
/// Holds no per-scan state, so one finder can serve independent calls
/// from several threads.
///
/// # Example
///
/// ```no_run
/// use namedupe::duplicates::{DuplicateFinder, SearchMode};
/// use namedupe::scanner::EntryKind;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates(Path::new("."), EntryKind::Files, SearchMode::Full) {
///     Ok(report) => println!("{} duplicate entries", report.total_duplicates),
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The finder's configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// List every folder beneath `root` with recursive totals.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the root does not exist, is not a directory,
    /// or the scan is interrupted.
    pub fn scan_folders(&self, root: &Path) -> Result<ScanReport, FinderError> {
        self.scan(root, EntryKind::Folders)
    }

    /// List every regular file beneath `root`.
    ///
    /// # Errors
    ///
    /// Same as [`DuplicateFinder::scan_folders`].
    pub fn scan_files(&self, root: &Path) -> Result<ScanReport, FinderError> {
        self.scan(root, EntryKind::Files)
    }

    /// List folders or files beneath `root`.
    ///
    /// # Errors
    ///
    /// Same as [`DuplicateFinder::scan_folders`].
    pub fn scan(&self, root: &Path, kind: EntryKind) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();
        let scanned_at = Utc::now();

        validate_root(root)?;
        log::info!("Listing {} under {}", kind, root.display());

        let walked = self.walk_root(root, kind)?;
        let total_size = listed_size(&walked.entries);

        log::info!(
            "Found {} {} ({} skipped)",
            walked.entries.len(),
            kind,
            walked.errors.len()
        );

        Ok(ScanReport {
            root: root.to_path_buf(),
            kind,
            entries: walked.entries,
            total_size,
            skipped: walked.errors.len(),
            scanned_at,
            errors: walked.errors,
            scan_duration: start_time.elapsed(),
        })
    }

    /// Find same-named folders or files beneath `root`.
    ///
    /// # Returns
    ///
    /// A [`DuplicateReport`] whose groups are sorted by member count,
    /// largest first. Locations carry no `source`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist
    /// - The path is not a directory
    /// - The scan is interrupted by shutdown signal
    pub fn find_duplicates(
        &self,
        root: &Path,
        kind: EntryKind,
        mode: SearchMode,
    ) -> Result<DuplicateReport, FinderError> {
        let start_time = Instant::now();
        let scanned_at = Utc::now();

        validate_root(root)?;
        log::info!(
            "Searching duplicate {} under {} ({} mode)",
            kind,
            root.display(),
            mode
        );

        let walked = self.walk_root(root, kind)?;
        let total_analyzed = walked.entries.len();
        let located = walked.entries.into_iter().map(LocatedEntry::new);
        let (groups, stats) = self.group(located, total_analyzed, mode)?;

        Ok(DuplicateReport {
            root: root.to_path_buf(),
            kind,
            mode,
            total_duplicates: stats.duplicate_entries,
            groups,
            total_analyzed,
            skipped: walked.errors.len(),
            stats,
            scanned_at,
            errors: walked.errors,
            scan_duration: start_time.elapsed(),
        })
    }

    /// Find same-named folders or files across several roots.
    ///
    /// Blank roots (empty or whitespace only) are dropped first. All
    /// remaining roots are validated before anything is walked.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - Fewer than two non-blank roots remain
    /// - A root does not exist (the first missing one is named)
    /// - A root is not a directory
    /// - The scan is interrupted by shutdown signal
    pub fn compare_roots(
        &self,
        roots: &[PathBuf],
        kind: EntryKind,
        mode: SearchMode,
    ) -> Result<ComparisonReport, FinderError> {
        let start_time = Instant::now();
        let scanned_at = Utc::now();

        let roots: Vec<PathBuf> = roots.iter().filter(|r| !is_blank(r)).cloned().collect();
        if roots.len() < 2 {
            return Err(FinderError::TooFewRoots {
                provided: roots.len(),
            });
        }

        if let Some(missing) = roots.iter().find(|r| !r.exists()) {
            return Err(FinderError::PathNotFound(missing.clone()));
        }
        for root in &roots {
            validate_root(root)?;
        }

        log::info!(
            "Comparing {} across {} roots ({} mode): {:?}",
            kind,
            roots.len(),
            mode,
            roots.iter().map(|p| p.display()).collect::<Vec<_>>()
        );

        let mut located = Vec::new();
        let mut per_source_counts = BTreeMap::new();
        let mut errors = Vec::new();

        for root in &roots {
            let walked = self.walk_root(root, kind)?;
            log::debug!(
                "{} contributed {} {}",
                root.display(),
                walked.entries.len(),
                kind
            );

            *per_source_counts.entry(root.clone()).or_insert(0) += walked.entries.len();
            located.extend(
                walked
                    .entries
                    .into_iter()
                    .map(|entry| LocatedEntry::with_source(entry, root)),
            );
            errors.extend(walked.errors);
        }

        let total_analyzed = located.len();
        let (groups, stats) = self.group(located, total_analyzed, mode)?;

        Ok(ComparisonReport {
            roots,
            kind,
            mode,
            total_duplicates: stats.duplicate_entries,
            groups,
            per_source_counts,
            total_analyzed,
            skipped: errors.len(),
            stats,
            scanned_at,
            errors,
            scan_duration: start_time.elapsed(),
        })
    }

    /// Walk one validated root, reporting progress for the walking phase.
    fn walk_root(&self, root: &Path, kind: EntryKind) -> Result<WalkResult<ScanEntry>, FinderError> {
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_message(&root.display().to_string());
            callback.on_phase_start("walking", 0);
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let result = walker.walk(kind);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if result.interrupted {
            log::info!("Walk of {} interrupted", root.display());
            return Err(FinderError::Interrupted);
        }

        Ok(result)
    }

    fn group(
        &self,
        entries: impl IntoIterator<Item = LocatedEntry>,
        total: usize,
        mode: SearchMode,
    ) -> Result<(Vec<DuplicateGroup>, GroupingStats), FinderError> {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("grouping", total);
        }

        let grouped = group_entries(entries, mode);

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("grouping");
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        Ok(grouped)
    }
}

fn validate_root(root: &Path) -> Result<(), FinderError> {
    if !root.exists() {
        return Err(FinderError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(FinderError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Size of a listing without counting nested folders twice.
///
/// Folder sizes are recursive, so only top-level folders contribute; every
/// deeper folder is inside one of them.
fn listed_size(entries: &[ScanEntry]) -> u64 {
    entries
        .iter()
        .filter(|entry| match entry {
            ScanEntry::Folder(folder) => folder.depth == 0,
            ScanEntry::File(_) => true,
        })
        .map(ScanEntry::size)
        .sum()
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}
