//! Depth-bounded directory walker.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which enumerates either every
//! directory (folder mode) or every regular file (file mode) beneath a root.
//! The walk is sequential and depth-first: a directory's own entry is emitted
//! before the entries of its children, and children are visited in name order
//! so that repeated scans of an unchanged tree yield identical results.
//!
//! # Depth
//!
//! Direct children of the root are at depth 0. A directory listed at depth
//! `d` only contributes entries while `d <= max_depth`; deeper branches are
//! omitted silently. The rule is the same for folders and files.
//!
//! # Failures
//!
//! A directory that cannot be read is skipped together with its whole subtree
//! (including its own folder entry). The failure is logged and recorded in
//! [`WalkResult::errors`]; it never aborts the walk.
//!
//! # Example
//!
//! ```no_run
//! use namedupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/projects"), WalkerConfig::default());
//! let result = walker.walk_files();
//! println!("{} files, {} unreadable entries", result.entries.len(), result.errors.len());
//! ```

use std::fs::{self, FileType};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use super::stats::folder_stats;
use super::{EntryKind, FileEntry, FolderEntry, ScanEntry, ScanError, WalkerConfig};
use crate::progress::ProgressCallback;

/// Entries produced by one walk plus the non-fatal failures met on the way.
#[derive(Debug)]
pub struct WalkResult<T> {
    /// Discovered entries in depth-first order
    pub entries: Vec<T>,
    /// Directories or files that could not be read and were skipped
    pub errors: Vec<ScanError>,
    /// Whether the walk stopped early because shutdown was requested
    pub interrupted: bool,
}

impl<T> Default for WalkResult<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            errors: Vec::new(),
            interrupted: false,
        }
    }
}

impl<T> WalkResult<T> {
    /// Append the results of a nested walk after the current entries.
    pub fn append(&mut self, nested: WalkResult<T>) {
        self.entries.extend(nested.entries);
        self.errors.extend(nested.errors);
        self.interrupted |= nested.interrupted;
    }

    /// Convert the entries, keeping errors and the interrupted flag.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> WalkResult<U> {
        WalkResult {
            entries: self.entries.into_iter().map(f).collect(),
            errors: self.errors,
            interrupted: self.interrupted,
        }
    }
}

/// One listed child of a directory.
struct Child {
    name: String,
    path: PathBuf,
    file_type: FileType,
}

/// Sequential directory walker for folder and file enumeration.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Compiled ignore patterns, `None` when no pattern is configured
    ignore: Option<Gitignore>,
    /// Optional shutdown flag for early termination
    shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback, notified once per emitted entry
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Entries emitted so far in the current walk
    emitted: AtomicUsize,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish_non_exhaustive()
    }
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        let ignore = build_ignore(path, &config.ignore_patterns);
        Self {
            root: path.to_path_buf(),
            config,
            ignore,
            shutdown_flag: None,
            progress_callback: None,
            emitted: AtomicUsize::new(0),
        }
    }

    /// Set the shutdown flag for early termination.
    ///
    /// When the flag becomes `true`, the walk stops at the next child and the
    /// result is marked as interrupted.
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

    /// Root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn report(&self, path: &Path) {
        let current = self.emitted.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(current, path.to_string_lossy().as_ref());
        }
    }

    /// Walk in the given mode, returning generic [`ScanEntry`] values.
    #[must_use]
    pub fn walk(&self, kind: EntryKind) -> WalkResult<ScanEntry> {
        match kind {
            EntryKind::Folders => self.walk_folders().map(ScanEntry::Folder),
            EntryKind::Files => self.walk_files().map(ScanEntry::File),
        }
    }

    /// Enumerate every directory beneath the root, with recursive totals.
    #[must_use]
    pub fn walk_folders(&self) -> WalkResult<FolderEntry> {
        self.emitted.store(0, Ordering::Relaxed);
        log::debug!(
            "Walking folders under {} (max depth {})",
            self.root.display(),
            self.config.max_depth
        );

        let mut result = self.collect_root(|dir| self.collect_folders(dir, 0));
        result.interrupted |= self.is_shutdown_requested();
        result
    }

    /// Enumerate every regular file beneath the root.
    #[must_use]
    pub fn walk_files(&self) -> WalkResult<FileEntry> {
        self.emitted.store(0, Ordering::Relaxed);
        log::debug!(
            "Walking files under {} (max depth {})",
            self.root.display(),
            self.config.max_depth
        );

        let mut result = self.collect_root(|dir| self.collect_files(dir, 0));
        result.interrupted |= self.is_shutdown_requested();
        result
    }

    fn collect_root<T>(
        &self,
        collect: impl FnOnce(&Path) -> Result<WalkResult<T>, ScanError>,
    ) -> WalkResult<T> {
        match collect(&self.root) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Cannot read scan root: {}", e);
                WalkResult {
                    errors: vec![e],
                    ..WalkResult::default()
                }
            }
        }
    }

    /// Folders beneath `dir`, whose direct children sit at `depth`.
    ///
    /// Fails only when `dir` itself cannot be listed; the caller then drops
    /// `dir` and everything below it.
    fn collect_folders(
        &self,
        dir: &Path,
        depth: usize,
    ) -> Result<WalkResult<FolderEntry>, ScanError> {
        let children = self.read_children(dir)?;
        let mut result = WalkResult::default();

        if depth > self.config.max_depth {
            return Ok(result);
        }

        for child in children {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping folder walk");
                result.interrupted = true;
                break;
            }

            if !child.file_type.is_dir() || self.is_filtered(&child) {
                continue;
            }

            match self.collect_folders(&child.path, depth + 1) {
                Ok(nested) => {
                    let stats = folder_stats(&child.path);
                    self.report(&child.path);
                    result.entries.push(FolderEntry {
                        name: child.name,
                        path: child.path,
                        depth,
                        file_count: stats.file_count,
                        size: stats.size,
                    });
                    result.append(nested);
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", child.path.display(), e);
                    result.errors.push(e);
                }
            }
        }

        Ok(result)
    }

    /// Files beneath `dir`, whose direct children sit at `depth`.
    fn collect_files(&self, dir: &Path, depth: usize) -> Result<WalkResult<FileEntry>, ScanError> {
        let children = self.read_children(dir)?;
        let mut result = WalkResult::default();

        if depth > self.config.max_depth {
            return Ok(result);
        }

        for child in children {
            if self.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping file walk");
                result.interrupted = true;
                break;
            }

            if self.is_filtered(&child) {
                continue;
            }

            if child.file_type.is_file() {
                match fs::metadata(&child.path) {
                    Ok(metadata) => {
                        self.report(&child.path);
                        result
                            .entries
                            .push(FileEntry::from_metadata(child.name, child.path, &metadata));
                    }
                    Err(e) => {
                        let err = ScanError::from_io(&child.path, e);
                        log::warn!("Skipping {}: {}", child.path.display(), err);
                        result.errors.push(err);
                    }
                }
            } else if child.file_type.is_dir() {
                match self.collect_files(&child.path, depth + 1) {
                    Ok(nested) => result.append(nested),
                    Err(e) => {
                        log::warn!("Skipping {}: {}", child.path.display(), e);
                        result.errors.push(e);
                    }
                }
            } else {
                log::trace!("Skipping non-regular entry: {}", child.path.display());
            }
        }

        Ok(result)
    }

    /// List the children of `dir`, sorted by name.
    ///
    /// Individual children whose type cannot be determined are dropped.
    fn read_children(&self, dir: &Path) -> Result<Vec<Child>, ScanError> {
        let read_dir = fs::read_dir(dir).map_err(|e| ScanError::from_io(dir, e))?;

        let mut children = Vec::new();
        for item in read_dir {
            let listed = item.and_then(|entry| entry.file_type().map(|ft| (entry, ft)));
            match listed {
                Ok((entry, file_type)) => children.push(Child {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: entry.path(),
                    file_type,
                }),
                Err(e) => {
                    log::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                }
            }
        }

        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    /// Check hidden-entry and ignore-pattern filters.
    fn is_filtered(&self, child: &Child) -> bool {
        if self.config.skip_hidden && child.name.starts_with('.') {
            log::trace!("Skipping hidden entry: {}", child.path.display());
            return true;
        }

        if let Some(ref gi) = self.ignore {
            let relative = child
                .path
                .strip_prefix(&self.root)
                .unwrap_or(child.path.as_path());
            if gi.matched(relative, child.file_type.is_dir()).is_ignore() {
                log::trace!("Ignoring: {}", child.path.display());
                return true;
            }
        }

        false
    }
}

/// Compile gitignore-style patterns relative to `root`.
fn build_ignore(root: &Path, patterns: &[String]) -> Option<Gitignore> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        if let Err(e) = builder.add_line(None, pattern) {
            log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
        }
    }

    match builder.build() {
        Ok(gitignore) if gitignore.is_empty() => None,
        Ok(gitignore) => Some(gitignore),
        Err(e) => {
            log::warn!("Failed to build ignore patterns: {}", e);
            None
        }
    }
}
