//! Scanner module for directory traversal and per-entry statistics.
//!
//! This module provides functionality for:
//! - Depth-bounded, sequential directory walking (folders or files)
//! - Recursive size and file-count totals for folders
//! - Hidden-entry and gitignore-style filtering
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal producing [`FolderEntry`] / [`FileEntry`] values
//! - [`stats`]: Best-effort recursive totals for a single directory
//!
//! # Example
//!
//! ```no_run
//! use namedupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     max_depth: 3,
//!     skip_hidden: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("."), config);
//! let result = walker.walk_folders();
//! for folder in &result.entries {
//!     println!("{} ({} files, {} bytes)", folder.path.display(), folder.file_count, folder.size);
//! }
//! ```

pub mod stats;
pub mod walker;

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export main types
pub use stats::{folder_stats, DirStats};
pub use walker::{WalkResult, Walker};

/// Default maximum depth for tree walks.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// A directory discovered during a folder walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Directory name, original case preserved
    pub name: String,
    /// Path of the directory (scan root joined with child names)
    pub path: PathBuf,
    /// Distance from the scan root (direct children are depth 0)
    pub depth: usize,
    /// Number of regular files nested at any depth
    pub file_count: u64,
    /// Total size in bytes of all nested regular files
    pub size: u64,
}

/// A regular file discovered during a file walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name, original case preserved
    pub name: String,
    /// Path of the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Extension including the leading dot, empty when there is none
    pub extension: String,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl FileEntry {
    /// Build an entry from a path and its stat result.
    ///
    /// A missing modification time (unsupported platform) falls back to the
    /// Unix epoch.
    #[must_use]
    pub fn from_metadata(name: String, path: PathBuf, metadata: &Metadata) -> Self {
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let extension = extension_of(&name);
        Self {
            name,
            path,
            size: metadata.len(),
            extension,
            modified: DateTime::<Utc>::from(modified),
        }
    }
}

/// Extension of a file name, including the leading dot.
///
/// Dot-files such as `.bashrc` have no extension; `archive.tar.gz` yields
/// `.gz`; a trailing dot yields `"."`.
#[must_use]
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// What a walk enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directories, each carrying recursive totals
    #[default]
    Folders,
    /// Regular files
    Files,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Folders => write!(f, "folders"),
            EntryKind::Files => write!(f, "files"),
        }
    }
}

/// One scanned folder or file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScanEntry {
    /// A directory with recursive totals
    Folder(FolderEntry),
    /// A regular file
    File(FileEntry),
}

impl ScanEntry {
    /// Name of the entry, original case preserved.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ScanEntry::Folder(folder) => &folder.name,
            ScanEntry::File(file) => &file.name,
        }
    }

    /// Path of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ScanEntry::Folder(folder) => &folder.path,
            ScanEntry::File(file) => &file.path,
        }
    }

    /// Size in bytes (recursive for folders).
    #[must_use]
    pub fn size(&self) -> u64 {
        match self {
            ScanEntry::Folder(folder) => folder.size,
            ScanEntry::File(file) => file.size,
        }
    }

    /// Recursive file count, only defined for folders.
    #[must_use]
    pub fn file_count(&self) -> Option<u64> {
        match self {
            ScanEntry::Folder(folder) => Some(folder.file_count),
            ScanEntry::File(_) => None,
        }
    }

    /// Which kind of walk produced this entry.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self {
            ScanEntry::Folder(_) => EntryKind::Folders,
            ScanEntry::File(_) => EntryKind::Files,
        }
    }
}

impl From<FolderEntry> for ScanEntry {
    fn from(folder: FolderEntry) -> Self {
        ScanEntry::Folder(folder)
    }
}

impl From<FileEntry> for ScanEntry {
    fn from(file: FileEntry) -> Self {
        ScanEntry::File(file)
    }
}

/// Configuration for directory walking.
///
/// Controls the depth cap and which entries are filtered out.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Deepest level that still contributes entries (direct children are 0).
    pub max_depth: usize,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,

    /// Glob patterns to ignore (gitignore-style).
    /// An ignored directory is skipped together with its subtree.
    pub ignore_patterns: Vec<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            skip_hidden: false,
            ignore_patterns: Vec::new(),
        }
    }
}

impl WalkerConfig {
    /// Set the maximum depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable hidden-entry skipping.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    /// Set the gitignore-style patterns to skip.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }
}

/// Errors that can occur while reading a single directory or file.
///
/// These never abort a walk; they are logged and collected in
/// [`WalkResult::errors`].
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry vanished between listing and reading.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error for the given path.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ScanError::PermissionDenied(path) | ScanError::NotFound(path) => path,
            ScanError::Io { path, .. } => path,
        }
    }
}
