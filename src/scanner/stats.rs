//! Recursive size and file-count totals for a directory.
//!
//! Totals are best-effort: anything that cannot be read is skipped and the
//! accumulation continues with its siblings. There is no depth limit here,
//! since the walker's depth cap must not truncate a folder's real size.

use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Aggregated totals for one directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirStats {
    /// Sum of the sizes of all nested regular files, in bytes
    pub size: u64,
    /// Number of nested regular files (directories are not counted)
    pub file_count: u64,
}

impl DirStats {
    fn add_file(&mut self, len: u64) {
        self.size = self.size.saturating_add(len);
        self.file_count += 1;
    }
}

/// Compute the total size and file count beneath `path`.
///
/// Symbolic links are neither followed nor counted. Permission errors and
/// entries that vanish mid-walk are logged at debug level and skipped, so an
/// empty or unreadable tree simply yields `DirStats::default()`.
///
/// # Example
///
/// ```no_run
/// use namedupe::scanner::folder_stats;
/// use std::path::Path;
///
/// let stats = folder_stats(Path::new("/var/log"));
/// println!("{} files, {} bytes", stats.file_count, stats.size);
/// ```
#[must_use]
pub fn folder_stats(path: &Path) -> DirStats {
    let mut stats = DirStats::default();

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping while sizing {}: {}", path.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => stats.add_file(metadata.len()),
            Err(e) => {
                log::debug!("Skipping {}: {}", entry.path().display(), e);
            }
        }
    }

    log::trace!(
        "Stats for {}: {} files, {} bytes",
        path.display(),
        stats.file_count,
        stats.size
    );

    stats
}
