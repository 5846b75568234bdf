//! Name-based duplicate grouping.
//!
//! # Overview
//!
//! Entries are bucketed by their normalized name (Unicode NFC, then
//! lowercase). What happens to a bucket depends on the [`SearchMode`]:
//!
//! - [`SearchMode::Full`]: every bucket with two or more members is a group.
//! - [`SearchMode::Perfect`]: each bucket is split by first-fit clustering.
//!   A member joins the first cluster whose representative (its first member)
//!   is within [`SIMILARITY_TOLERANCE`] on size and, for folders, on file
//!   count. Clusters with two or more members are groups.
//!
//! Groups are returned sorted by member count, largest first; ties keep the
//! order in which they were discovered.
//!
//! # Example
//!
//! ```
//! use namedupe::duplicates::{group_entries, LocatedEntry, SearchMode};
//! use namedupe::scanner::{FolderEntry, ScanEntry};
//! use std::path::PathBuf;
//!
//! let folder = |path: &str, size: u64| {
//!     LocatedEntry::new(ScanEntry::Folder(FolderEntry {
//!         name: "Backup".to_string(),
//!         path: PathBuf::from(path),
//!         depth: 0,
//!         file_count: 5,
//!         size,
//!     }))
//! };
//!
//! let entries = vec![folder("/a/Backup", 100), folder("/b/backup", 104)];
//! let (groups, stats) = group_entries(entries, SearchMode::Perfect);
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].count, 2);
//! assert_eq!(groups[0].name, "Backup");
//! assert_eq!(stats.duplicate_entries, 2);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::scanner::ScanEntry;

/// Maximum relative difference for two entries to count as the same in
/// perfect mode (`|a - b| / max(a, b)`).
pub const SIMILARITY_TOLERANCE: f64 = 0.10;

/// How strictly same-named entries must agree to be reported together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Same name is enough
    Full,
    /// Same name and similar size (and file count, for folders)
    #[default]
    Perfect,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Full => write!(f, "full"),
            SearchMode::Perfect => write!(f, "perfect"),
        }
    }
}

/// A scanned entry prepared for grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedEntry {
    /// Name as found on disk, used for display
    pub original_name: String,
    /// Root this entry was found under (multi-root comparisons only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// The scanned entry itself
    #[serde(flatten)]
    pub entry: ScanEntry,
}

impl LocatedEntry {
    /// Wrap an entry from a single-root scan.
    #[must_use]
    pub fn new(entry: ScanEntry) -> Self {
        Self {
            original_name: entry.name().to_string(),
            source: None,
            entry,
        }
    }

    /// Wrap an entry found under `source` in a multi-root comparison.
    #[must_use]
    pub fn with_source(entry: ScanEntry, source: &Path) -> Self {
        Self {
            source: Some(source.to_path_buf()),
            ..Self::new(entry)
        }
    }

    /// Path of the underlying entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.entry.path()
    }

    /// Size of the underlying entry in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.entry.size()
    }

    /// Whether `self` may join a cluster represented by `representative`.
    ///
    /// File counts are only compared when both entries are folders.
    #[must_use]
    pub fn is_similar_to(&self, representative: &LocatedEntry) -> bool {
        if !within_tolerance(self.size(), representative.size()) {
            return false;
        }

        match (self.entry.file_count(), representative.entry.file_count()) {
            (Some(ours), Some(theirs)) => within_tolerance(ours, theirs),
            _ => true,
        }
    }
}

/// Key used to bucket names: NFC-normalized and lowercased.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.nfc().collect::<String>().to_lowercase()
}

/// Relative-difference test used by perfect mode.
///
/// Equal values always match, which also settles `0` against `0` (whose
/// ratio would otherwise be undefined). A zero against any non-zero value has
/// ratio 1.0 and never matches.
#[must_use]
pub fn within_tolerance(a: u64, b: u64) -> bool {
    if a == b {
        return true;
    }

    let delta = a.abs_diff(b) as f64;
    let larger = a.max(b) as f64;
    delta / larger <= SIMILARITY_TOLERANCE
}

/// Entries judged to be duplicates of each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Display name, taken from the first member
    pub name: String,
    /// Number of members, always equal to `locations.len()` and at least 2
    pub count: usize,
    /// Members in discovery order
    pub locations: Vec<LocatedEntry>,
}

impl DuplicateGroup {
    /// Build a group, refusing fewer than two members.
    #[must_use]
    pub fn from_locations(locations: Vec<LocatedEntry>) -> Option<Self> {
        if locations.len() < 2 {
            return None;
        }

        Some(Self {
            name: locations[0].original_name.clone(),
            count: locations.len(),
            locations,
        })
    }

    /// Number of members in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false for groups built by [`DuplicateGroup::from_locations`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Bytes covered by the members.
    ///
    /// A folder nested inside another member (`x/x`) is already part of that
    /// member's size and is not added again; a path listed twice counts once.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.locations
            .iter()
            .enumerate()
            .filter(|&(idx, location)| !self.is_covered(idx, location.path()))
            .map(|(_, location)| location.size())
            .sum()
    }

    fn is_covered(&self, idx: usize, path: &Path) -> bool {
        self.locations
            .iter()
            .enumerate()
            .any(|(other_idx, other)| {
                let other_path = other.path();
                if other_path == path {
                    other_idx < idx
                } else {
                    path.starts_with(other_path)
                }
            })
    }

    /// Paths of all members.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.locations
            .iter()
            .map(|l| l.path().to_path_buf())
            .collect()
    }
}

/// Sum of member counts across groups.
#[must_use]
pub fn total_duplicates(groups: &[DuplicateGroup]) -> usize {
    groups.iter().map(|g| g.count).sum()
}

/// Statistics from one grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    /// Number of entries fed in
    pub total_entries: usize,
    /// Number of distinct normalized names
    pub distinct_names: usize,
    /// Names shared by two or more entries
    pub shared_names: usize,
    /// Shared names that perfect mode split into more than one cluster
    pub split_names: usize,
    /// Groups returned
    pub duplicate_groups: usize,
    /// Entries across all returned groups
    pub duplicate_entries: usize,
}

/// Split one name bucket into clusters of similar entries.
///
/// Members are visited in order; each joins the first existing cluster whose
/// first member it is similar to, or starts a new cluster.
#[must_use]
pub fn partition_by_similarity(bucket: Vec<LocatedEntry>) -> Vec<Vec<LocatedEntry>> {
    let mut clusters: Vec<Vec<LocatedEntry>> = Vec::new();

    for entry in bucket {
        let home = clusters
            .iter()
            .position(|cluster| entry.is_similar_to(&cluster[0]));

        match home {
            Some(idx) => clusters[idx].push(entry),
            None => clusters.push(vec![entry]),
        }
    }

    clusters
}

/// Group entries by name according to `mode`.
///
/// # Returns
///
/// A tuple of:
/// - `Vec<DuplicateGroup>` - groups with two or more members, largest first
/// - `GroupingStats` - statistics about the pass
#[must_use]
pub fn group_entries(
    entries: impl IntoIterator<Item = LocatedEntry>,
    mode: SearchMode,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut stats = GroupingStats::default();
    let mut bucket_index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Vec<LocatedEntry>> = Vec::new();

    for entry in entries {
        stats.total_entries += 1;
        let key = normalize_name(&entry.original_name);
        let idx = *bucket_index.entry(key).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[idx].push(entry);
    }

    stats.distinct_names = buckets.len();

    let mut groups = Vec::new();
    for bucket in buckets {
        if bucket.len() < 2 {
            continue;
        }
        stats.shared_names += 1;

        match mode {
            SearchMode::Full => groups.extend(DuplicateGroup::from_locations(bucket)),
            SearchMode::Perfect => {
                let clusters = partition_by_similarity(bucket);
                if clusters.len() > 1 {
                    stats.split_names += 1;
                    log::trace!(
                        "Name '{}' split into {} clusters",
                        clusters[0][0].original_name,
                        clusters.len()
                    );
                }
                groups.extend(
                    clusters
                        .into_iter()
                        .filter_map(DuplicateGroup::from_locations),
                );
            }
        }
    }

    // Stable: equal counts keep discovery order
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    stats.duplicate_groups = groups.len();
    stats.duplicate_entries = total_duplicates(&groups);

    log::info!(
        "Grouping ({} mode): {} entries, {} shared names -> {} groups covering {} entries",
        mode,
        stats.total_entries,
        stats.shared_names,
        stats.duplicate_groups,
        stats.duplicate_entries
    );

    (groups, stats)
}
