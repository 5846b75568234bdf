//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Name bucketing with Unicode-aware case folding
//! - Tolerance-based clustering of same-named entries (perfect mode)
//! - Single-root and multi-root scan orchestration

pub mod finder;
pub mod groups;

pub use finder::{
    ComparisonReport, DuplicateFinder, DuplicateReport, FinderConfig, FinderError, ScanReport,
};
pub use groups::{
    group_entries, normalize_name, partition_by_similarity, total_duplicates, within_tolerance,
    DuplicateGroup, GroupingStats, LocatedEntry, SearchMode, SIMILARITY_TOLERANCE,
};
