use namedupe::duplicates::{DuplicateFinder, FinderConfig, FinderError, SearchMode};
use namedupe::scanner::EntryKind;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_compare_two_roots_tags_sources() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();

    fs::create_dir_all(left.path().join("Music")).unwrap();
    fs::create_dir_all(left.path().join("only-left")).unwrap();
    fs::create_dir_all(right.path().join("music")).unwrap();

    let roots = vec![left.path().to_path_buf(), right.path().to_path_buf()];
    let report = DuplicateFinder::with_defaults()
        .compare_roots(&roots, EntryKind::Folders, SearchMode::Perfect)
        .unwrap();

    assert_eq!(report.roots, roots);
    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.name, "Music");
    assert_eq!(group.locations[0].source.as_deref(), Some(left.path()));
    assert_eq!(group.locations[1].source.as_deref(), Some(right.path()));

    assert_eq!(report.per_source_counts[left.path()], 2);
    assert_eq!(report.per_source_counts[right.path()], 1);
    assert_eq!(report.total_analyzed, 3);
    assert_eq!(report.total_duplicates, 2);
}

#[test]
fn test_compare_matches_duplicates_within_one_root() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();

    fs::create_dir_all(left.path().join("a/build")).unwrap();
    fs::create_dir_all(left.path().join("b/build")).unwrap();
    fs::create_dir_all(right.path().join("unrelated")).unwrap();

    let roots = vec![left.path().to_path_buf(), right.path().to_path_buf()];
    let report = DuplicateFinder::with_defaults()
        .compare_roots(&roots, EntryKind::Folders, SearchMode::Full)
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert!(report.groups[0]
        .locations
        .iter()
        .all(|l| l.source.as_deref() == Some(left.path())));
}

#[test]
fn test_compare_files_across_three_roots() {
    let roots: Vec<_> = (0..3).map(|_| tempdir().unwrap()).collect();
    for (i, root) in roots.iter().enumerate() {
        fs::write(root.path().join("config.yaml"), vec![b'c'; 100 + i]).unwrap();
    }

    let paths: Vec<PathBuf> = roots.iter().map(|r| r.path().to_path_buf()).collect();
    let report = DuplicateFinder::with_defaults()
        .compare_roots(&paths, EntryKind::Files, SearchMode::Perfect)
        .unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].count, 3);
    assert_eq!(report.per_source_counts.len(), 3);
    assert!(report.per_source_counts.values().all(|&count| count == 1));
}

#[test]
fn test_compare_missing_root_named_before_walking() {
    let existing = tempdir().unwrap();
    let missing = existing.path().join("missing");

    let roots = vec![missing.clone(), existing.path().to_path_buf()];
    match DuplicateFinder::with_defaults().compare_roots(&roots, EntryKind::Folders, SearchMode::Full)
    {
        Err(FinderError::PathNotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected PathNotFound, got {:?}", other),
    }
}

#[test]
fn test_compare_single_root_rejected() {
    let dir = tempdir().unwrap();

    let roots = vec![dir.path().to_path_buf()];
    match DuplicateFinder::with_defaults().compare_roots(&roots, EntryKind::Folders, SearchMode::Full)
    {
        Err(FinderError::TooFewRoots { provided }) => assert_eq!(provided, 1),
        other => panic!("Expected TooFewRoots, got {:?}", other),
    }
}

#[test]
fn test_compare_blank_roots_do_not_count() {
    let dir = tempdir().unwrap();

    let roots = vec![
        dir.path().to_path_buf(),
        PathBuf::from(""),
        PathBuf::from("   "),
    ];
    match DuplicateFinder::with_defaults().compare_roots(&roots, EntryKind::Files, SearchMode::Full) {
        Err(FinderError::TooFewRoots { provided }) => assert_eq!(provided, 1),
        other => panic!("Expected TooFewRoots, got {:?}", other),
    }
}

#[test]
fn test_compare_interrupted() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::create_dir_all(left.path().join("x")).unwrap();
    fs::create_dir_all(right.path().join("x")).unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag));

    let roots = vec![left.path().to_path_buf(), right.path().to_path_buf()];
    let result = finder.compare_roots(&roots, EntryKind::Folders, SearchMode::Full);
    assert!(matches!(result, Err(FinderError::Interrupted)));
}

#[test]
fn test_compare_same_root_twice() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("solo")).unwrap();

    let roots = vec![dir.path().to_path_buf(), dir.path().to_path_buf()];
    let report = DuplicateFinder::with_defaults()
        .compare_roots(&roots, EntryKind::Folders, SearchMode::Perfect)
        .unwrap();

    // Each pass contributes one entry under the same source key
    assert_eq!(report.per_source_counts[dir.path()], 2);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].count, 2);
}
