use namedupe::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use namedupe::progress::ProgressCallback;
use namedupe::scanner::{ScanEntry, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn write_file(path: &Path, len: usize) {
    File::create(path)
        .unwrap()
        .write_all(&vec![b'x'; len])
        .unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let folders = finder.scan_folders(dir.path()).unwrap();
    let files = finder.scan_files(dir.path()).unwrap();

    assert!(folders.entries.is_empty());
    assert!(files.entries.is_empty());
    assert_eq!(folders.skipped, 0);
    assert_eq!(folders.root, dir.path());
}

#[test]
fn test_scan_folders_with_totals() {
    let dir = tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("drafts")).unwrap();
    write_file(&docs.join("a.txt"), 10);
    write_file(&docs.join("drafts/b.txt"), 30);
    write_file(&dir.path().join("loose.txt"), 5);

    let report = DuplicateFinder::with_defaults()
        .scan_folders(dir.path())
        .unwrap();

    assert_eq!(report.entries.len(), 2);
    match &report.entries[0] {
        ScanEntry::Folder(folder) => {
            assert_eq!(folder.name, "docs");
            assert_eq!(folder.depth, 0);
            assert_eq!(folder.file_count, 2);
            assert_eq!(folder.size, 40);
        }
        other => panic!("Expected folder, got {:?}", other),
    }
    match &report.entries[1] {
        ScanEntry::Folder(folder) => {
            assert_eq!(folder.name, "drafts");
            assert_eq!(folder.depth, 1);
            assert_eq!(folder.file_count, 1);
            assert_eq!(folder.size, 30);
        }
        other => panic!("Expected folder, got {:?}", other),
    }
    // drafts is inside docs, so its bytes are not added twice
    assert_eq!(report.total_size, 40);
}

#[test]
fn test_scan_files_metadata() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    write_file(&dir.path().join("Report.PDF"), 12);
    write_file(&dir.path().join("sub/README"), 3);

    let report = DuplicateFinder::with_defaults()
        .scan_files(dir.path())
        .unwrap();

    assert_eq!(report.entries.len(), 2);
    let by_name = |name: &str| {
        report
            .entries
            .iter()
            .find_map(|e| match e {
                ScanEntry::File(f) if f.name == name => Some(f.clone()),
                _ => None,
            })
            .unwrap()
    };

    let pdf = by_name("Report.PDF");
    assert_eq!(pdf.size, 12);
    assert_eq!(pdf.extension, ".PDF");

    let readme = by_name("README");
    assert_eq!(readme.extension, "");
    assert_eq!(readme.path, dir.path().join("sub/README"));
}

#[test]
fn test_scan_depth_first_order() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/inner")).unwrap();
    fs::create_dir_all(dir.path().join("b")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .scan_folders(dir.path())
        .unwrap();

    let names: Vec<&str> = report.entries.iter().map(ScanEntry::name).collect();
    assert_eq!(names, vec!["a", "inner", "b"]);
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for path in ["one/two/three", "one/four", "five"] {
        fs::create_dir_all(dir.path().join(path)).unwrap();
    }
    write_file(&dir.path().join("one/two/f.bin"), 64);
    write_file(&dir.path().join("five/g.bin"), 8);

    let finder = DuplicateFinder::with_defaults();
    let first = finder.scan_folders(dir.path()).unwrap();
    let second = finder.scan_folders(dir.path()).unwrap();
    assert_eq!(first.entries, second.entries);

    let first_files = finder.scan_files(dir.path()).unwrap();
    let second_files = finder.scan_files(dir.path()).unwrap();
    let key = |e: &ScanEntry| (e.path().to_path_buf(), e.size());
    assert_eq!(
        first_files.entries.iter().map(key).collect::<Vec<_>>(),
        second_files.entries.iter().map(key).collect::<Vec<_>>()
    );
}

#[test]
fn test_scan_depth_cap() {
    let dir = tempdir().unwrap();
    // Chain of 6 nested folders: d0/d1/d2/d3/d4/d5
    let mut path = dir.path().to_path_buf();
    for i in 0..6 {
        path = path.join(format!("d{}", i));
    }
    fs::create_dir_all(&path).unwrap();
    write_file(&path.join("deep.txt"), 1);

    let capped = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_max_depth(2)),
    );
    let report = capped.scan_folders(dir.path()).unwrap();
    assert_eq!(report.entries.len(), 3);
    for entry in &report.entries {
        match entry {
            ScanEntry::Folder(folder) => assert!(folder.depth <= 2),
            other => panic!("Expected folder, got {:?}", other),
        }
    }

    // Totals still cover the whole subtree
    assert_eq!(report.entries[0].file_count(), Some(1));

    // Files below the cap are omitted too
    let files = capped.scan_files(dir.path()).unwrap();
    assert!(files.entries.is_empty());

    let full = DuplicateFinder::with_defaults().scan_folders(dir.path()).unwrap();
    assert_eq!(full.entries.len(), 6);
    let files = DuplicateFinder::with_defaults().scan_files(dir.path()).unwrap();
    assert_eq!(files.entries.len(), 1);
}

#[test]
fn test_scan_skip_hidden_and_ignore() {
    let dir = tempdir().unwrap();
    for path in [".git/objects", "node_modules/pkg", "src"] {
        fs::create_dir_all(dir.path().join(path)).unwrap();
    }

    let config = WalkerConfig::default()
        .with_skip_hidden(true)
        .with_ignore_patterns(vec!["node_modules".to_string()]);
    let report = DuplicateFinder::new(FinderConfig::default().with_walker_config(config))
        .scan_folders(dir.path())
        .unwrap();

    let names: Vec<&str> = report.entries.iter().map(ScanEntry::name).collect();
    assert_eq!(names, vec!["src"]);
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    match DuplicateFinder::with_defaults().scan_folders(&missing) {
        Err(FinderError::PathNotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected PathNotFound, got {:?}", other),
    }
}

/// Removes a directory once the walk reports its first entry.
struct RemoveAfterFirstEntry {
    target: Mutex<Option<PathBuf>>,
}

impl ProgressCallback for RemoveAfterFirstEntry {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    fn on_progress(&self, _current: usize, _path: &str) {
        if let Some(target) = self.target.lock().unwrap().take() {
            fs::remove_dir_all(target).unwrap();
        }
    }

    fn on_phase_end(&self, _phase: &str) {}
}

#[test]
fn test_scan_counts_directory_removed_during_walk() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("kept")).unwrap();
    fs::create_dir_all(dir.path().join("removed/inner")).unwrap();
    write_file(&dir.path().join("removed/inner/f.bin"), 16);

    let callback = Arc::new(RemoveAfterFirstEntry {
        target: Mutex::new(Some(dir.path().join("removed"))),
    });
    let report = DuplicateFinder::new(FinderConfig::default().with_progress_callback(callback))
        .scan_folders(dir.path())
        .unwrap();

    let names: Vec<&str> = report.entries.iter().map(ScanEntry::name).collect();
    assert_eq!(names, vec!["kept"]);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.total_size, 0);
}

#[test]
fn test_scan_unicode_names() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("café")).unwrap();
    fs::create_dir(dir.path().join("日本語")).unwrap();

    let report = DuplicateFinder::with_defaults()
        .scan_folders(dir.path())
        .unwrap();

    let names: Vec<&str> = report.entries.iter().map(ScanEntry::name).collect();
    assert!(names.contains(&"café"));
    assert!(names.contains(&"日本語"));
}

#[cfg(unix)]
#[test]
fn test_scan_does_not_follow_symlinks() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("real")).unwrap();
    write_file(&dir.path().join("real/f.txt"), 4);
    std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
    std::os::unix::fs::symlink(dir.path().join("real/f.txt"), dir.path().join("f-link")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let folders = finder.scan_folders(dir.path()).unwrap();
    let names: Vec<&str> = folders.entries.iter().map(ScanEntry::name).collect();
    assert_eq!(names, vec!["real"]);

    let files = finder.scan_files(dir.path()).unwrap();
    assert_eq!(files.entries.len(), 1);
    assert_eq!(files.entries[0].name(), "f.txt");
}
