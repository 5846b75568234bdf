#![cfg(unix)]

use namedupe::duplicates::{DuplicateFinder, SearchMode};
use namedupe::error::ExitCode;
use namedupe::scanner::{EntryKind, ScanEntry};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Restores permissions on drop so the temp dir can be cleaned up.
struct Locked(PathBuf);

impl Locked {
    fn new(path: &Path) -> Self {
        fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
        Self(path.to_path_buf())
    }

    /// Privileged users can read anything; such runs cannot exercise this.
    fn is_effective(&self) -> bool {
        fs::read_dir(&self.0).is_err()
    }
}

impl Drop for Locked {
    fn drop(&mut self) {
        let _ = fs::set_permissions(&self.0, fs::Permissions::from_mode(0o755));
    }
}

#[test]
fn test_locked_folder_is_omitted_without_error() {
    let dir = tempdir().unwrap();
    for name in ["alpha", "beta", "gamma"] {
        fs::create_dir(dir.path().join(name)).unwrap();
    }
    fs::create_dir_all(dir.path().join("locked/hidden-child")).unwrap();
    fs::write(dir.path().join("locked/secret.txt"), b"secret").unwrap();

    let locked = Locked::new(&dir.path().join("locked"));
    if !locked.is_effective() {
        eprintln!("Skipping: permissions are not enforced for this user");
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .scan_folders(dir.path())
        .unwrap();

    let names: Vec<&str> = report.entries.iter().map(ScanEntry::name).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors[0].path(), dir.path().join("locked"));
    assert_eq!(ExitCode::for_listing(report.skipped), ExitCode::PartialSuccess);
}

#[test]
fn test_locked_folder_skipped_in_file_walk() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("open")).unwrap();
    fs::write(dir.path().join("open/a.txt"), b"a").unwrap();
    fs::create_dir(dir.path().join("locked")).unwrap();
    fs::write(dir.path().join("locked/a.txt"), b"a").unwrap();

    let locked = Locked::new(&dir.path().join("locked"));
    if !locked.is_effective() {
        eprintln!("Skipping: permissions are not enforced for this user");
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path(), EntryKind::Files, SearchMode::Full)
        .unwrap();

    assert_eq!(report.total_analyzed, 1);
    assert!(report.groups.is_empty());
    assert_eq!(report.skipped, 1);
    assert_eq!(
        ExitCode::for_search(report.groups.len(), report.skipped),
        ExitCode::PartialSuccess
    );
}

#[test]
fn test_locked_subtree_under_totals_parent() {
    let dir = tempdir().unwrap();
    let parent = dir.path().join("parent");
    fs::create_dir_all(parent.join("locked")).unwrap();
    fs::write(parent.join("visible.txt"), b"1234").unwrap();
    fs::write(parent.join("locked/hidden.txt"), b"12345678").unwrap();

    let locked = Locked::new(&parent.join("locked"));
    if !locked.is_effective() {
        eprintln!("Skipping: permissions are not enforced for this user");
        return;
    }

    let report = DuplicateFinder::with_defaults()
        .scan_folders(dir.path())
        .unwrap();

    // The parent is still reported; its totals only cover what was readable
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].name(), "parent");
    assert_eq!(report.entries[0].size(), 4);
    assert_eq!(report.entries[0].file_count(), Some(1));
}
