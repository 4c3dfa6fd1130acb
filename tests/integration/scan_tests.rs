use dupemerge::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupemerge::scanner::WalkerConfig;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (index, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(index.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(summary.directories_scanned, 1);
}

#[test]
fn test_scan_same_size_mixed_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), &[b'X'; 600]);
    write(&dir.path().join("b.txt"), &[b'X'; 600]);
    write(&dir.path().join("c.txt"), &[b'Y'; 600]);

    let (index, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(index.bucket(600).len(), 2);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 600);

    let duplicates = index.duplicate_groups();
    let mut names: Vec<_> = duplicates[0]
        .paths()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_scan_duplicates_across_nested_directories() {
    let dir = tempdir().unwrap();
    let content = b"holiday photo bytes".repeat(40);
    write(&dir.path().join("2019/summer/img.jpg"), &content);
    write(&dir.path().join("backup/old/deep/img_copy.jpg"), &content);
    write(&dir.path().join("img.jpg"), &content);

    let (index, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.total_files, 3);
    assert_eq!(index.len(), 1);
    assert_eq!(index.duplicate_groups()[0].len(), 3);
    // Breadth-first: the top-level file is discovered first.
    assert_eq!(
        index.duplicate_groups()[0].representative().path,
        dir.path().join("img.jpg")
    );
}

#[test]
fn test_scan_different_sizes_never_grouped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.bin"), &[0u8; 1000]);
    write(&dir.path().join("b.bin"), &[0u8; 1001]);

    let (index, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(index.size_count(), 2);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(summary.comparisons, 0);
}

#[test]
fn test_scan_ignores_git_and_small_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join(".git/objects/blob"), &[1u8; 2048]);
    write(&dir.path().join("src/.git/blob"), &[1u8; 2048]);
    write(&dir.path().join("kept.bin"), &[1u8; 2048]);
    write(&dir.path().join("tiny.txt"), b"small");

    let config =
        FinderConfig::default().with_walker_config(WalkerConfig::new([".git"], Some(512)));
    let (index, summary) = DuplicateFinder::new(config)
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(index.iter().all(|(_, g)| g.representative().path.ends_with("kept.bin")));
}

#[test]
fn test_scan_path_not_found() {
    let dir = tempdir().unwrap();
    let result = DuplicateFinder::with_defaults().find_duplicates(&dir.path().join("missing"));

    assert!(matches!(result, Err(FinderError::PathNotFound(_))));
}

#[test]
fn test_scan_root_is_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.bin");
    write(&file, b"x");

    let result = DuplicateFinder::with_defaults().find_duplicates(&file);

    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}

#[cfg(unix)]
#[test]
fn test_scan_unreadable_subdirectory_is_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    write(&locked.join("inner.bin"), &[7u8; 600]);
    write(&dir.path().join("visible.bin"), &[7u8; 600]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to observe in that case.
    let readable_anyway = fs::read_dir(&locked).is_ok();
    let result = DuplicateFinder::with_defaults().find_duplicates(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if !readable_anyway {
        assert!(matches!(result, Err(FinderError::Scan(_))));
    }
}
