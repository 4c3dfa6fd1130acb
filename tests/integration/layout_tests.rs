use dupemerge::error::AppError;
use dupemerge::layout::InputLayout;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn input_dir(root: &Path) -> PathBuf {
    let input = root.join("incoming");
    for name in ["unclassified", "unique", "duplicate"] {
        fs::create_dir_all(input.join(name)).unwrap();
    }
    input
}

#[test]
fn test_layout_accepts_populated_unclassified() {
    let dir = tempdir().unwrap();
    let input = input_dir(dir.path());
    fs::create_dir_all(input.join("unclassified/nested")).unwrap();
    fs::write(input.join("unclassified/nested/file.bin"), [0u8; 10]).unwrap();
    let dest = dir.path().join("library");
    fs::create_dir(&dest).unwrap();

    let layout = InputLayout::validate(&input, &dest).unwrap();

    assert_eq!(layout.input, input);
    assert!(layout.unclassified.ends_with("unclassified"));
}

#[test]
fn test_layout_rejects_nonempty_unique() {
    let dir = tempdir().unwrap();
    let input = input_dir(dir.path());
    fs::write(input.join("unique/already.jpg"), b"x").unwrap();

    let err = InputLayout::validate(&input, dir.path()).unwrap_err();

    assert_eq!(err.kind(), "invalid_input");
    assert!(err.to_string().contains("unique"));
}

#[test]
fn test_layout_rejects_nonempty_duplicate() {
    let dir = tempdir().unwrap();
    let input = input_dir(dir.path());
    fs::write(input.join("duplicate/already.jpg"), b"x").unwrap();

    let err = InputLayout::validate(&input, dir.path()).unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(ref m) if m.contains("duplicate")));
}

#[test]
fn test_layout_rejects_missing_input() {
    let dir = tempdir().unwrap();

    let err = InputLayout::validate(&dir.path().join("nope"), dir.path()).unwrap_err();

    assert_eq!(err.kind(), "invalid_input");
}

#[test]
fn test_layout_rejects_destination_file() {
    let dir = tempdir().unwrap();
    let input = input_dir(dir.path());
    let dest = dir.path().join("dest.txt");
    fs::write(&dest, b"not a dir").unwrap();

    let err = InputLayout::validate(&input, &dest).unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(ref m) if m.contains("Destination")));
}
