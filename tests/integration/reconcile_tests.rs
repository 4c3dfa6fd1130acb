use dupemerge::duplicates::{DuplicateFinder, SizeIndex};
use dupemerge::reconcile::{Classification, Reconciler};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Trees {
    _root: TempDir,
    unclassified: PathBuf,
    destination: PathBuf,
}

impl Trees {
    fn new() -> Self {
        let root = tempdir().unwrap();
        let unclassified = root.path().join("unclassified");
        let destination = root.path().join("destination");
        fs::create_dir_all(&unclassified).unwrap();
        fs::create_dir_all(&destination).unwrap();
        Self {
            _root: root,
            unclassified,
            destination,
        }
    }

    fn unclassified_file(&self, name: &str, content: &[u8]) -> PathBuf {
        write(&self.unclassified.join(name), content)
    }

    fn destination_file(&self, name: &str, content: &[u8]) -> PathBuf {
        write(&self.destination.join(name), content)
    }

    fn scan(&self) -> (SizeIndex, SizeIndex) {
        let finder = DuplicateFinder::with_defaults();
        let (u, _) = finder.find_duplicates(&self.unclassified).unwrap();
        let (d, _) = finder.find_duplicates(&self.destination).unwrap();
        (u, d)
    }
}

fn write(path: &Path, content: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
    path.to_path_buf()
}

#[test]
fn test_size_absent_from_destination_is_unique() {
    let trees = Trees::new();
    let file = trees.unclassified_file("new.jpg", &[1u8; 700]);
    trees.destination_file("other.jpg", &[1u8; 800]);

    let (u, d) = trees.scan();
    let report = Reconciler::with_defaults().reconcile(&u, &d).unwrap();

    assert_eq!(
        report.classification_of(&file),
        Some(Classification::Unique {
            size_collision: false
        })
    );
    assert_eq!(report.stats().comparisons, 0);
}

#[test]
fn test_identical_content_is_duplicate() {
    let trees = Trees::new();
    let file = trees.unclassified_file("old.jpg", &[2u8; 700]);
    let existing = trees.destination_file("2019/old.jpg", &[2u8; 700]);

    let (u, d) = trees.scan();
    let report = Reconciler::with_defaults().reconcile(&u, &d).unwrap();

    assert!(report.classification_of(&file).unwrap().is_duplicate());
    let pairs: Vec<_> = report.duplicate_pairs().collect();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].1.representative().path, existing);
}

#[test]
fn test_same_size_different_content_is_unique() {
    let trees = Trees::new();
    let file = trees.unclassified_file("shot.png", &[3u8; 700]);
    trees.destination_file("shot.png", &[4u8; 700]);

    let (u, d) = trees.scan();
    let report = Reconciler::with_defaults().reconcile(&u, &d).unwrap();

    assert_eq!(
        report.classification_of(&file),
        Some(Classification::Unique {
            size_collision: true
        })
    );
    assert_eq!(report.stats().size_collisions, 1);
    assert_eq!(report.stats().comparisons, 1);
}

#[test]
fn test_difference_in_last_chunk_is_detected() {
    let trees = Trees::new();
    let mut a = vec![5u8; 4096 + 17];
    let b = a.clone();
    *a.last_mut().unwrap() = 6;
    let file = trees.unclassified_file("a.bin", &a);
    trees.destination_file("b.bin", &b);

    let (u, d) = trees.scan();
    let report = Reconciler::with_defaults().reconcile(&u, &d).unwrap();

    assert!(report.classification_of(&file).unwrap().is_unique());
}

#[test]
fn test_unclassified_duplicates_share_one_classification() {
    let trees = Trees::new();
    let first = trees.unclassified_file("a/pic.jpg", &[7u8; 900]);
    let second = trees.unclassified_file("b/pic.jpg", &[7u8; 900]);
    trees.destination_file("pic.jpg", &[7u8; 900]);

    let (u, d) = trees.scan();
    let report = Reconciler::with_defaults().reconcile(&u, &d).unwrap();

    let (unique, duplicate) = report.classified_paths();
    assert!(unique.is_empty());
    assert!(duplicate.contains(&first));
    assert!(duplicate.contains(&second));
    assert_eq!(report.stats().duplicate_files, 2);
    assert_eq!(report.stats().duplicate_groups, 1);
}

#[test]
fn test_matches_second_destination_group_of_same_size() {
    let trees = Trees::new();
    let file = trees.unclassified_file("doc.pdf", &[9u8; 1500]);
    trees.destination_file("a.pdf", &[8u8; 1500]);
    trees.destination_file("b.pdf", &[9u8; 1500]);

    let (u, d) = trees.scan();
    let report = Reconciler::with_defaults().reconcile(&u, &d).unwrap();

    assert!(report.classification_of(&file).unwrap().is_duplicate());
    assert_eq!(d.bucket(1500).len(), 2);
}

#[test]
fn test_classification_independent_of_creation_order() {
    let contents: Vec<(String, Vec<u8>)> = (0..6u8)
        .map(|i| (format!("f{i}.bin"), vec![i % 3; 600 + usize::from(i % 2) * 100]))
        .collect();
    let destination: Vec<(String, Vec<u8>)> = vec![
        ("d0.bin".into(), vec![0u8; 600]),
        ("d1.bin".into(), vec![2u8; 700]),
        ("d2.bin".into(), vec![9u8; 600]),
    ];

    let classify = |order: &[usize]| {
        let trees = Trees::new();
        for &i in order {
            let (name, content) = &contents[i];
            trees.unclassified_file(name, content);
        }
        for &i in order.iter().rev().filter(|&&i| i < destination.len()) {
            let (name, content) = &destination[i];
            trees.destination_file(name, content);
        }
        let (u, d) = trees.scan();
        let report = Reconciler::with_defaults().reconcile(&u, &d).unwrap();
        let (unique, duplicate) = report.classified_paths();
        let names = |set: std::collections::BTreeSet<PathBuf>| {
            set.into_iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
        };
        (names(unique), names(duplicate))
    };

    let forward = classify(&[0, 1, 2, 3, 4, 5]);
    let backward = classify(&[5, 4, 3, 2, 1, 0]);
    let shuffled = classify(&[3, 0, 5, 1, 4, 2]);

    assert_eq!(forward, backward);
    assert_eq!(forward, shuffled);
    // f0 is 600 zero bytes (d0), f5 is 700 bytes of value 2 (d1)
    assert_eq!(forward.1, vec!["f0.bin", "f5.bin"]);
    assert_eq!(forward.0.len(), 4);
}
