//! Property-based tests for savepoint
//!
//! Uses proptest to verify the tree-comparator invariants and the
//! commit/checkout round-trip across randomly generated directory trees.

use proptest::prelude::*;
use savepoint::{trees_identical, Repository};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A generated tree: relative file path -> content
type TreeSpec = BTreeMap<String, Vec<u8>>;

/// Generate relative file paths whose directory components never collide
/// with file names (files always carry an extension, directories never do)
fn path_strategy() -> impl Strategy<Value = String> {
    let dirs = prop::collection::vec("[a-z]{1,6}", 0..=2);
    let file = "[a-z]{1,6}\\.(txt|rs|md)";
    (dirs, file).prop_map(|(dirs, file)| {
        let mut parts = dirs;
        parts.push(file);
        parts.join("/")
    })
}

fn content_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

fn tree_strategy() -> impl Strategy<Value = TreeSpec> {
    prop::collection::btree_map(path_strategy(), content_strategy(), 1..8)
}

/// Write a generated tree under `root`
fn materialize(root: &Path, tree: &TreeSpec) {
    for (path, content) in tree {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Two materializations of the same tree are always identical, and a
    /// tree is identical to itself.
    #[test]
    fn prop_equal_trees_compare_identical(tree in tree_strategy()) {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        materialize(left.path(), &tree);
        materialize(right.path(), &tree);

        prop_assert!(trees_identical(left.path(), left.path()).unwrap());
        prop_assert!(trees_identical(left.path(), right.path()).unwrap());
    }

    /// Any single-file content mutation breaks identity.
    #[test]
    fn prop_byte_mutation_breaks_identity(tree in tree_strategy()) {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        materialize(left.path(), &tree);
        materialize(right.path(), &tree);

        // Append a byte to the first file on the right side.
        let victim = tree.keys().next().unwrap();
        let mut content = tree[victim].clone();
        content.push(0xFF);
        fs::write(right.path().join(victim), &content).unwrap();

        prop_assert!(!trees_identical(left.path(), right.path()).unwrap());
    }

    /// Removing any file breaks identity.
    #[test]
    fn prop_missing_file_breaks_identity(tree in tree_strategy()) {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        materialize(left.path(), &tree);
        materialize(right.path(), &tree);

        let victim = tree.keys().next().unwrap();
        fs::remove_file(right.path().join(victim)).unwrap();

        prop_assert!(!trees_identical(left.path(), right.path()).unwrap());
    }

    /// add + commit + checkout restores the staged bytes even after the
    /// working copy is destroyed.
    #[test]
    fn prop_commit_checkout_round_trip(tree in tree_strategy()) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::new(dir.path());
        repo.init().unwrap();

        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        materialize(&data, &tree);

        repo.add(&data).unwrap();
        let record = repo.commit("generated tree").unwrap();

        fs::remove_dir_all(&data).unwrap();
        repo.checkout(&record.id).unwrap();

        for (path, content) in &tree {
            let restored = fs::read(data.join(path)).unwrap();
            prop_assert_eq!(&restored, content);
        }
    }
}
