//! Integration tests for savepoint
//!
//! End-to-end scenarios against temporary directories: the full
//! init/add/commit/status/checkout lifecycle, checkout stability, and
//! protected-path survival.

use savepoint::{
    InitOutcome, Repository, SavepointError, StageOutcome, CONTROL_DIR, IGNORE_FILE,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Relative path -> content for every non-ignored file under `root`
fn tree_digest(root: &Path) -> anyhow::Result<BTreeMap<String, Vec<u8>>> {
    let mut digest = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1).into_iter().filter_entry(|e| {
        let name = e.file_name().to_string_lossy();
        name != CONTROL_DIR && name != IGNORE_FILE && name != ".git" && name != "target"
    }) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .strip_prefix(root)?
                .to_string_lossy()
                .into_owned();
            digest.insert(relative, fs::read(entry.path())?);
        }
    }
    Ok(digest)
}

#[test]
fn test_full_lifecycle_walkthrough() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::new(dir.path());

    // init empty repo -> status reports empty staged set
    assert_eq!(repo.init().unwrap(), InitOutcome::Created);
    let report = repo.status().unwrap();
    assert!(report.staged.is_empty());

    // add file.txt with content "hello" -> status lists it staged
    let file = dir.path().join("file.txt");
    fs::write(&file, "hello").unwrap();
    let outcome = repo.add(&file).unwrap();
    assert_eq!(
        outcome,
        StageOutcome::Staged {
            name: "file.txt".to_string()
        }
    );
    let report = repo.status().unwrap();
    assert_eq!(report.staged, vec!["file.txt"]);

    // commit "first" -> returns an identifier, history has one entry
    let record = repo.commit("first").unwrap();
    let history = repo.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, record.id);
    assert_eq!(history[0].message, "first");

    // commit again with no new add -> NoChanges, history unchanged
    let err = repo.commit("first again").unwrap_err();
    assert!(matches!(err, SavepointError::NoChanges));
    assert_eq!(repo.history().unwrap().len(), 1);

    // checkout of an unknown id -> SnapshotNotFound, tree unchanged
    let before = tree_digest(dir.path()).unwrap();
    let err = repo.checkout("nonexistent").unwrap_err();
    assert!(matches!(err, SavepointError::SnapshotNotFound(_)));
    assert_eq!(tree_digest(dir.path()).unwrap(), before);
}

#[test]
fn test_checkout_twice_is_stable() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::new(dir.path());
    repo.init().unwrap();

    let project = dir.path().join("project");
    fs::create_dir_all(project.join("sub")).unwrap();
    fs::write(project.join("a.txt"), "alpha").unwrap();
    fs::write(project.join("sub/b.txt"), "beta").unwrap();
    fs::write(dir.path().join("loose.txt"), "loose").unwrap();
    repo.add(&project).unwrap();
    repo.add(&dir.path().join("loose.txt")).unwrap();
    let record = repo.commit("two entries").unwrap();

    repo.checkout(&record.id).unwrap();
    let first = tree_digest(dir.path()).unwrap();
    repo.checkout(&record.id).unwrap();
    let second = tree_digest(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.get("a.txt").map(Vec::as_slice), Some(&b"alpha"[..]));
    assert_eq!(
        first.get("sub/b.txt").map(Vec::as_slice),
        Some(&b"beta"[..])
    );
}

#[test]
fn test_protected_paths_never_staged_never_deleted() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::new(dir.path());
    repo.init().unwrap();

    // A .git directory and an ignore-file entry live in the working tree.
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main").unwrap();
    fs::write(dir.path().join(IGNORE_FILE), "secrets.env\n").unwrap();
    fs::write(dir.path().join("secrets.env"), "TOKEN=abc").unwrap();

    // None of them can be staged.
    for name in [CONTROL_DIR, ".git", IGNORE_FILE, "secrets.env"] {
        let outcome = repo.add(&dir.path().join(name)).unwrap();
        assert!(
            matches!(outcome, StageOutcome::Ignored { .. }),
            "{} should be ignored",
            name
        );
    }

    // Commit something real, then checkout; protected entries survive.
    fs::write(dir.path().join("tracked.txt"), "tracked").unwrap();
    repo.add(&dir.path().join("tracked.txt")).unwrap();
    let record = repo.commit("tracked only").unwrap();
    repo.checkout(&record.id).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join(".git/HEAD")).unwrap(),
        "ref: refs/heads/main"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("secrets.env")).unwrap(),
        "TOKEN=abc"
    );
    assert!(dir.path().join(CONTROL_DIR).exists());
}

#[test]
fn test_checkout_restores_earlier_state_across_commits() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::new(dir.path());
    repo.init().unwrap();

    let file = dir.path().join("doc.txt");
    fs::write(&file, "version one").unwrap();
    repo.add(&file).unwrap();
    let first = repo.commit("v1").unwrap();

    fs::write(&file, "version two").unwrap();
    repo.add(&file).unwrap();
    let second = repo.commit("v2").unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(repo.history().unwrap().len(), 2);

    repo.checkout(&first.id).unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "version one");

    repo.checkout(&second.id).unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "version two");
}

#[test]
fn test_untracked_listing_respects_ignore_file() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::new(dir.path());
    repo.init().unwrap();

    fs::write(dir.path().join(IGNORE_FILE), "scratch\n").unwrap();
    fs::create_dir(dir.path().join("scratch")).unwrap();
    fs::write(dir.path().join("seen.txt"), "seen").unwrap();
    fs::write(dir.path().join("staged.txt"), "staged").unwrap();
    repo.add(&dir.path().join("staged.txt")).unwrap();

    let report = repo.status().unwrap();
    assert_eq!(report.staged, vec!["staged.txt"]);
    assert_eq!(report.untracked, vec!["seen.txt"]);
}

#[test]
fn test_snapshot_is_frozen_after_commit() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::new(dir.path());
    repo.init().unwrap();

    let file = dir.path().join("frozen.txt");
    fs::write(&file, "original bytes").unwrap();
    repo.add(&file).unwrap();
    let record = repo.commit("freeze").unwrap();

    // Restage different content and commit again; the first snapshot must
    // be unaffected.
    fs::write(&file, "newer bytes").unwrap();
    repo.add(&file).unwrap();
    repo.commit("second").unwrap();

    fs::remove_file(&file).unwrap();
    repo.checkout(&record.id).unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "original bytes");
}
