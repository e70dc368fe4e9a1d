//! Snapshot storage: the staging area and the immutable commit snapshots
//!
//! The snapshot store owns two directory trees inside the control
//! directory: `staging/`, the mutable candidate for the next commit, and
//! `commits/`, one frozen directory per recorded snapshot. Staging is
//! accumulative (`add` overlays entries by base name and nothing clears it
//! automatically) and committing copies it rather than consuming it, so
//! staged content persists across commits.
//!
//! Snapshot persistence goes through the [`SnapshotBackend`] trait. The
//! default [`DirCopyBackend`] stores each snapshot as a verbatim full-tree
//! copy; the trait is the seam for alternative layouts such as
//! content-addressed storage, with the full-copy behavior as the reference
//! semantics.

use crate::compare::trees_identical;
use crate::error::{Result, SavepointError};
use crate::ignore::IgnoreSet;
use crate::types::{RestoreReport, StageOutcome};
use crate::util;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Name of the staging directory inside the control directory
pub const STAGING_DIR: &str = "staging";

/// Name of the commits directory inside the control directory
pub const COMMITS_DIR: &str = "commits";

/// Length of a snapshot identifier
const ID_LEN: usize = 8;

/// Storage backend for commit snapshots
///
/// Implementations must keep a snapshot immutable once [`store`] returns;
/// later staging or working-directory changes never affect it.
///
/// [`store`]: SnapshotBackend::store
pub trait SnapshotBackend {
    /// Persist the staging tree as the snapshot `id`
    fn store(&self, staging: &Path, id: &str) -> Result<()>;

    /// Materialize the snapshot `id` into `dest`
    fn retrieve(&self, id: &str, dest: &Path) -> Result<()>;

    /// Whether the staging tree is identical to the stored snapshot `id`
    fn compare(&self, staging: &Path, id: &str) -> Result<bool>;

    /// Whether a snapshot exists for `id`
    fn contains(&self, id: &str) -> bool;
}

/// Reference backend: one directory per snapshot, verbatim full-tree copies
#[derive(Debug, Clone)]
pub struct DirCopyBackend {
    commits: PathBuf,
}

impl DirCopyBackend {
    /// Create a backend storing snapshots under `commits`
    pub fn new(commits: PathBuf) -> Self {
        Self { commits }
    }

    fn snapshot_path(&self, id: &str) -> PathBuf {
        self.commits.join(id)
    }
}

impl SnapshotBackend for DirCopyBackend {
    fn store(&self, staging: &Path, id: &str) -> Result<()> {
        util::copy_dir_recursive(staging, &self.snapshot_path(id))
    }

    fn retrieve(&self, id: &str, dest: &Path) -> Result<()> {
        if !self.contains(id) {
            return Err(SavepointError::SnapshotNotFound(id.to_string()));
        }
        util::copy_dir_recursive(&self.snapshot_path(id), dest)
    }

    fn compare(&self, staging: &Path, id: &str) -> Result<bool> {
        trees_identical(staging, &self.snapshot_path(id))
    }

    fn contains(&self, id: &str) -> bool {
        self.snapshot_path(id).is_dir()
    }
}

/// Owns the staging area and the snapshot collection
#[derive(Debug)]
pub struct SnapshotStore<B: SnapshotBackend = DirCopyBackend> {
    control_dir: PathBuf,
    staging: PathBuf,
    commits: PathBuf,
    backend: B,
}

impl SnapshotStore<DirCopyBackend> {
    /// Create a store rooted at `control_dir` with the full-copy backend
    pub fn new(control_dir: &Path) -> Self {
        let commits = control_dir.join(COMMITS_DIR);
        Self::with_backend(control_dir, DirCopyBackend::new(commits))
    }
}

impl<B: SnapshotBackend> SnapshotStore<B> {
    /// Create a store rooted at `control_dir` with a custom backend
    pub fn with_backend(control_dir: &Path, backend: B) -> Self {
        Self {
            control_dir: control_dir.to_path_buf(),
            staging: control_dir.join(STAGING_DIR),
            commits: control_dir.join(COMMITS_DIR),
            backend,
        }
    }

    /// Path of the staging directory
    pub fn staging_path(&self) -> &Path {
        &self.staging
    }

    /// Create the staging and commits directories
    ///
    /// # Errors
    ///
    /// [`SavepointError::AlreadyInitialized`] if the layout already exists;
    /// callers treat this as informational, matching idempotent `init`.
    pub fn initialize_layout(&self) -> Result<()> {
        if self.staging.exists() && self.commits.exists() {
            return Err(SavepointError::AlreadyInitialized);
        }
        fs::create_dir_all(&self.staging)?;
        fs::create_dir_all(&self.commits)?;
        info!("created snapshot layout under {:?}", self.control_dir);
        Ok(())
    }

    /// Copy `path` into the staging area under its base name
    ///
    /// Ignored and missing paths are reported as such, not errors. An
    /// existing staged entry of the same name is overwritten: files in
    /// place, directories by remove-then-copy.
    pub fn stage(&self, path: &Path, ignore: &IgnoreSet) -> Result<StageOutcome> {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => return Ok(StageOutcome::Missing {
                path: path.to_path_buf(),
            }),
        };
        if ignore.contains(&name) {
            debug!("refusing to stage ignored path {:?}", path);
            return Ok(StageOutcome::Ignored { name });
        }
        if !path.exists() {
            return Ok(StageOutcome::Missing {
                path: path.to_path_buf(),
            });
        }

        let dest = self.staging.join(&name);
        if path.is_dir() {
            if dest.exists() {
                util::remove_entry(&dest)?;
            }
            util::copy_dir_recursive(path, &dest)?;
        } else {
            util::copy_file(path, &dest)?;
        }
        debug!("staged {:?} as {:?}", path, name);
        Ok(StageOutcome::Staged { name })
    }

    /// Sorted base names of the entries currently staged
    pub fn staged_names(&self) -> Result<Vec<String>> {
        util::entry_names(&self.staging)
    }

    /// Create an immutable snapshot from the current staging area
    ///
    /// The staging area is copied, not consumed: it is left byte-for-byte
    /// unchanged by this call.
    ///
    /// # Errors
    ///
    /// - [`SavepointError::EmptyStaging`] when nothing is staged
    /// - [`SavepointError::NoChanges`] when `last_commit` is given and the
    ///   staging area is identical to that snapshot's tree
    pub fn create_snapshot(&self, last_commit: Option<&str>) -> Result<String> {
        if util::dir_is_empty(&self.staging)? {
            return Err(SavepointError::EmptyStaging);
        }
        if let Some(last) = last_commit {
            if self.backend.compare(&self.staging, last)? {
                debug!("staging identical to snapshot {}, not committing", last);
                return Err(SavepointError::NoChanges);
            }
        }

        let id = self.fresh_id();
        self.backend.store(&self.staging, &id)?;
        info!("created snapshot {}", id);
        Ok(id)
    }

    /// Replace the working directory contents at `root` with snapshot `id`
    ///
    /// Every non-ignored entry under `root` is deleted (per-entry failures
    /// are warned and collected, never fatal), then the snapshot's entries
    /// are materialized in a scratch directory inside the control directory
    /// and moved into place by rename, with a copy fallback where rename is
    /// unavailable. The rename narrows the partial-state window but
    /// checkout remains non-atomic overall: a failure partway through can
    /// leave the working directory mixed between old and new content.
    pub fn restore(&self, id: &str, root: &Path, ignore: &IgnoreSet) -> Result<RestoreReport> {
        if !self.backend.contains(id) {
            return Err(SavepointError::SnapshotNotFound(id.to_string()));
        }

        let mut report = RestoreReport {
            id: id.to_string(),
            ..Default::default()
        };

        // Materialize before touching the working tree; a retrieval failure
        // aborts here with the working directory intact.
        let scratch = tempfile::Builder::new()
            .prefix("restore-")
            .tempdir_in(&self.control_dir)?;
        self.backend.retrieve(id, scratch.path())?;

        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if ignore.contains(&name) {
                trace!("leaving ignored entry {:?} in place", name);
                continue;
            }
            match util::remove_entry(&entry.path()) {
                Ok(()) => report.entries_removed += 1,
                Err(e) => {
                    warn!("could not delete {:?}: {}", entry.path(), e);
                    report
                        .warnings
                        .push(format!("could not delete {:?}: {}", entry.path(), e));
                }
            }
        }

        for entry in fs::read_dir(scratch.path())? {
            let entry = entry?;
            let target = root.join(entry.file_name());
            if let Err(rename_err) = fs::rename(entry.path(), &target) {
                trace!(
                    "rename into {:?} failed ({}), copying instead",
                    target,
                    rename_err
                );
                if entry.file_type()?.is_dir() {
                    util::copy_dir_recursive(&entry.path(), &target)?;
                } else {
                    util::copy_file(&entry.path(), &target)?;
                }
            }
            report.entries_restored += 1;
        }

        info!(
            "restored snapshot {} ({} entries in, {} entries removed)",
            id, report.entries_restored, report.entries_removed
        );
        Ok(report)
    }

    /// Generate an identifier not yet present in the snapshot collection
    ///
    /// Collisions on an 8-character token are improbable but possible, so
    /// the token is checked against existing snapshots and regenerated on a
    /// hit.
    fn fresh_id(&self) -> String {
        loop {
            let token = Uuid::new_v4().simple().to_string();
            let id = token[..ID_LEN].to_string();
            if !self.backend.contains(&id) {
                return id;
            }
            trace!("snapshot id collision on {}, regenerating", id);
        }
    }
}
