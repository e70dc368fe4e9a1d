//! Repository orchestration
//!
//! `Repository` composes the ignore resolver, snapshot store and metadata
//! store into the five user-facing operations: `init`, `add`, `commit`,
//! `status` and `checkout`. A repository handle is constructed explicitly
//! from a working-directory root rather than held as ambient process state,
//! so tests run against temporary directories instead of the real
//! filesystem.
//!
//! All operations are synchronous and run to completion; concurrent
//! invocations against the same repository are unsupported (there is no
//! locking discipline over the control directory).
//!
//! ## Example
//!
//! ```rust,no_run
//! use savepoint::Repository;
//!
//! # fn main() -> savepoint::Result<()> {
//! let repo = Repository::new(".");
//! repo.init()?;
//! repo.add(std::path::Path::new("notes.txt"))?;
//! let record = repo.commit("first commit")?;
//! println!("created commit {}", record.id);
//! repo.checkout(&record.id)?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SavepointError};
use crate::ignore::{IgnoreSet, CONTROL_DIR};
use crate::metadata::MetadataStore;
use crate::snapshot::SnapshotStore;
use crate::types::{
    HistoryRecord, InitOutcome, Metadata, RestoreReport, StageOutcome, StatusReport,
};
use crate::util;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Format of the human-readable history timestamp
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Main entry point for repository operations
pub struct Repository {
    /// Working-directory root being versioned
    root: PathBuf,
    /// Control directory holding staging, commits and metadata
    control_dir: PathBuf,
    /// Snapshot storage
    snapshots: SnapshotStore,
    /// Metadata persistence
    metadata: MetadataStore,
}

impl Repository {
    /// Create a repository handle rooted at `root`
    ///
    /// No filesystem state is touched until an operation runs; the handle
    /// is valid for both initialized and uninitialized directories.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let control_dir = root.join(CONTROL_DIR);
        Self {
            snapshots: SnapshotStore::new(&control_dir),
            metadata: MetadataStore::new(&control_dir),
            control_dir,
            root,
        }
    }

    /// Working-directory root this repository operates on
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the control directory exists
    pub fn is_initialized(&self) -> bool {
        self.control_dir.exists()
    }

    /// Initialize the repository layout and fresh metadata
    ///
    /// Idempotent: an already-initialized repository is reported as
    /// [`InitOutcome::Existing`] and left untouched.
    #[instrument(skip(self), fields(root = ?self.root))]
    pub fn init(&self) -> Result<InitOutcome> {
        if self.is_initialized() {
            debug!("repository already initialized");
            return Ok(InitOutcome::Existing);
        }
        self.snapshots.initialize_layout()?;
        self.metadata.save(&Metadata::default())?;
        info!("initialized empty repository at {:?}", self.root);
        Ok(InitOutcome::Created)
    }

    /// Stage a file or directory for the next commit
    ///
    /// The entry lands in the staging area under its base name, replacing
    /// any previously staged entry of that name. Ignored and missing paths
    /// are reported in the returned [`StageOutcome`], not treated as
    /// errors.
    #[instrument(skip(self))]
    pub fn add(&self, path: &Path) -> Result<StageOutcome> {
        self.ensure_initialized()?;
        let ignore = IgnoreSet::resolve(&self.root);
        self.snapshots.stage(path, &ignore)
    }

    /// Record the current staging area as a new immutable commit
    ///
    /// On success the history gains one record, the last-commit pointer
    /// advances, and the updated metadata is persisted atomically. The
    /// informational outcomes ([`SavepointError::EmptyStaging`],
    /// [`SavepointError::NoChanges`]) leave the metadata unchanged.
    #[instrument(skip(self))]
    pub fn commit(&self, message: &str) -> Result<HistoryRecord> {
        let mut metadata = self.metadata.load()?;
        let id = self
            .snapshots
            .create_snapshot(metadata.last_commit.as_deref())?;
        let record = HistoryRecord {
            id,
            message: message.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        metadata.record_commit(record.clone());
        self.metadata.save(&metadata)?;
        info!("commit {} recorded", record.id);
        Ok(record)
    }

    /// Report staged entry names and untracked working-directory entries
    ///
    /// The staged/untracked split compares entry *names* only, never
    /// content: a file that was staged and then modified in the working
    /// directory is not reported as changed. That blind spot is historic
    /// behavior, preserved deliberately.
    pub fn status(&self) -> Result<StatusReport> {
        self.ensure_initialized()?;
        let ignore = IgnoreSet::resolve(&self.root);
        let staged = self.snapshots.staged_names()?;
        let untracked = util::entry_names(&self.root)?
            .into_iter()
            .filter(|name| !ignore.contains(name) && !staged.contains(name))
            .collect();
        Ok(StatusReport { staged, untracked })
    }

    /// Restore the working directory to a prior commit
    ///
    /// Destructive: every non-ignored entry at the root is replaced by the
    /// snapshot's content. Not atomic; see
    /// [`SnapshotStore::restore`](crate::snapshot::SnapshotStore::restore).
    #[instrument(skip(self))]
    pub fn checkout(&self, id: &str) -> Result<RestoreReport> {
        self.ensure_initialized()?;
        let ignore = IgnoreSet::resolve(&self.root);
        self.snapshots.restore(id, &self.root, &ignore)
    }

    /// Ordered commit history, oldest first
    pub fn history(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self.metadata.load()?.history)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(SavepointError::NotInitialized);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("control_dir", &self.control_dir)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
