//! Common types and data structures for savepoint
//!
//! The serde types here define the on-disk metadata format; the report types
//! are what repository operations hand back to callers (and the CLI renders).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single entry in the commit history log
///
/// One record exists per commit snapshot, keyed by the same identifier.
/// `timestamp` is a human-readable local-time string and is treated as
/// opaque by everything that reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Snapshot identifier (8-character token)
    pub id: String,
    /// Commit message supplied by the user
    pub message: String,
    /// Local time of the commit, formatted for humans
    pub timestamp: String,
}

/// Persisted repository metadata
///
/// Read and rewritten wholesale on every commit. `last_commit` is `None`
/// exactly when `history` is empty; otherwise it names the most recently
/// appended record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Identifier of the most recent commit, if any
    pub last_commit: Option<String>,
    /// All commits in insertion order, oldest first
    pub history: Vec<HistoryRecord>,
}

impl Metadata {
    /// Append a commit record and advance the last-commit pointer
    pub fn record_commit(&mut self, record: HistoryRecord) {
        self.last_commit = Some(record.id.clone());
        self.history.push(record);
    }
}

/// Outcome of initializing a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// A fresh layout and metadata file were created
    Created,
    /// The repository already existed; nothing was changed
    Existing,
}

/// Outcome of staging a path
///
/// `Ignored` and `Missing` are reported, not errors: the staging area is
/// left untouched in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The path was copied into the staging area under this base name
    Staged {
        /// Base name the entry was staged under
        name: String,
    },
    /// The path's base name is in the ignore set
    Ignored {
        /// The ignored base name
        name: String,
    },
    /// The path does not exist
    Missing {
        /// The path that was not found
        path: PathBuf,
    },
}

/// Result of a status query
///
/// The staged/untracked split is by entry name only; see
/// [`Repository::status`](crate::Repository::status).
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    /// Base names of entries in the staging area, sorted
    pub staged: Vec<String>,
    /// Non-ignored working-directory entries whose names are not staged
    pub untracked: Vec<String>,
}

/// Result of restoring a snapshot into the working directory
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    /// Identifier of the restored snapshot
    pub id: String,
    /// Working-directory entries deleted by the sweep
    pub entries_removed: usize,
    /// Snapshot entries placed into the working directory
    pub entries_restored: usize,
    /// Per-entry deletion failures that did not abort the restore
    pub warnings: Vec<String>,
}
