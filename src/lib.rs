//! # Savepoint - Minimal snapshot-based version control
//!
//! Savepoint stages a working directory's files, records immutable
//! full-tree snapshots ("commits") keyed by an 8-character identifier,
//! maintains a linear history log, and can restore the working directory to
//! any prior snapshot.
//!
//! ## Overview
//!
//! The design center is the snapshot store and staging lifecycle:
//!
//! - `add` copies entries into a mutable **staging area** inside the
//!   control directory, overlaying by base name and never clearing
//!   automatically
//! - `commit` copies (not moves) the staging area into an immutable
//!   snapshot under a fresh identifier and appends a history record;
//!   duplicate commits are detected by a recursive byte-level tree
//!   comparison against the last snapshot, not by content hashing
//! - `checkout` destructively replaces the working directory with a
//!   snapshot's content, sparing only the ignored names
//!
//! There is no branching, merging, per-file diffing, or partial checkout:
//! every commit and checkout operates on the whole tree.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use savepoint::Repository;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Repository::new("./my_project");
//! repo.init()?;
//!
//! repo.add(Path::new("./my_project/notes.txt"))?;
//! let record = repo.commit("Initial state")?;
//! println!("Created commit: {}", record.id);
//!
//! // Later: bring the whole tree back.
//! repo.checkout(&record.id)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## On-disk layout
//!
//! ```text
//! <root>/
//! ├── .savepoint/
//! │   ├── staging/          # mutable working tree for the next commit
//! │   ├── commits/<id>/     # one immutable directory per commit
//! │   └── metadata.json     # {last_commit, history: [{id, message, timestamp}]}
//! └── .savepointignore      # optional; one entry name per non-blank line
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, SavepointError>`](SavepointError).
//! The informational outcomes (nothing staged, no changes since the last
//! commit, repository already initialized) are error variants too, so a
//! caller can distinguish them from hard failures with
//! [`SavepointError::is_informational`].
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous. The control directory is shared
//! mutable filesystem state with no locking discipline; concurrent
//! invocations against the same repository are unsupported.
//!
//! ## Module Organization
//!
//! - [`repository`]: the orchestrating [`Repository`] type
//! - [`snapshot`]: staging lifecycle and snapshot storage, including the
//!   [`SnapshotBackend`] extension seam
//! - [`compare`]: recursive byte-level tree comparison
//! - [`metadata`]: persistence of the last-commit pointer and history log
//! - [`ignore`]: protected and user-supplied ignore names
//! - [`types`]: shared data types and operation reports
//! - [`error`]: error types and handling

// Public API modules
pub mod compare;
pub mod error;
pub mod ignore;
pub mod metadata;
pub mod repository;
pub mod snapshot;
pub mod types;

// Internal modules (not part of public API)
mod util;

// Re-export main types for convenience
pub use compare::trees_identical;
pub use error::{Result, SavepointError};
pub use ignore::{IgnoreSet, CONTROL_DIR, IGNORE_FILE};
pub use metadata::MetadataStore;
pub use repository::Repository;
pub use snapshot::{DirCopyBackend, SnapshotBackend, SnapshotStore};
pub use types::*;
