//! Ignore-set resolution
//!
//! The ignore set is the union of a fixed protected-name set and the
//! trimmed, non-blank lines of an optional user ignore file at the
//! working-directory root. It is recomputed per operation and never
//! persisted. Names in the set are excluded from staging, from the status
//! comparison, and from the checkout deletion sweep; in particular the
//! control directory can never be staged into itself or deleted by a
//! restore.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the control directory at the working-directory root
pub const CONTROL_DIR: &str = ".savepoint";

/// Name of the optional user ignore file at the working-directory root
pub const IGNORE_FILE: &str = ".savepointignore";

/// Entry names that are always ignored, regardless of the ignore file.
///
/// Besides the tool's own on-disk state, this shields the version-control
/// and build artifacts a working tree cannot afford to lose to a checkout.
const PROTECTED_NAMES: &[&str] = &[CONTROL_DIR, IGNORE_FILE, ".git", "target"];

/// The set of entry names excluded from staging, status and checkout
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// Resolve the ignore set for the working directory at `root`
    ///
    /// A missing ignore file is not an error; the fixed protected names are
    /// always present.
    pub fn resolve(root: &Path) -> Self {
        let mut names: HashSet<String> =
            PROTECTED_NAMES.iter().map(|name| name.to_string()).collect();

        if let Ok(contents) = fs::read_to_string(root.join(IGNORE_FILE)) {
            for line in contents.lines() {
                let line = line.trim();
                if !line.is_empty() {
                    names.insert(line.to_string());
                }
            }
        }

        debug!("resolved ignore set with {} names", names.len());
        Self { names }
    }

    /// Whether `name` is excluded
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of names in the set
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set is empty (never true in practice; the protected
    /// names are always present)
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
