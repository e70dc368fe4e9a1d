//! Persistence of the last-commit pointer and history log
//!
//! Metadata is a single JSON document inside the control directory, read
//! and rewritten wholesale on every commit. Writes go through a temporary
//! file in the same directory followed by a rename, so a reader never
//! observes a half-written log.

use crate::error::{Result, SavepointError};
use crate::types::Metadata;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// Name of the metadata file inside the control directory
pub const METADATA_FILE: &str = "metadata.json";

/// Reads and rewrites the persisted repository metadata
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    /// Create a store for the metadata file inside `control_dir`
    pub fn new(control_dir: &Path) -> Self {
        Self {
            path: control_dir.join(METADATA_FILE),
        }
    }

    /// Whether a metadata file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the persisted metadata
    ///
    /// # Errors
    ///
    /// - [`SavepointError::NotInitialized`] if no metadata file exists
    /// - [`SavepointError::CorruptMetadata`] if the file cannot be parsed
    pub fn load(&self) -> Result<Metadata> {
        if !self.path.exists() {
            return Err(SavepointError::NotInitialized);
        }
        let contents = fs::read_to_string(&self.path)?;
        let metadata =
            serde_json::from_str(&contents).map_err(SavepointError::CorruptMetadata)?;
        trace!("loaded metadata from {:?}", self.path);
        Ok(metadata)
    }

    /// Persist `metadata`, replacing the previous contents wholesale
    pub fn save(&self, metadata: &Metadata) -> Result<()> {
        let json = serde_json::to_string_pretty(metadata)?;
        let dir = self.path.parent().unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| SavepointError::Io(e.error))?;
        debug!(
            "saved metadata ({} history records) to {:?}",
            metadata.history.len(),
            self.path
        );
        Ok(())
    }
}
