//! Filesystem helpers shared by the snapshot store and repository
//!
//! Copy helpers preserve content and permission bits, which is what the
//! tree comparator later relies on. All functions are synchronous and
//! release their handles on every path.

use crate::error::{Result, SavepointError};
use std::fs;
use std::path::Path;
use tracing::trace;

/// Copy a single file, preserving its permission bits
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    trace!("copying file {:?} -> {:?}", src, dest);
    fs::copy(src, dest).map_err(|e| SavepointError::copy(src, e))?;
    Ok(())
}

/// Recursively copy the directory tree at `src` into `dest`
///
/// `dest` is created if missing; existing files under it are overwritten.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    trace!("copying tree {:?} -> {:?}", src, dest);
    fs::create_dir_all(dest).map_err(|e| SavepointError::copy(dest, e))?;
    for entry in fs::read_dir(src).map_err(|e| SavepointError::copy(src, e))? {
        let entry = entry.map_err(|e| SavepointError::copy(src, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| SavepointError::copy(entry.path(), e))?;
        let target = dest.join(entry.file_name());
        if file_type.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            copy_file(&entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Remove a working-tree entry, whether it is a file or a directory
pub fn remove_entry(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SavepointError::remove(path, e))?;
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| SavepointError::remove(path, e))
}

/// Sorted base names of the entries directly under `dir`
pub fn entry_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Whether `dir` holds no entries at all
pub fn dir_is_empty(dir: &Path) -> Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}
