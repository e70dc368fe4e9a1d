//! Recursive tree comparison
//!
//! Determines whether two directory trees are byte-identical in structure
//! and content. This is the sole mechanism for detecting "no changes since
//! the last commit": there is no hash index and no timestamp shortcut, so a
//! comparison costs a full walk of the matching prefix of both trees.
//! Commits are infrequent, human-triggered events, which keeps that cost
//! acceptable.

use crate::error::Result;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

/// Read buffer size for the byte-level file comparison
const COMPARE_BUF_SIZE: usize = 8192;

/// Kind of a directory entry, as far as comparison is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

/// Determine whether two directory trees are identical
///
/// Returns `false` immediately if either path does not exist. Otherwise the
/// trees are identical only when they carry exactly the same entry names at
/// every level, every name is the same kind on both sides, and every common
/// file compares byte-equal.
pub fn trees_identical(a: &Path, b: &Path) -> Result<bool> {
    if !a.exists() || !b.exists() {
        return Ok(false);
    }

    let entries_a = entry_kinds(a)?;
    let entries_b = entry_kinds(b)?;
    if entries_a.len() != entries_b.len() {
        trace!("entry counts differ between {:?} and {:?}", a, b);
        return Ok(false);
    }

    for (name, kind_a) in &entries_a {
        let kind_b = match entries_b.get(name) {
            Some(kind) => kind,
            None => return Ok(false),
        };
        if kind_a != kind_b {
            return Ok(false);
        }
        let (child_a, child_b) = (a.join(name), b.join(name));
        let same = match kind_a {
            EntryKind::Dir => trees_identical(&child_a, &child_b)?,
            EntryKind::File => files_identical(&child_a, &child_b)?,
        };
        if !same {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Map of entry name to kind for the direct children of `dir`
fn entry_kinds(dir: &Path) -> Result<BTreeMap<OsString, EntryKind>> {
    let mut kinds = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let kind = if entry.file_type()?.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        kinds.insert(entry.file_name(), kind);
    }
    Ok(kinds)
}

/// Byte-level comparison of two files via buffered streaming reads
fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(File::open(a)?);
    let mut reader_b = BufReader::new(File::open(b)?);
    let mut buf_a = vec![0u8; COMPARE_BUF_SIZE];
    let mut buf_b = vec![0u8; COMPARE_BUF_SIZE];

    loop {
        let read_a = read_full(&mut reader_a, &mut buf_a)?;
        let read_b = read_full(&mut reader_b, &mut buf_b)?;
        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` from `reader` as far as possible; short only at EOF
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
