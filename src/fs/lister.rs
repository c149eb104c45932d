//! Directory enumeration with per-entry metadata.
//!
//! Names are read from the directory stream on the calling thread. For very
//! large directories the metadata pass (stat per entry) is spread over a
//! small set of scoped threads, each filling its own chunk of a pre-sized
//! result vector, and all of them are joined before the listing is sorted.

use std::fs;
use std::path::Path;
use std::thread;

use tracing::debug;

use crate::error::{IoResultExt, Result};
use crate::fs::operations::SizeSummary;
use crate::fs::path::DirPath;

/// Name of the synthetic parent entry.
pub const PARENT_MARKER: &str = "..";
/// Name shown for the placeholder of an empty listing.
pub const PLACEHOLDER_NAME: &str = "(empty)";

/// Default entry count above which metadata is resolved in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 2_000;
/// Default number of metadata workers.
pub const DEFAULT_WORKERS: usize = 4;

/// Type of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One immediate child of a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    /// File size in bytes; for directories the recursive size once known.
    pub size_bytes: u64,
    pub is_parent_marker: bool,
    pub is_placeholder: bool,
    /// Cached recursive size of a directory.
    pub summary: Option<SizeSummary>,
}

impl Entry {
    pub fn file(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size_bytes,
            is_parent_marker: false,
            is_placeholder: false,
            summary: None,
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size_bytes: 0,
            is_parent_marker: false,
            is_placeholder: false,
            summary: None,
        }
    }

    pub fn parent_marker() -> Self {
        Self {
            is_parent_marker: true,
            ..Self::directory(PARENT_MARKER)
        }
    }

    pub fn placeholder() -> Self {
        Self {
            is_placeholder: true,
            ..Self::file(PLACEHOLDER_NAME, 0)
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// A real filesystem entry (neither `..` nor the placeholder).
    pub fn is_real(&self) -> bool {
        !self.is_parent_marker && !self.is_placeholder
    }
}

/// Tuning for the metadata pass.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions {
    pub parallel_threshold: usize,
    pub workers: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// List the immediate children of `dir`, sorted by name, `..` first.
pub fn list(dir: &DirPath, opts: &ListOptions) -> Result<Vec<Entry>> {
    let names = read_names(dir.as_path())?;

    let mut entries = if opts.workers > 1 && names.len() > opts.parallel_threshold {
        debug!(
            dir = %dir,
            count = names.len(),
            workers = opts.workers,
            "resolving metadata in parallel"
        );
        stat_parallel(dir.as_path(), &names, opts.workers)
    } else {
        names.iter().map(|n| stat_entry(dir.as_path(), n)).collect()
    };

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries.dedup_by(|a, b| a.name == b.name);

    if !dir.is_root() {
        entries.insert(0, Entry::parent_marker());
    }
    Ok(entries)
}

/// Single-threaded read of the directory stream.
fn read_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).at_path(dir)? {
        let entry = entry.at_path(dir)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != "." && name != PARENT_MARKER {
            names.push(name);
        }
    }
    Ok(names)
}

/// Resolve kind and size for one child. Symlinks follow to their target;
/// broken links and vanished entries become empty files.
fn stat_entry(dir: &Path, name: &str) -> Entry {
    match fs::metadata(dir.join(name)) {
        Ok(meta) if meta.is_dir() => Entry::directory(name),
        Ok(meta) => Entry::file(name, meta.len()),
        Err(_) => Entry::file(name, 0),
    }
}

fn stat_parallel(dir: &Path, names: &[String], workers: usize) -> Vec<Entry> {
    let mut slots: Vec<Option<Entry>> = vec![None; names.len()];
    let chunk = names.len().div_ceil(workers).max(1);

    thread::scope(|scope| {
        for (name_chunk, slot_chunk) in names.chunks(chunk).zip(slots.chunks_mut(chunk)) {
            scope.spawn(move || {
                for (name, slot) in name_chunk.iter().zip(slot_chunk.iter_mut()) {
                    *slot = Some(stat_entry(dir, name));
                }
            });
        }
    });

    slots
        .into_iter()
        .zip(names)
        .map(|(slot, name)| slot.unwrap_or_else(|| Entry::file(name.as_str(), 0)))
        .collect()
}
