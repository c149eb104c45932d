//! The directory listing model: current path, sorted entries, selection and
//! scroll window.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::fs::lister::{self, Entry, ListOptions};
use crate::fs::operations::SizeSummary;
use crate::fs::path::DirPath;

/// Viewport height used until the renderer reports the real one.
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Outcome of entering the selected entry.
#[derive(Debug)]
pub enum Enter {
    /// Navigation produced a freshly loaded listing.
    Directory(DirectoryState),
    /// The selection is a file; open it in the viewer.
    File(PathBuf),
    /// Nothing to enter (placeholder).
    Stay,
}

/// State for the directory listing.
#[derive(Debug, Clone)]
pub struct DirectoryState {
    cwd: DirPath,
    entries: Vec<Entry>,
    selected: usize,
    scroll_top: usize,
    viewport_height: usize,
    options: ListOptions,
}

impl DirectoryState {
    /// List `cwd` with selection and scroll reset to the top.
    pub fn load(cwd: DirPath, options: ListOptions) -> Result<Self> {
        let mut entries = lister::list(&cwd, &options)?;
        if !entries.iter().any(Entry::is_real) {
            entries.push(Entry::placeholder());
        }
        debug!(cwd = %cwd, count = entries.len(), "loaded directory");
        Ok(Self {
            cwd,
            entries,
            selected: 0,
            scroll_top: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            options,
        })
    }

    /// List the same directory again, keeping the selection on the same name
    /// when it still exists, otherwise on the clamped old index.
    pub fn reload(&self) -> Result<Self> {
        let mut next = Self::load(self.cwd.clone(), self.options)?;
        next.viewport_height = self.viewport_height;
        let keep = self.selected_entry().map(|e| e.name.clone());
        let found = keep.as_deref().is_some_and(|name| next.select_name(name));
        if !found {
            next.select(self.selected);
        }
        Ok(next)
    }

    pub fn cwd(&self) -> &DirPath {
        &self.cwd
    }

    /// Parent of `cwd`, absent at the filesystem root.
    pub fn parent(&self) -> Option<DirPath> {
        self.cwd.parent()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    /// Absolute path of the selection, if it is a real entry.
    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry()
            .filter(|e| e.is_real())
            .map(|e| self.cwd.child(&e.name))
    }

    /// The entries inside the scroll window.
    pub fn visible(&self) -> &[Entry] {
        let end = (self.scroll_top + self.viewport_height).min(self.entries.len());
        &self.entries[self.scroll_top.min(end)..end]
    }

    /// Update the viewport height reported by the renderer.
    pub fn set_viewport_height(&mut self, height: usize) {
        let height = height.max(1);
        if height != self.viewport_height {
            self.viewport_height = height;
            self.recompute_scroll();
        }
    }

    /// Move the selection by `delta`, clamped to the listing.
    pub fn move_selection(&mut self, delta: isize) {
        let last = self.entries.len().saturating_sub(1) as isize;
        let target = (self.selected as isize).saturating_add(delta).clamp(0, last);
        self.selected = target as usize;
        self.recompute_scroll();
    }

    /// Select `index`, clamped to the listing.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.entries.len().saturating_sub(1));
        self.recompute_scroll();
    }

    /// Select the entry called `name`. Returns whether it was found.
    pub fn select_name(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                self.select(index);
                true
            }
            None => false,
        }
    }

    /// Midpoint-biased scroll: the window only moves once the selection
    /// crosses its middle, and never past either end of the listing.
    fn recompute_scroll(&mut self) {
        let height = self.viewport_height.max(1);
        let len = self.entries.len();
        if len <= height {
            self.scroll_top = 0;
            return;
        }
        let max_top = len - height;
        self.scroll_top = self.selected.saturating_sub(height / 2).min(max_top);
    }

    /// Enter the selected entry.
    pub fn enter(&self) -> Result<Enter> {
        let Some(entry) = self.selected_entry() else {
            return Ok(Enter::Stay);
        };
        if entry.is_placeholder {
            return Ok(Enter::Stay);
        }
        if entry.is_parent_marker {
            return match self.parent() {
                Some(parent) => Ok(Enter::Directory(self.navigate(parent)?)),
                None => Ok(Enter::Stay),
            };
        }
        if entry.is_dir() {
            let target = self.cwd.join_dir(&entry.name)?;
            return Ok(Enter::Directory(self.navigate(target)?));
        }
        Ok(Enter::File(self.cwd.child(&entry.name)))
    }

    fn navigate(&self, target: DirPath) -> Result<Self> {
        let mut next = Self::load(target, self.options)?;
        next.viewport_height = self.viewport_height;
        Ok(next)
    }

    /// Cache a finished size scan on the matching directory entry.
    /// Returns false when the path is no longer part of this listing.
    pub fn record_summary(&mut self, path: &Path, summary: SizeSummary) -> bool {
        if path.parent() != Some(self.cwd.as_path()) {
            return false;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.is_real() && e.is_dir() && e.name == name)
        {
            Some(entry) => {
                entry.size_bytes = (summary.total_kib * 1024.0) as u64;
                entry.summary = Some(summary);
                true
            }
            None => false,
        }
    }
}
