//! Paged file viewer with text/binary detection.
//!
//! A file is shown as text when it fits within the scan limit and every byte
//! is 7-bit ASCII; anything else is shown as rows of hex byte pairs. Binary
//! rows are read lazily with a seek per page so large files stay cheap.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, IoResultExt, Result};

/// Default number of bytes inspected when classifying a file (64 KiB).
pub const DEFAULT_SCAN_LIMIT: u64 = 64 * 1024;
/// Default tab expansion width in text mode.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Width of the `00000000  ` offset column in binary mode.
pub const OFFSET_COLUMN: usize = 10;
/// Characters per rendered group of two bytes (`abcd `).
const GROUP_WIDTH: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct ViewerOptions {
    pub scan_limit: u64,
    pub tab_width: usize,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            scan_limit: DEFAULT_SCAN_LIMIT,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

/// Cached rows for one binary page.
#[derive(Debug)]
struct PageCache {
    page_start: usize,
    height: usize,
    width: usize,
    rows: Vec<String>,
}

/// An open file in the viewer.
#[derive(Debug)]
pub struct ViewerState {
    path: PathBuf,
    is_text: bool,
    page_start: usize,
    file_len: u64,
    lines: Vec<String>,
    cache: Option<PageCache>,
}

/// True when every byte is 7-bit ASCII.
pub fn is_text(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b <= 127)
}

impl ViewerState {
    /// Open `path`, deciding text or binary mode once.
    pub fn open(path: &Path, opts: &ViewerOptions) -> Result<Self> {
        let file = File::open(path).at_path(path)?;
        let meta = file.metadata().at_path(path)?;
        if meta.is_dir() {
            return Err(AppError::invalid_input(format!(
                "{} is a directory",
                path.display()
            )));
        }
        let file_len = meta.len();

        let mut head = Vec::new();
        file.take(opts.scan_limit)
            .read_to_end(&mut head)
            .at_path(path)?;

        let is_text = file_len <= opts.scan_limit && is_text(&head);
        let lines = if is_text {
            String::from_utf8_lossy(&head)
                .lines()
                .map(|l| sanitize_line(l, opts.tab_width))
                .collect()
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), is_text, len = file_len, "opened viewer");
        Ok(Self {
            path: path.to_path_buf(),
            is_text,
            page_start: 0,
            file_len,
            lines,
            cache: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_text(&self) -> bool {
        self.is_text
    }

    pub fn page_start(&self) -> usize {
        self.page_start
    }

    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Advance by one viewport. There is no ceiling: past the end renders nothing.
    pub fn page_down(&mut self, height: usize) {
        self.page_start = self.page_start.saturating_add(height.max(1));
    }

    /// Go back by one viewport, floored at 0.
    pub fn page_up(&mut self, height: usize) {
        self.page_start = self.page_start.saturating_sub(height.max(1));
    }

    pub fn scroll_down(&mut self) {
        self.page_start = self.page_start.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.page_start = self.page_start.saturating_sub(1);
    }

    /// Rows visible in a viewport of `height` x `width` cells.
    pub fn rows(&mut self, height: usize, width: usize) -> Result<Vec<String>> {
        if self.is_text {
            return Ok(self
                .lines
                .iter()
                .skip(self.page_start)
                .take(height)
                .map(|l| l.chars().take(width).collect())
                .collect());
        }

        if let Some(cache) = &self.cache {
            if cache.page_start == self.page_start && cache.height == height && cache.width == width
            {
                return Ok(cache.rows.clone());
            }
        }
        let rows = self.read_hex_rows(height, width)?;
        self.cache = Some(PageCache {
            page_start: self.page_start,
            height,
            width,
            rows: rows.clone(),
        });
        Ok(rows)
    }

    fn read_hex_rows(&self, height: usize, width: usize) -> Result<Vec<String>> {
        let per_row = bytes_per_row(width);
        let offset = (self.page_start as u64).saturating_mul(per_row as u64);
        if offset >= self.file_len || height == 0 {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path).at_path(&self.path)?;
        file.seek(SeekFrom::Start(offset)).at_path(&self.path)?;
        let mut block = Vec::with_capacity(per_row * height);
        file.take((per_row * height) as u64)
            .read_to_end(&mut block)
            .at_path(&self.path)?;

        Ok(block
            .chunks(per_row)
            .enumerate()
            .map(|(i, row)| format_hex_row(offset + (i * per_row) as u64, row))
            .collect())
    }
}

/// Bytes shown per binary row for a viewport `width` (always even, at least 2).
pub fn bytes_per_row(width: usize) -> usize {
    let groups = width.saturating_sub(OFFSET_COLUMN) / GROUP_WIDTH;
    groups.max(1) * 2
}

/// `00000010  4865 6c6c 6f`
pub fn format_hex_row(offset: u64, bytes: &[u8]) -> String {
    let mut row = format!("{:08x}  ", offset);
    for pair in bytes.chunks(2) {
        for b in pair {
            row.push_str(&format!("{:02x}", b));
        }
        row.push(' ');
    }
    row.trim_end().to_string()
}

/// Expand tabs and replace other control characters with `.`.
fn sanitize_line(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => {
                let pad = tab_width.max(1) - out.chars().count() % tab_width.max(1);
                out.extend(std::iter::repeat(' ').take(pad));
            }
            c if c.is_control() => out.push('.'),
            c => out.push(c),
        }
    }
    out
}
