use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{AppError, IoResultExt, Result};
use crate::fs::path::validate_name;

/// Fixed per-directory overhead in KiB added by `recursive_size`.
pub const DIR_OVERHEAD_KIB: f64 = 4.0;
/// Default depth cap for `recursive_size`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

const COPY_BUF_SIZE: usize = 64 * 1024;

/// Aggregate result of a recursive size scan.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeSummary {
    pub total_kib: f64,
    pub file_count: u64,
    pub dir_count: u64,
    /// Subtrees left out because they could not be read or were too deep.
    pub skipped: u64,
}

/// Rename `old` to `new_name` within the same directory.
///
/// Renaming to the current name is a no-op. An existing target is never
/// overwritten.
pub fn rename(old: &Path, new_name: &str) -> Result<PathBuf> {
    validate_name(new_name)?;
    let parent = old
        .parent()
        .ok_or_else(|| AppError::invalid_input("cannot rename the filesystem root"))?;
    fs::symlink_metadata(old).at_path(old)?;

    let target = parent.join(new_name);
    if target == old {
        return Ok(target);
    }
    if fs::symlink_metadata(&target).is_ok() {
        return Err(AppError::Exists(target));
    }
    fs::rename(old, &target).at_path(old)?;
    info!(from = %old.display(), to = %target.display(), "renamed");
    Ok(target)
}

/// Delete a single file or an empty directory.
pub fn delete(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).at_path(path)?;
    if meta.is_dir() {
        fs::remove_dir(path).at_path(path)?;
    } else {
        fs::remove_file(path).at_path(path)?;
    }
    info!(path = %path.display(), "deleted");
    Ok(())
}

/// Create an empty file. Fails if anything already exists at `path`.
pub fn create_empty(path: &Path) -> Result<()> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .at_path(path)?;
    info!(path = %path.display(), "created");
    Ok(())
}

/// Copy the file `src` into `dest_dir`, keeping its name.
///
/// Bytes are streamed unchanged. The destination must not exist yet; a
/// short copy removes the partial destination and fails.
pub fn copy(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let dest = destination_for(src, dest_dir)?;
    copy_file_to(src, &dest)?;
    info!(from = %src.display(), to = %dest.display(), "copied");
    Ok(dest)
}

/// Move `src` into `dest_dir`.
///
/// Tries an atomic rename first. Only when the rename crosses filesystems
/// does a file fall back to `move_by_copy`; other rename errors are returned
/// as they are.
pub fn move_entry(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let src_meta = fs::symlink_metadata(src).at_path(src)?;
    let name = file_name(src)?;
    let dest_meta = fs::metadata(dest_dir).at_path(dest_dir)?;
    if !dest_meta.is_dir() {
        return Err(AppError::invalid_input(format!(
            "{} is not a directory",
            dest_dir.display()
        )));
    }
    let dest = dest_dir.join(name);
    if fs::symlink_metadata(&dest).is_ok() {
        return Err(AppError::Exists(dest));
    }

    match fs::rename(src, &dest) {
        Ok(()) => {
            info!(from = %src.display(), to = %dest.display(), "moved");
            Ok(dest)
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(error = %e, "rename crosses devices, falling back to copy");
            if src_meta.is_dir() {
                return Err(AppError::invalid_input(
                    "directories can only be moved within one filesystem",
                ));
            }
            move_by_copy(src, &dest)
        }
        Err(e) => Err(AppError::from_io(e, src)),
    }
}

/// Move the file `src` to `dest` by copying, verifying and then removing the
/// source. The source is kept whenever the copy or the check fails.
pub fn move_by_copy(src: &Path, dest: &Path) -> Result<PathBuf> {
    transfer_verified(src, dest, verify_identical)
}

fn transfer_verified(
    src: &Path,
    dest: &Path,
    verify: impl Fn(&Path, &Path) -> Result<()>,
) -> Result<PathBuf> {
    copy_file_to(src, dest)?;
    if let Err(e) = verify(src, dest) {
        warn!(error = %e, dest = %dest.display(), "copy verification failed");
        let _ = fs::remove_file(dest);
        return Err(e);
    }
    fs::remove_file(src).at_path(src)?;
    info!(from = %src.display(), to = %dest.display(), "moved (copy + delete)");
    Ok(dest.to_path_buf())
}

/// Total size in KiB and entry counts below `dir`.
///
/// Each readable subdirectory adds `DIR_OVERHEAD_KIB` plus its contents.
/// Subtrees that fail to read, or lie deeper than `max_depth`, are skipped
/// and excluded from the totals. Only a failure on `dir` itself is an error.
pub fn recursive_size(dir: &Path, max_depth: usize) -> Result<SizeSummary> {
    let entries = fs::read_dir(dir).at_path(dir)?;
    let mut summary = SizeSummary::default();
    accumulate(entries, 0, max_depth, &mut summary);
    debug!(
        dir = %dir.display(),
        kib = summary.total_kib,
        files = summary.file_count,
        skipped = summary.skipped,
        "size scan finished"
    );
    Ok(summary)
}

fn accumulate(entries: fs::ReadDir, depth: usize, max_depth: usize, summary: &mut SizeSummary) {
    for entry in entries {
        let Ok(entry) = entry else {
            summary.skipped += 1;
            continue;
        };
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if !is_dir {
            let len = fs::metadata(&path)
                .or_else(|_| fs::symlink_metadata(&path))
                .map(|m| if m.is_dir() { 0 } else { m.len() })
                .unwrap_or(0);
            summary.file_count += 1;
            summary.total_kib += len as f64 / 1024.0;
            continue;
        }

        if depth + 1 > max_depth {
            summary.skipped += 1;
            continue;
        }
        match fs::read_dir(&path) {
            Ok(children) => {
                let mut sub = SizeSummary::default();
                accumulate(children, depth + 1, max_depth, &mut sub);
                summary.dir_count += 1 + sub.dir_count;
                summary.file_count += sub.file_count;
                summary.skipped += sub.skipped;
                summary.total_kib += DIR_OVERHEAD_KIB + sub.total_kib;
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable subtree");
                summary.skipped += 1;
            }
        }
    }
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr> {
    path.file_name()
        .ok_or_else(|| AppError::invalid_input(format!("{} has no file name", path.display())))
}

/// Validate a copy source and destination directory; return the target path.
fn destination_for(src: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let src_meta = fs::metadata(src).at_path(src)?;
    if src_meta.is_dir() {
        return Err(AppError::invalid_input("only files can be copied"));
    }
    let dest_meta = fs::metadata(dest_dir).at_path(dest_dir)?;
    if !dest_meta.is_dir() {
        return Err(AppError::invalid_input(format!(
            "{} is not a directory",
            dest_dir.display()
        )));
    }
    let dest = dest_dir.join(file_name(src)?);
    if fs::symlink_metadata(&dest).is_ok() {
        return Err(AppError::Exists(dest));
    }
    Ok(dest)
}

/// Stream `src` into a newly created `dest` and confirm the byte count.
fn copy_file_to(src: &Path, dest: &Path) -> Result<u64> {
    let src_file = File::open(src).at_path(src)?;
    let expected = src_file.metadata().at_path(src)?.len();
    let dest_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(dest)
        .at_path(dest)?;

    let result = stream(src_file, dest_file).and_then(|written| {
        if written == expected {
            Ok(written)
        } else {
            Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("copied {} of {} bytes", written, expected),
            ))
        }
    });

    match result {
        Ok(written) => Ok(written),
        Err(e) => {
            let _ = fs::remove_file(dest);
            Err(AppError::Io(e))
        }
    }
}

fn stream(src: File, dest: File) -> io::Result<u64> {
    let mut reader = BufReader::with_capacity(COPY_BUF_SIZE, src);
    let mut writer = BufWriter::with_capacity(COPY_BUF_SIZE, dest);
    let written = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(written)
}

/// Byte-for-byte comparison of two files.
fn verify_identical(a: &Path, b: &Path) -> Result<()> {
    let mismatch = || {
        AppError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} does not match {}", b.display(), a.display()),
        ))
    };

    let fa = File::open(a).at_path(a)?;
    let fb = File::open(b).at_path(b)?;
    if fa.metadata().at_path(a)?.len() != fb.metadata().at_path(b)?.len() {
        return Err(mismatch());
    }

    let mut ra = BufReader::with_capacity(COPY_BUF_SIZE, fa);
    let mut rb = BufReader::with_capacity(COPY_BUF_SIZE, fb);
    let mut buf_a = vec![0u8; COPY_BUF_SIZE];
    let mut buf_b = vec![0u8; COPY_BUF_SIZE];
    loop {
        let n = ra.read(&mut buf_a).at_path(a)?;
        if n == 0 {
            return Ok(());
        }
        rb.read_exact(&mut buf_b[..n]).at_path(b)?;
        if buf_a[..n] != buf_b[..n] {
            return Err(mismatch());
        }
    }
}
