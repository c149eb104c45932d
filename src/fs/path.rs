//! Validated absolute directory paths and entry-name checks.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};

/// An absolute, lexically normalized directory path.
///
/// Displays with a trailing `/` so it can be shown as-is in the path bar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirPath(PathBuf);

impl DirPath {
    /// Wrap an absolute path. Relative paths are rejected.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(AppError::InvalidPath(format!(
                "{} is not absolute",
                path.display()
            )));
        }
        Ok(Self(normalize(&path)))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.parent().is_none()
    }

    /// One level up, or `None` at the filesystem root.
    pub fn parent(&self) -> Option<DirPath> {
        self.0.parent().map(|p| DirPath(p.to_path_buf()))
    }

    /// Descend into the child directory `name`.
    pub fn join_dir(&self, name: &str) -> Result<DirPath> {
        validate_name(name)?;
        Ok(DirPath(self.0.join(name)))
    }

    /// Absolute path of the child entry `name`.
    pub fn child(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    /// Resolve user input against this directory.
    ///
    /// Absolute input is taken as-is, `~` expands to the home directory,
    /// anything else is relative to `self`.
    pub fn resolve(&self, input: &str) -> PathBuf {
        let input = input.trim();
        let joined = if input == "~" {
            dirs::home_dir().unwrap_or_else(|| self.0.clone())
        } else if let Some(rest) = input.strip_prefix("~/") {
            match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => self.0.join(input),
            }
        } else {
            self.0.join(input)
        };
        normalize(&joined)
    }
}

impl fmt::Display for DirPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "/")
        } else {
            write!(f, "{}/", self.0.display())
        }
    }
}

/// Reject names that are empty, self/parent references, or contain separators.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(AppError::invalid_input("name must not be empty"));
    }
    if name == "." || name == ".." {
        return Err(AppError::invalid_input(format!("'{}' is reserved", name)));
    }
    if name.contains('/') || name.contains('\0') {
        return Err(AppError::invalid_input(format!(
            "'{}' must not contain '/'",
            name
        )));
    }
    Ok(())
}

/// Lexical normalization: drops `.`, resolves `..`, strips trailing separators.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push("/");
    }
    out
}
