use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// The path does not exist.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The OS refused access to the path.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// An entry with the target name already exists.
    #[error("Already exists: {}", .0.display())]
    Exists(PathBuf),

    /// User input rejected before touching the filesystem.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl AppError {
    /// Classify an I/O error raised while operating on `path`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => AppError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => AppError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => AppError::Exists(path.to_path_buf()),
            _ => AppError::Io(err),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }
}

/// Attach a path to an `io::Result`, classifying the error kind.
pub trait IoResultExt<T> {
    fn at_path(self, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| AppError::from_io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::Other, "disk on fire");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("disk on fire"));
    }

    #[test]
    fn from_io_classifies_kinds() {
        let path = Path::new("/tmp/x");
        let nf = AppError::from_io(io::Error::from(io::ErrorKind::NotFound), path);
        assert!(matches!(nf, AppError::NotFound(ref p) if p == path));
        let pd = AppError::from_io(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert!(matches!(pd, AppError::PermissionDenied(_)));
        let ex = AppError::from_io(io::Error::from(io::ErrorKind::AlreadyExists), path);
        assert!(matches!(ex, AppError::Exists(_)));
        let other = AppError::from_io(io::Error::from(io::ErrorKind::UnexpectedEof), path);
        assert!(matches!(other, AppError::Io(_)));
    }

    #[test]
    fn at_path_attaches_path() {
        let res: io::Result<()> = Err(io::Error::from(io::ErrorKind::NotFound));
        let err = res.at_path(Path::new("/nope")).unwrap_err();
        assert_eq!(err.to_string(), "Not found: /nope");
    }

    #[test]
    fn invalid_input_display() {
        let err = AppError::invalid_input("name must not be empty");
        assert_eq!(err.to_string(), "Invalid input: name must not be empty");
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }
}
