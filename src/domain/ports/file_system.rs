//! FileSystem port - abstraction over file I/O operations
//!
//! This trait allows the application layer to inspect and replace the
//! installed proxy configuration and certificate artifacts without depending
//! on concrete implementations (local disk, in-memory mock).

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Classify an I/O error for the given path
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O with atomic writes
/// - test mocks - in-memory maps
pub trait FileSystem {
    /// Read file content as string
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Read file content, mapping "not found" to `None`
    fn read_optional(&self, path: &Path) -> FsResult<Option<String>> {
        match self.read(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Write content to file atomically, creating parent directories
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Check whether a path exists.
    ///
    /// Unlike a plain boolean check, a refused lookup is reported as
    /// `FsError::PermissionDenied` rather than "absent".
    fn try_exists(&self, path: &Path) -> FsResult<bool>;

    /// Remove a file
    fn remove(&self, path: &Path) -> FsResult<()>;

    /// List the regular files directly inside `dir`, sorted.
    ///
    /// A missing directory yields an empty list.
    fn list_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>>;
}
