//! Error types for reading and replacing G-code files.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the input or putting the output in place.
///
/// Everything up to [`FileError::Replace`] happens before the target is touched.
#[derive(Error, Debug)]
pub enum FileError {
    /// The input path does not exist.
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The input path exists but is not a regular file.
    #[error("Path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The input could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temporary or backup file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The temporary file could not be moved over the target.
    #[error("Failed to replace {} with {}: {source}", to.display(), from.display())]
    Replace {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for file operations.
pub type FileResult<T> = Result<T, FileError>;
