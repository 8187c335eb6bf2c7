use std::path::PathBuf;
use thiserror::Error;

/// The main error type for textprep operations.
#[derive(Debug, Error)]
pub enum TextprepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Member '{member}' not found in archive {archive}")]
    NotFound { member: String, archive: PathBuf },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("Failed to read archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("Unsupported archive format: {0} (expected .zip, .tar.gz or .tgz)")]
    UnsupportedArchive(PathBuf),

    #[error("File {path} is not valid UTF-8 text")]
    Decode { path: PathBuf },

    #[error("Invalid dataset config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl TextprepError {
    /// Wraps an IO error with the path it happened on.
    pub(crate) fn io_at(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| TextprepError::IoAt { path, source }
    }
}
