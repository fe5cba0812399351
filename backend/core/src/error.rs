use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single recognition call.
///
/// `NotFound` is kept distinct from every other failure because it is the
/// only kind that makes a corrected-path retry worthwhile.
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("image not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("recognition engine {engine} failed: {message}")]
    Engine { engine: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("recognition of {} timed out after {secs}s", path.display())]
    Timeout { path: PathBuf, secs: u64 },

    #[error("recognition cancelled")]
    Cancelled,
}

impl RecognitionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Map an I/O error on `path` into the taxonomy, promoting `NotFound`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

/// Failure that stops processing of one document. Never aborts the run.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write document {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document processing cancelled")]
    Cancelled,
}
