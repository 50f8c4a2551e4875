//! Error types for the diff crate.

use std::io;
use std::path::PathBuf;

use dirdelta_crypto::HasherError;
use dirdelta_index::IndexError;
use dirdelta_types::RelativePath;

/// Errors that abort a comparison.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// A root does not exist or is not a directory.
    #[error("invalid input {path:?}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    /// A file present in the index could not be read while hashing it.
    #[error("failed to read {path} under {root:?}: {source}")]
    IoFailure {
        root: PathBuf,
        path: RelativePath,
        #[source]
        source: io::Error,
    },

    /// The configured digest algorithm is not available in this build.
    #[error("digest algorithm unavailable: {0}")]
    DigestUnavailable(String),

    /// The configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<IndexError> for CompareError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::InvalidInput { path, reason } => Self::InvalidInput { path, reason },
        }
    }
}

impl From<HasherError> for CompareError {
    fn from(err: HasherError) -> Self {
        match err {
            HasherError::DigestUnavailable(name) => Self::DigestUnavailable(name),
            other => Self::Config(other.to_string()),
        }
    }
}

/// Convenience alias for comparison results.
pub type CompareResult<T> = Result<T, CompareError>;
