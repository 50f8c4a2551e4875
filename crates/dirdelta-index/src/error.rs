//! Error types for the index crate.

use std::path::PathBuf;

/// Errors that abort indexing before traversal begins.
///
/// Failures on individual entries during the walk are not errors; they are
/// recorded as [`WalkDiagnostic`](crate::WalkDiagnostic)s on the index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The root does not exist or is not a directory.
    #[error("invalid input {path:?}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
