//! Error types for the crypto crate.

/// Errors from configuring a hasher.
///
/// Both variants are configuration errors: they surface when a hasher is
/// built, before any file is read.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    /// The requested digest algorithm is not compiled into this build.
    #[error("digest algorithm unavailable: {0}")]
    DigestUnavailable(String),

    /// Read buffer size outside `1..=MAX_CHUNK_SIZE`.
    #[error("invalid chunk size {0}: must be between 1 and 16777216 bytes")]
    InvalidChunkSize(usize),
}

/// Convenience alias for hasher results.
pub type HasherResult<T> = Result<T, HasherError>;
