//! Content hashing for dirdelta.
//!
//! Streams file content through a 256-bit cryptographic digest in bounded
//! chunks. The [`FileHasher`] trait is the byte-stream-read seam the diff
//! engine hashes through, so tests can observe or replace file reads.
//!
//! Digests come from the `blake3` and `sha2` crates; nothing here implements
//! a hash function itself.

pub mod algorithm;
pub mod error;
pub mod hasher;

pub use algorithm::DigestAlgorithm;
pub use error::{HasherError, HasherResult};
pub use hasher::{ContentHasher, FileHasher, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
