//! Directory indexer for dirdelta.
//!
//! Walks one root directory and records every regular file's size under its
//! root-relative path. Content digests are never computed here; each
//! [`FileRecord`] carries a write-once cache that the diff engine fills only
//! for files whose size cannot tell them apart.
//!
//! # Key Types
//!
//! - [`Indexer`] -- Walks a root with a fixed [`IndexOptions`]
//! - [`DirectoryIndex`] -- Immutable `BTreeMap<RelativePath, FileRecord>` for one root
//! - [`FileRecord`] -- Size plus lazily cached digest
//! - [`WalkDiagnostic`] -- A per-entry failure that was skipped, not raised

pub mod entry;
pub mod error;
pub mod index;
pub mod walker;

pub use entry::FileRecord;
pub use error::{IndexError, IndexResult};
pub use index::DirectoryIndex;
pub use walker::{check_root, IndexOptions, Indexer, SymlinkPolicy, WalkDiagnostic};
