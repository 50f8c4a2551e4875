//! Diff engine for dirdelta.
//!
//! Indexes an old and a new directory tree and classifies every relative
//! path in their union as added, removed, modified or unchanged. Sizes decide
//! most pairs; content digests are computed only for same-size pairs and
//! cached on the file records.
//!
//! # Key Types
//!
//! - [`compare`] / [`compare_with`] -- Index two roots and diff them
//! - [`diff_indexes`] -- Diff two already-built indexes through a [`FileHasher`](dirdelta_crypto::FileHasher)
//! - [`ComparisonResult`] -- Sorted, disjoint added/removed/modified sets
//! - [`CompareConfig`] -- Algorithm, walk and failure-policy settings

pub mod compare;
pub mod config;
pub mod differ;
pub mod error;
pub mod result;

pub use compare::{compare, compare_using, compare_with};
pub use config::{CompareConfig, DiffOptions, HashFailurePolicy};
pub use differ::diff_indexes;
pub use error::{CompareError, CompareResult};
pub use result::{Change, ComparisonResult, DiffStats, Side, SideDiagnostic};
