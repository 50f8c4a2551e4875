use std::fs;
use std::path::Path;

use dirdelta_crypto::{ContentHasher, DEFAULT_CHUNK_SIZE};
use dirdelta_index::{IndexOptions, SymlinkPolicy};
use serde::{Deserialize, Serialize};

use crate::error::{CompareError, CompareResult};

/// What to do when a same-size file cannot be read for hashing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashFailurePolicy {
    /// Abort the comparison with `IoFailure`.
    #[default]
    Fail,
    /// Classify the path as modified and record a diagnostic.
    TreatAsModified,
}

/// Settings consumed by [`diff_indexes`](crate::diff_indexes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffOptions {
    pub on_hash_failure: HashFailurePolicy,
    /// Hash same-size candidates on the rayon pool.
    pub parallel: bool,
}

/// Configuration for a full comparison.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// algorithm = "sha256"
/// symlinks = "follow"
/// on_hash_failure = "treat-as-modified"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Digest algorithm name, resolved when the hasher is built.
    pub algorithm: String,
    /// Read buffer size for hashing, in bytes.
    pub chunk_size: usize,
    /// Symlink handling, applied identically to both roots.
    pub symlinks: SymlinkPolicy,
    pub max_depth: Option<usize>,
    pub on_hash_failure: HashFailurePolicy,
    /// Index both roots concurrently and hash candidates in parallel.
    pub parallel: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            algorithm: "blake3".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            symlinks: SymlinkPolicy::default(),
            max_depth: None,
            on_hash_failure: HashFailurePolicy::default(),
            parallel: false,
        }
    }
}

impl CompareConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> CompareResult<Self> {
        toml::from_str(s).map_err(|e| CompareError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> CompareResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CompareError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Build the content hasher this configuration asks for.
    ///
    /// This is where an unknown algorithm becomes `DigestUnavailable`, so
    /// callers should do it before touching either tree.
    pub fn hasher(&self) -> CompareResult<ContentHasher> {
        Ok(ContentHasher::from_name(&self.algorithm)?.with_chunk_size(self.chunk_size)?)
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            symlinks: self.symlinks,
            max_depth: self.max_depth,
        }
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            on_hash_failure: self.on_hash_failure,
            parallel: self.parallel,
        }
    }
}
