//! Per-file records stored in a directory index.

use std::sync::OnceLock;

use dirdelta_types::ContentDigest;

/// Lightweight metadata for one regular file.
///
/// `size` is known from the moment the record is created. The digest starts
/// empty and is written at most once, the first time a comparison needs it;
/// later lookups reuse the cached value.
#[derive(Clone, Debug, Default)]
pub struct FileRecord {
    size: u64,
    digest: OnceLock<ContentDigest>,
}

impl FileRecord {
    /// Create a record with an empty digest cache.
    pub fn new(size: u64) -> Self {
        Self {
            size,
            digest: OnceLock::new(),
        }
    }

    /// File size in bytes at indexing time.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The cached digest, if one has been computed.
    pub fn cached_digest(&self) -> Option<&ContentDigest> {
        self.digest.get()
    }

    /// Returns `true` once the digest has been computed.
    pub fn is_hashed(&self) -> bool {
        self.digest.get().is_some()
    }

    /// Return the cached digest, computing it with `compute` on first use.
    ///
    /// A failed computation leaves the cache empty.
    pub fn digest_or_try_init<E>(
        &self,
        compute: impl FnOnce() -> Result<ContentDigest, E>,
    ) -> Result<ContentDigest, E> {
        if let Some(digest) = self.digest.get() {
            return Ok(*digest);
        }
        let digest = compute()?;
        Ok(*self.digest.get_or_init(|| digest))
    }
}
