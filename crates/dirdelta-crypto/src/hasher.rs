use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use dirdelta_types::ContentDigest;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::algorithm::DigestAlgorithm;
use crate::error::{HasherError, HasherResult};

/// Default read buffer for streaming file content (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest read buffer a hasher accepts (16 MiB).
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Capability to fingerprint the full byte content of a file.
///
/// The diff engine only ever reads file content through this trait.
pub trait FileHasher: Send + Sync {
    /// Digest the file at `path`.
    fn hash_file(&self, path: &Path) -> io::Result<ContentDigest>;

    /// The algorithm behind the digests this hasher produces.
    fn algorithm(&self) -> DigestAlgorithm;
}

/// Streaming file hasher.
///
/// Reads at most `chunk_size` bytes at a time, so memory use is bounded no
/// matter how large the file is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    algorithm: DigestAlgorithm,
    chunk_size: usize,
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ContentHasher {
    /// Hasher with the default chunk size.
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Resolve an algorithm by name.
    pub fn from_name(name: &str) -> HasherResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    /// Override the read buffer size. Must lie in `1..=MAX_CHUNK_SIZE`.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> HasherResult<Self> {
        if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
            return Err(HasherError::InvalidChunkSize(chunk_size));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest an in-memory byte slice.
    pub fn hash_bytes(&self, data: &[u8]) -> ContentDigest {
        let mut state = StreamState::new(self.algorithm);
        state.update(data);
        state.finalize()
    }

    /// Digest everything readable from `reader`, one chunk at a time.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<ContentDigest> {
        let mut state = StreamState::new(self.algorithm);
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => state.update(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(state.finalize())
    }
}

impl FileHasher for ContentHasher {
    fn hash_file(&self, path: &Path) -> io::Result<ContentDigest> {
        let file = File::open(path)?;
        let digest = self.hash_reader(file)?;
        debug!(path = %path.display(), algorithm = %self.algorithm, digest = %digest.short_hex(), "hashed file");
        Ok(digest)
    }

    fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }
}

/// Incremental state for whichever algorithm was selected.
enum StreamState {
    Blake3(Box<blake3::Hasher>),
    Sha256(Sha256),
}

impl StreamState {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            DigestAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Blake3(h) => {
                h.update(data);
            }
            Self::Sha256(h) => h.update(data),
        }
    }

    fn finalize(self) -> ContentDigest {
        match self {
            Self::Blake3(h) => ContentDigest::from_hash(*h.finalize().as_bytes()),
            Self::Sha256(h) => {
                let mut out = [0u8; 32];
                out.copy_from_slice(&h.finalize());
                ContentDigest::from_hash(out)
            }
        }
    }
}
