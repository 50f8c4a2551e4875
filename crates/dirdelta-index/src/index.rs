//! The per-root index produced by the walker.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dirdelta_types::RelativePath;

use crate::entry::FileRecord;
use crate::walker::WalkDiagnostic;

/// Every regular file under one root, keyed by root-relative path.
///
/// Built once by the [`Indexer`](crate::Indexer) (or from pre-enumerated
/// entries) and never mutated afterwards, apart from the write-once digest
/// cache inside each [`FileRecord`].
pub struct DirectoryIndex {
    root: PathBuf,
    entries: BTreeMap<RelativePath, FileRecord>,
    diagnostics: Vec<WalkDiagnostic>,
    skipped: usize,
}

impl std::fmt::Debug for DirectoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryIndex")
            .field("root", &self.root)
            .field("entries", &self.entries.len())
            .field("diagnostics", &self.diagnostics.len())
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl DirectoryIndex {
    pub(crate) fn new(
        root: PathBuf,
        entries: BTreeMap<RelativePath, FileRecord>,
        diagnostics: Vec<WalkDiagnostic>,
        skipped: usize,
    ) -> Self {
        Self {
            root,
            entries,
            diagnostics,
            skipped,
        }
    }

    /// Build an index from entries enumerated elsewhere.
    ///
    /// A later duplicate of the same relative path replaces the earlier one.
    pub fn from_records(
        root: impl Into<PathBuf>,
        records: impl IntoIterator<Item = (RelativePath, u64)>,
    ) -> Self {
        let entries = records
            .into_iter()
            .map(|(path, size)| (path, FileRecord::new(size)))
            .collect();
        Self::new(root.into(), entries, Vec::new(), 0)
    }

    /// The directory this index was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no regular files were indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a file by relative path.
    pub fn get(&self, path: &RelativePath) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &RelativePath) -> bool {
        self.entries.contains_key(path)
    }

    /// All relative paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.entries.keys()
    }

    /// All entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &FileRecord)> {
        self.entries.iter()
    }

    /// Entries that failed during the walk and were left out.
    pub fn diagnostics(&self) -> &[WalkDiagnostic] {
        &self.diagnostics
    }

    /// Count of non-regular entries (symlinks, devices, sockets) passed over.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Where `path` lives on disk under this index's root.
    pub fn absolute_path(&self, path: &RelativePath) -> PathBuf {
        self.root.join(path.to_path_buf())
    }
}
