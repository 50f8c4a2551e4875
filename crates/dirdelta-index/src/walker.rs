//! Recursive directory walk producing a [`DirectoryIndex`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dirdelta_types::RelativePath;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::entry::FileRecord;
use crate::error::{IndexError, IndexResult};
use crate::index::DirectoryIndex;

/// How symbolic links found under a root are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymlinkPolicy {
    /// Links are non-regular entries and are left out of the index.
    #[default]
    Skip,
    /// Links are resolved; a link to a file is indexed under the link's own
    /// path and a link to a directory is descended into. Loops are reported
    /// as diagnostics.
    Follow,
}

/// Walk settings. One value is shared by both roots of a comparison.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    pub symlinks: SymlinkPolicy,
    /// Deepest level to descend to; files directly under the root are
    /// depth 1. `None` walks the whole tree.
    pub max_depth: Option<usize>,
}

/// An entry that could not be indexed and was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkDiagnostic {
    /// The offending entry, when the walker could tell which one it was.
    /// Written lossily so names that are not UTF-8 can still be reported.
    #[serde(serialize_with = "serialize_lossy")]
    pub path: Option<PathBuf>,
    pub message: String,
}

impl WalkDiagnostic {
    pub fn new(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

fn serialize_lossy<S: serde::Serializer>(
    path: &Option<PathBuf>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match path {
        Some(path) => serializer.serialize_some(&path.to_string_lossy()),
        None => serializer.serialize_none(),
    }
}

impl std::fmt::Display for WalkDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Builds a [`DirectoryIndex`] for a root directory.
#[derive(Clone, Debug, Default)]
pub struct Indexer {
    options: IndexOptions,
}

impl Indexer {
    pub fn new(options: IndexOptions) -> Self {
        Self { options }
    }

    /// Walk `root` and record the size of every regular file under it.
    ///
    /// Fails only if `root` is not an existing directory. Anything that goes
    /// wrong on an individual entry afterwards is skipped and recorded as a
    /// diagnostic on the returned index.
    pub fn index(&self, root: &Path) -> IndexResult<DirectoryIndex> {
        check_root(root)?;

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.options.symlinks == SymlinkPolicy::Follow);
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut entries = BTreeMap::new();
        let mut diagnostics = Vec::new();
        let mut skipped = 0usize;

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf);
                    warn!(root = %root.display(), path = ?path, error = %e, "skipping unreadable entry");
                    diagnostics.push(WalkDiagnostic::new(path, e.to_string()));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                debug!(path = %entry.path().display(), "skipping non-regular entry");
                skipped += 1;
                continue;
            }

            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping file without metadata");
                    diagnostics.push(WalkDiagnostic::new(
                        Some(entry.path().to_path_buf()),
                        e.to_string(),
                    ));
                    continue;
                }
            };

            match RelativePath::from_root(root, entry.path()) {
                Ok(rel) => {
                    entries.insert(rel, FileRecord::new(size));
                }
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "skipping unrepresentable path");
                    diagnostics.push(WalkDiagnostic::new(
                        Some(entry.path().to_path_buf()),
                        e.to_string(),
                    ));
                }
            }
        }

        debug!(
            root = %root.display(),
            files = entries.len(),
            skipped,
            diagnostics = diagnostics.len(),
            "indexed directory"
        );
        Ok(DirectoryIndex::new(
            root.to_path_buf(),
            entries,
            diagnostics,
            skipped,
        ))
    }
}

/// Reject a root that is missing or not a directory.
pub fn check_root(root: &Path) -> IndexResult<()> {
    let meta = fs::metadata(root).map_err(|e| IndexError::InvalidInput {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !meta.is_dir() {
        return Err(IndexError::InvalidInput {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(())
}
