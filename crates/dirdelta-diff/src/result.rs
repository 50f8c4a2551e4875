//! The outcome of comparing two directory trees.

use std::collections::BTreeSet;
use std::fmt;

use dirdelta_index::WalkDiagnostic;
use dirdelta_types::RelativePath;
use serde::Serialize;

/// Which of the two compared trees something belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::New => f.write_str("new"),
        }
    }
}

/// How a single path changed between the old and new tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Change {
    /// Present only in the new tree.
    Added,
    /// Present only in the old tree.
    Removed,
    /// Present in both with different size or content.
    Modified,
}

/// A non-fatal problem met during the comparison, tagged with its tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SideDiagnostic {
    pub side: Side,
    #[serde(flatten)]
    pub diagnostic: WalkDiagnostic,
}

impl fmt::Display for SideDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.side, self.diagnostic)
    }
}

/// Counters describing how much work a comparison did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    /// Regular files indexed under the old root.
    pub old_files: usize,
    /// Regular files indexed under the new root.
    pub new_files: usize,
    /// Paths in both trees decided by size alone.
    pub size_mismatches: usize,
    /// Paths in both trees whose sizes matched and needed digests.
    pub hash_comparisons: usize,
    /// Individual files actually read and hashed.
    pub files_hashed: usize,
    /// Non-regular entries passed over under the old root.
    pub old_skipped: usize,
    /// Non-regular entries passed over under the new root.
    pub new_skipped: usize,
}

/// Added, removed and modified relative paths.
///
/// The three sets are disjoint and sorted. Paths that are identical in both
/// trees appear in none of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    added: BTreeSet<RelativePath>,
    removed: BTreeSet<RelativePath>,
    modified: BTreeSet<RelativePath>,
    diagnostics: Vec<SideDiagnostic>,
    stats: DiffStats,
}

impl ComparisonResult {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `change`. Each path is classified exactly once.
    pub(crate) fn record(&mut self, change: Change, path: RelativePath) {
        debug_assert!(self.change_of(&path).is_none(), "path classified twice: {path}");
        match change {
            Change::Added => self.added.insert(path),
            Change::Removed => self.removed.insert(path),
            Change::Modified => self.modified.insert(path),
        };
    }

    pub(crate) fn push_diagnostic(&mut self, side: Side, diagnostic: WalkDiagnostic) {
        self.diagnostics.push(SideDiagnostic { side, diagnostic });
    }

    pub(crate) fn stats_mut(&mut self) -> &mut DiffStats {
        &mut self.stats
    }

    /// Paths only in the new tree.
    pub fn added(&self) -> &BTreeSet<RelativePath> {
        &self.added
    }

    /// Paths only in the old tree.
    pub fn removed(&self) -> &BTreeSet<RelativePath> {
        &self.removed
    }

    /// Paths in both trees whose size or content differs.
    pub fn modified(&self) -> &BTreeSet<RelativePath> {
        &self.modified
    }

    /// Walk failures and downgraded read failures from both trees.
    pub fn diagnostics(&self) -> &[SideDiagnostic] {
        &self.diagnostics
    }

    pub fn stats(&self) -> &DiffStats {
        &self.stats
    }

    /// Returns `true` if any path was added, removed or modified.
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty())
    }

    /// Number of changed paths across all three sets.
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    /// How `path` changed, or `None` if it is unchanged or unknown.
    pub fn change_of(&self, path: &RelativePath) -> Option<Change> {
        if self.added.contains(path) {
            Some(Change::Added)
        } else if self.removed.contains(path) {
            Some(Change::Removed)
        } else if self.modified.contains(path) {
            Some(Change::Modified)
        } else {
            None
        }
    }

    /// Returns `true` if no path appears in more than one set.
    pub fn is_disjoint(&self) -> bool {
        self.added.is_disjoint(&self.removed)
            && self.added.is_disjoint(&self.modified)
            && self.removed.is_disjoint(&self.modified)
    }
}
