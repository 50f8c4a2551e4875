//! Classify the union of two indexes into added, removed and modified paths.
//!
//! Paths present in both trees are compared by size first. Only pairs whose
//! sizes match are hashed, and each record's digest is cached so it is read
//! at most once.

use std::io;

use dirdelta_crypto::FileHasher;
use dirdelta_index::{DirectoryIndex, FileRecord, WalkDiagnostic};
use dirdelta_types::RelativePath;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::{DiffOptions, HashFailurePolicy};
use crate::error::{CompareError, CompareResult};
use crate::result::{Change, ComparisonResult, Side};

/// A path present in both trees with equal sizes.
struct Candidate<'a> {
    path: &'a RelativePath,
    old: &'a FileRecord,
    new: &'a FileRecord,
}

/// Result of hashing one candidate pair.
struct PairOutcome {
    differs: Result<bool, (Side, io::Error)>,
    files_hashed: usize,
}

/// Diff two indexes.
///
/// Every path in the union of `old` and `new` ends up in exactly one of the
/// result's sets or in none of them (unchanged). Walk diagnostics from both
/// indexes are carried over into the result.
pub fn diff_indexes(
    old: &DirectoryIndex,
    new: &DirectoryIndex,
    hasher: &dyn FileHasher,
    options: &DiffOptions,
) -> CompareResult<ComparisonResult> {
    let mut result = ComparisonResult::new();
    for diag in old.diagnostics() {
        result.push_diagnostic(Side::Old, diag.clone());
    }
    for diag in new.diagnostics() {
        result.push_diagnostic(Side::New, diag.clone());
    }
    {
        let stats = result.stats_mut();
        stats.old_files = old.len();
        stats.new_files = new.len();
        stats.old_skipped = old.skipped();
        stats.new_skipped = new.skipped();
    }

    let mut candidates = Vec::new();
    for (path, old_rec) in old.iter() {
        match new.get(path) {
            None => result.record(Change::Removed, path.clone()),
            Some(new_rec) if old_rec.size() != new_rec.size() => {
                result.stats_mut().size_mismatches += 1;
                result.record(Change::Modified, path.clone());
            }
            Some(new_rec) => candidates.push(Candidate {
                path,
                old: old_rec,
                new: new_rec,
            }),
        }
    }
    for path in new.paths() {
        if !old.contains(path) {
            result.record(Change::Added, path.clone());
        }
    }

    result.stats_mut().hash_comparisons = candidates.len();
    debug!(
        candidates = candidates.len(),
        algorithm = %hasher.algorithm(),
        parallel = options.parallel,
        "hashing same-size candidates"
    );

    let check = |c: &Candidate<'_>| hash_pair(old, new, hasher, c);
    let outcomes: Vec<PairOutcome> = if options.parallel {
        candidates.par_iter().map(check).collect()
    } else {
        candidates.iter().map(check).collect()
    };

    for (candidate, outcome) in candidates.iter().zip(outcomes) {
        result.stats_mut().files_hashed += outcome.files_hashed;
        match outcome.differs {
            Ok(true) => result.record(Change::Modified, candidate.path.clone()),
            Ok(false) => {}
            Err((side, source)) => {
                let index = match side {
                    Side::Old => old,
                    Side::New => new,
                };
                match options.on_hash_failure {
                    HashFailurePolicy::Fail => {
                        return Err(CompareError::IoFailure {
                            root: index.root().to_path_buf(),
                            path: candidate.path.clone(),
                            source,
                        });
                    }
                    HashFailurePolicy::TreatAsModified => {
                        let abs = index.absolute_path(candidate.path);
                        warn!(path = %abs.display(), error = %source, "unreadable file treated as modified");
                        result.push_diagnostic(
                            side,
                            WalkDiagnostic::new(
                                Some(abs),
                                format!("unreadable during hashing, treated as modified: {source}"),
                            ),
                        );
                        result.record(Change::Modified, candidate.path.clone());
                    }
                }
            }
        }
    }

    Ok(result)
}

fn hash_pair(
    old: &DirectoryIndex,
    new: &DirectoryIndex,
    hasher: &dyn FileHasher,
    candidate: &Candidate<'_>,
) -> PairOutcome {
    let mut files_hashed = 0;
    let mut digest_of = |index: &DirectoryIndex, record: &FileRecord| {
        record.digest_or_try_init(|| {
            files_hashed += 1;
            hasher.hash_file(&index.absolute_path(candidate.path))
        })
    };

    let differs = digest_of(old, candidate.old)
        .map_err(|e| (Side::Old, e))
        .and_then(|old_digest| {
            digest_of(new, candidate.new)
                .map(|new_digest| old_digest != new_digest)
                .map_err(|e| (Side::New, e))
        });

    PairOutcome {
        differs,
        files_hashed,
    }
}
