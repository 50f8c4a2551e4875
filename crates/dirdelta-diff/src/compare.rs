//! Top-level entry points: index two roots, then diff them.

use std::path::Path;

use dirdelta_crypto::FileHasher;
use dirdelta_index::{check_root, Indexer};
use tracing::info;

use crate::config::CompareConfig;
use crate::differ::diff_indexes;
use crate::error::CompareResult;
use crate::result::ComparisonResult;

/// Compare two directory trees with the default configuration.
pub fn compare(old_root: &Path, new_root: &Path) -> CompareResult<ComparisonResult> {
    compare_with(old_root, new_root, &CompareConfig::default())
}

/// Compare two directory trees.
///
/// The hasher is built from `config` first, so an unavailable algorithm or
/// bad chunk size fails before either tree is touched.
pub fn compare_with(
    old_root: &Path,
    new_root: &Path,
    config: &CompareConfig,
) -> CompareResult<ComparisonResult> {
    let hasher = config.hasher()?;
    compare_using(old_root, new_root, config, &hasher)
}

/// Compare two directory trees, reading file content through `hasher`.
pub fn compare_using(
    old_root: &Path,
    new_root: &Path,
    config: &CompareConfig,
    hasher: &dyn FileHasher,
) -> CompareResult<ComparisonResult> {
    // Both roots are validated before either walk starts.
    check_root(old_root)?;
    check_root(new_root)?;

    let indexer = Indexer::new(config.index_options());
    let (old, new) = if config.parallel {
        rayon::join(|| indexer.index(old_root), || indexer.index(new_root))
    } else {
        (indexer.index(old_root), indexer.index(new_root))
    };
    let (old, new) = (old?, new?);

    let result = diff_indexes(&old, &new, hasher, &config.diff_options())?;
    info!(
        old = %old_root.display(),
        new = %new_root.display(),
        added = result.added().len(),
        removed = result.removed().len(),
        modified = result.modified().len(),
        files_hashed = result.stats().files_hashed,
        diagnostics = result.diagnostics().len(),
        "comparison complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use dirdelta_crypto::{ContentHasher, DigestAlgorithm};
    use dirdelta_types::{ContentDigest, RelativePath};
    use proptest::prelude::*;

    use crate::config::HashFailurePolicy;
    use crate::error::CompareError;
    use crate::result::{Change, Side};

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn rel(s: &str) -> RelativePath {
        s.parse().unwrap()
    }

    fn names(set: &std::collections::BTreeSet<RelativePath>) -> Vec<&str> {
        set.iter().map(RelativePath::as_str).collect()
    }

    /// Real hasher that counts how many files it read.
    struct CountingHasher {
        inner: ContentHasher,
        calls: AtomicUsize,
    }

    impl CountingHasher {
        fn new() -> Self {
            Self {
                inner: ContentHasher::default(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl FileHasher for CountingHasher {
        fn hash_file(&self, path: &Path) -> io::Result<ContentDigest> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.hash_file(path)
        }

        fn algorithm(&self) -> DigestAlgorithm {
            self.inner.algorithm()
        }
    }

    #[test]
    fn mixed_scenario() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "a.txt", b"hello");
        write(old.path(), "b.txt", b"0123456789");
        write(new.path(), "a.txt", b"hello");
        write(new.path(), "b.txt", b"9876543210");
        write(new.path(), "c.txt", b"abc");

        let result = compare(old.path(), new.path()).unwrap();
        assert_eq!(names(result.added()), vec!["c.txt"]);
        assert!(result.removed().is_empty());
        assert_eq!(names(result.modified()), vec!["b.txt"]);
        assert!(result.is_disjoint());
    }

    #[test]
    fn empty_old_everything_added() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(new.path(), "x.txt", b"x");
        write(new.path(), "nested/y.txt", b"yy");

        let result = compare(old.path(), new.path()).unwrap();
        assert_eq!(names(result.added()), vec!["nested/y.txt", "x.txt"]);
        assert!(result.removed().is_empty());
        assert!(result.modified().is_empty());
    }

    #[test]
    fn same_depth_add_and_remove_are_independent() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "dir/old_name.txt", b"same bytes");
        write(new.path(), "dir/new_name.txt", b"same bytes");

        let result = compare(old.path(), new.path()).unwrap();
        assert_eq!(names(result.removed()), vec!["dir/old_name.txt"]);
        assert_eq!(names(result.added()), vec!["dir/new_name.txt"]);
        assert!(result.modified().is_empty());
    }

    #[test]
    fn same_size_different_content_detected() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "data.bin", b"aaaa");
        write(new.path(), "data.bin", b"aaab");

        let result = compare(old.path(), new.path()).unwrap();
        assert_eq!(result.change_of(&rel("data.bin")), Some(Change::Modified));
        assert_eq!(result.stats().files_hashed, 2);
    }

    #[test]
    fn size_divergence_skips_hashing() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "out.log", b"short");
        write(new.path(), "out.log", b"much longer output");

        let hasher = CountingHasher::new();
        let result =
            compare_using(old.path(), new.path(), &CompareConfig::default(), &hasher).unwrap();
        assert_eq!(names(result.modified()), vec!["out.log"]);
        assert_eq!(hasher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reflexive_on_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", b"a");
        write(dir.path(), "sub/b.txt", b"bb");

        let result = compare(dir.path(), dir.path()).unwrap();
        assert!(!result.has_changes());
    }

    #[test]
    fn missing_root_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = compare(dir.path(), &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CompareError::InvalidInput { .. }));
    }

    #[test]
    fn unavailable_digest_fails_before_indexing() {
        let dir = tempfile::tempdir().unwrap();
        let config = CompareConfig {
            algorithm: "md5".into(),
            ..Default::default()
        };
        // The roots do not exist either; the digest error must win.
        let err = compare_with(
            &dir.path().join("a"),
            &dir.path().join("b"),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, CompareError::DigestUnavailable(_)));
    }

    #[test]
    fn huge_chunk_size_is_an_error_not_a_panic() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "same.txt", b"abcd");
        write(new.path(), "same.txt", b"abce");

        let config = CompareConfig {
            chunk_size: usize::MAX,
            ..Default::default()
        };
        let err = compare_with(old.path(), new.path(), &config).unwrap_err();
        assert!(matches!(err, CompareError::Config(_)));
    }

    #[test]
    fn sha256_gives_same_classification() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "a.txt", b"abcd");
        write(new.path(), "a.txt", b"abce");
        write(old.path(), "b.txt", b"same");
        write(new.path(), "b.txt", b"same");

        let config = CompareConfig {
            algorithm: "sha256".into(),
            ..Default::default()
        };
        let result = compare_with(old.path(), new.path(), &config).unwrap();
        assert_eq!(names(result.modified()), vec!["a.txt"]);
    }

    #[test]
    fn parallel_config_matches_default() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        for i in 0..20 {
            write(old.path(), &format!("f{i}.txt"), format!("{i:04}").as_bytes());
            let content = if i % 4 == 0 { format!("x{i:03}") } else { format!("{i:04}") };
            write(new.path(), &format!("f{i}.txt"), content.as_bytes());
        }

        let seq = compare(old.path(), new.path()).unwrap();
        let par = compare_with(
            old.path(),
            new.path(),
            &CompareConfig {
                parallel: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq.modified().len(), 5);
    }

    #[test]
    fn file_vanishing_before_hash_is_io_failure() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "a.txt", b"hello");
        write(new.path(), "a.txt", b"hello");

        let indexer = Indexer::default();
        let old_idx = indexer.index(old.path()).unwrap();
        let new_idx = indexer.index(new.path()).unwrap();
        fs::remove_file(new.path().join("a.txt")).unwrap();

        let hasher = ContentHasher::default();
        let err = diff_indexes(&old_idx, &new_idx, &hasher, &Default::default()).unwrap_err();
        match err {
            CompareError::IoFailure { root, path, .. } => {
                assert_eq!(root, new.path());
                assert_eq!(path, rel("a.txt"));
            }
            other => panic!("expected IoFailure, got {:?}", other),
        }

        let config = CompareConfig {
            on_hash_failure: HashFailurePolicy::TreatAsModified,
            ..Default::default()
        };
        let result = diff_indexes(&old_idx, &new_idx, &hasher, &config.diff_options()).unwrap();
        assert_eq!(names(result.modified()), vec!["a.txt"]);
        assert_eq!(result.diagnostics().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_ignored_on_both_sides_by_default() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "real.txt", b"data");
        write(new.path(), "real.txt", b"data");
        std::os::unix::fs::symlink(new.path().join("real.txt"), new.path().join("alias.txt"))
            .unwrap();

        let result = compare(old.path(), new.path()).unwrap();
        assert!(!result.has_changes());
        assert_eq!(result.stats().old_skipped, 0);
        assert_eq!(result.stats().new_skipped, 1);

        let follow = CompareConfig {
            symlinks: dirdelta_index::SymlinkPolicy::Follow,
            ..Default::default()
        };
        let result = compare_with(old.path(), new.path(), &follow).unwrap();
        assert_eq!(names(result.added()), vec!["alias.txt"]);
        assert_eq!(result.stats().new_skipped, 0);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_name_reported_against_its_side() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "a.txt", b"same");
        write(new.path(), "a.txt", b"same");
        fs::write(new.path().join(OsStr::from_bytes(b"caf\xe9.txt")), b"latin-1").unwrap();

        let result = compare(old.path(), new.path()).unwrap();
        assert!(!result.has_changes());
        assert_eq!(result.stats().new_files, 1);
        assert_eq!(result.diagnostics().len(), 1);
        assert_eq!(result.diagnostics()[0].side, Side::New);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["diagnostics"][0]["side"], "new");
        assert!(json["diagnostics"][0]["path"]
            .as_str()
            .unwrap()
            .ends_with("caf\u{fffd}.txt"));
    }

    /// A generated tree: relative path to file content.
    fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
        prop::collection::btree_map(
            prop::sample::select(vec![
                "a.txt", "b.txt", "c.bin", "dir/a.txt", "dir/d.log", "dir/sub/e.txt",
            ])
            .prop_map(String::from),
            prop::collection::vec(0u8..4, 0..6),
            0..6,
        )
    }

    fn materialize(tree: &BTreeMap<String, Vec<u8>>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in tree {
            write(dir.path(), path, content);
        }
        dir
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn reflexive(tree in tree_strategy()) {
            let dir = materialize(&tree);
            let copy = materialize(&tree);
            let result = compare(dir.path(), copy.path()).unwrap();
            prop_assert!(!result.has_changes());
        }

        #[test]
        fn antisymmetric_and_disjoint(a in tree_strategy(), b in tree_strategy()) {
            let (da, db) = (materialize(&a), materialize(&b));
            let ab = compare(da.path(), db.path()).unwrap();
            let ba = compare(db.path(), da.path()).unwrap();
            prop_assert_eq!(ab.added(), ba.removed());
            prop_assert_eq!(ab.removed(), ba.added());
            prop_assert_eq!(ab.modified(), ba.modified());
            prop_assert!(ab.is_disjoint());

            for path in a.keys().chain(b.keys()) {
                let expected = match (a.get(path), b.get(path)) {
                    (Some(_), None) => Some(Change::Removed),
                    (None, Some(_)) => Some(Change::Added),
                    (Some(x), Some(y)) if x != y => Some(Change::Modified),
                    _ => None,
                };
                prop_assert_eq!(ab.change_of(&rel(path)), expected);
            }
        }
    }
}
