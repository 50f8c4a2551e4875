//! Root-relative file paths used as the join key between two indexes.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A file location relative to its tree root.
///
/// Stored as normal components joined with `/` whatever the host separator
/// is, so two indexes built from different absolute roots (or on different
/// platforms) produce identical keys for the same logical file. Never empty,
/// never absolute and never contains `..`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Normalize a filesystem path that is already relative to some root.
    ///
    /// `.` components are dropped. Root, prefix and `..` components are
    /// rejected, as are names that are not valid UTF-8.
    pub fn from_path(path: &Path) -> Result<Self, TypeError> {
        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => {
                    let name = name
                        .to_str()
                        .ok_or_else(|| TypeError::NonUtf8Path(path.display().to_string()))?;
                    parts.push(name);
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(invalid(path, "parent directory component"));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid(path, "path is absolute"));
                }
            }
        }
        if parts.is_empty() {
            return Err(invalid(path, "empty path"));
        }
        Ok(Self(parts.join("/")))
    }

    /// Strip `root` from `path` and normalize the remainder.
    pub fn from_root(root: &Path, path: &Path) -> Result<Self, TypeError> {
        let rel = path
            .strip_prefix(root)
            .map_err(|_| invalid(path, "path is outside the root"))?;
        Self::from_path(rel)
    }

    /// The normalized `/`-separated form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host-native path, suitable for joining onto a root directory.
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

fn invalid(path: &Path, reason: &'static str) -> TypeError {
    TypeError::InvalidPath {
        path: path.display().to_string(),
        reason,
    }
}

impl FromStr for RelativePath {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unified = unify_separators(s);
        if unified.starts_with('/') {
            return Err(TypeError::InvalidPath {
                path: s.to_string(),
                reason: "path is absolute",
            });
        }
        let mut parts = Vec::new();
        for part in unified.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    return Err(TypeError::InvalidPath {
                        path: s.to_string(),
                        reason: "parent directory component",
                    })
                }
                name => parts.push(name),
            }
        }
        if parts.is_empty() {
            return Err(TypeError::InvalidPath {
                path: s.to_string(),
                reason: "empty path",
            });
        }
        Ok(Self(parts.join("/")))
    }
}

/// On Windows `\` is a separator and is folded into `/`. Elsewhere it is an
/// ordinary filename byte, so it must survive a parse unchanged or keys
/// produced by [`RelativePath::from_path`] would not round-trip.
#[cfg(windows)]
fn unify_separators(s: &str) -> std::borrow::Cow<'_, str> {
    std::borrow::Cow::Owned(s.replace('\\', "/"))
}

#[cfg(not(windows))]
fn unify_separators(s: &str) -> std::borrow::Cow<'_, str> {
    std::borrow::Cow::Borrowed(s)
}

impl TryFrom<String> for RelativePath {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

impl fmt::Debug for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelativePath({:?})", self.0)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
