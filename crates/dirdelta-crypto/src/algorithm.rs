use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HasherError;

/// The digest algorithms this build can hash with.
///
/// Every variant produces a 256-bit digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl DigestAlgorithm {
    /// Every algorithm available in this build.
    pub const ALL: [DigestAlgorithm; 2] = [DigestAlgorithm::Blake3, DigestAlgorithm::Sha256];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blake3 => "blake3",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = HasherError;

    /// Resolve an algorithm by name. Anything outside [`DigestAlgorithm::ALL`]
    /// is `DigestUnavailable`; there is no weaker substitute.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "");
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == wanted)
            .ok_or_else(|| HasherError::DigestUnavailable(s.to_string()))
    }
}
