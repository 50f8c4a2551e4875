use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dirdelta_diff::{CompareConfig, HashFailurePolicy};
use dirdelta_index::SymlinkPolicy;

#[derive(Parser)]
#[command(
    name = "dirdelta",
    about = "Compare two directory trees and list added, removed and modified files",
    version,
)]
pub struct Cli {
    /// The baseline directory
    pub old: PathBuf,
    /// The directory to compare against the baseline
    pub new: PathBuf,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with comparison settings; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Digest algorithm for same-size files (blake3, sha256)
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Read buffer size for hashing, in bytes
    #[arg(long)]
    pub chunk_size: Option<usize>,

    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Follow symbolic links instead of ignoring them
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Report unreadable same-size files as modified instead of failing
    #[arg(long)]
    pub treat_unreadable_as_modified: bool,

    /// Index both trees and hash candidates in parallel
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Start from the config file (or defaults) and apply flag overrides.
    pub fn resolve_config(&self) -> anyhow::Result<CompareConfig> {
        let mut config = match &self.config {
            Some(path) => CompareConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => CompareConfig::default(),
        };
        if let Some(algorithm) = &self.algorithm {
            config.algorithm = algorithm.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = Some(depth);
        }
        if self.follow_symlinks {
            config.symlinks = SymlinkPolicy::Follow;
        }
        if self.treat_unreadable_as_modified {
            config.on_hash_failure = HashFailurePolicy::TreatAsModified;
        }
        if self.parallel {
            config.parallel = true;
        }
        Ok(config)
    }
}
