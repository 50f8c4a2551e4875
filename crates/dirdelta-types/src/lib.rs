//! Foundation types for dirdelta.
//!
//! Every other dirdelta crate depends on `dirdelta-types` for the join key
//! between two directory indexes and for the content fingerprint used to
//! confirm equality when sizes match.
//!
//! # Key Types
//!
//! - [`RelativePath`] -- Root-relative, `/`-separated file location
//! - [`ContentDigest`] -- 32-byte cryptographic fingerprint of file content

pub mod digest;
pub mod error;
pub mod path;

pub use digest::ContentDigest;
pub use error::TypeError;
pub use path::RelativePath;
