//! Supported hash algorithms and their digest accumulators.
//!
//! Algorithm identifiers are plain strings on the wire (`"sha1"`,
//! `"sha256"`, ...). Only the algorithms listed in [`HashAlgorithm`] can be
//! computed; any other identifier (for example a provider fingerprint such
//! as `murmur2`) is stored and matched opaquely.

use crate::error::Error;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

/// The algorithm whose digest decides where content lives in the cache.
pub const CANONICAL_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

/// A hash algorithm packfetch knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashAlgorithm {
    /// SHA-1, used by Modrinth and most pack formats.
    Sha1,
    /// SHA-256, the canonical cache algorithm.
    Sha256,
    /// SHA-512, reported by Modrinth.
    Sha512,
    /// MD5, reported by some providers.
    Md5,
    /// Pseudo-algorithm reporting the content length in bytes as a decimal string.
    LengthBytes,
}

impl HashAlgorithm {
    /// Every computable algorithm.
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Md5,
        HashAlgorithm::LengthBytes,
    ];

    /// The identifier used in the cache index and in mod metadata.
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::LengthBytes => "length-bytes",
        }
    }

    /// Look up an algorithm by identifier, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(name))
    }

    pub(crate) fn hasher(&self) -> Hasher {
        match self {
            HashAlgorithm::Sha1 => Hasher::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => Hasher::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Hasher::Sha512(Sha512::new()),
            HashAlgorithm::Md5 => Hasher::Md5(Md5::new()),
            HashAlgorithm::LengthBytes => Hasher::Length(0),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnsupportedHashAlgorithm(s.to_string()))
    }
}

/// A running digest for one algorithm.
pub(crate) enum Hasher {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    Md5(Md5),
    Length(u64),
}

impl Hasher {
    pub(crate) fn update(&mut self, data: &[u8]) {
        match self {
            Hasher::Sha1(h) => h.update(data),
            Hasher::Sha256(h) => h.update(data),
            Hasher::Sha512(h) => h.update(data),
            Hasher::Md5(h) => h.update(data),
            Hasher::Length(n) => *n += data.len() as u64,
        }
    }

    /// Lowercase hex digest, or the decimal length for [`HashAlgorithm::LengthBytes`].
    pub(crate) fn finalize(self) -> String {
        match self {
            Hasher::Sha1(h) => hex::encode(h.finalize()),
            Hasher::Sha256(h) => hex::encode(h.finalize()),
            Hasher::Sha512(h) => hex::encode(h.finalize()),
            Hasher::Md5(h) => hex::encode(h.finalize()),
            Hasher::Length(n) => n.to_string(),
        }
    }
}
