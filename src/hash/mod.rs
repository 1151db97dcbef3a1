//! Hash algorithms and the streaming multi-hash verifier.
//!
//! - [`algorithm`] - the computable algorithms and the canonical cache algorithm
//! - [`tee`] - [`HashTee`], a single-pass digest accumulator with an optional copy sink

pub mod algorithm;
pub mod tee;

pub use algorithm::{HashAlgorithm, CANONICAL_ALGORITHM};
pub use tee::HashTee;

/// Normalizes a hash value for storage and comparison.
pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}
