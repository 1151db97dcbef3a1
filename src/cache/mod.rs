//! Persistent content-addressable cache.
//!
//! - [`index`] - the [`CacheIndex`] mapping hash values to cached files
//! - [`layout`] - the [`CacheLayout`] of files under a cache root

pub mod index;
pub mod layout;

pub use index::{CacheEntry, CacheIndex, HashWarning, Position, INDEX_VERSION};
pub use layout::CacheLayout;
