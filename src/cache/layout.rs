//! On-disk layout of the content-addressable cache.
//!
//! ```text
//! <root>/index.json          serialized cache index
//! <root>/temp/               scratch files for in-flight downloads
//! <root>/de/adbeef...        content, named by its canonical digest
//! ```

use crate::error::{Error, Result};

use std::path::{Path, PathBuf};
use tokio::fs;

/// Paths inside a cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// File name of the serialized index.
    pub const INDEX_FILE: &'static str = "index.json";
    /// Directory holding scratch files.
    pub const TEMP_DIR: &'static str = "temp";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(Self::INDEX_FILE)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(Self::TEMP_DIR)
    }

    /// Path of the content whose canonical digest is `digest`.
    ///
    /// The first two characters name the shard directory and the rest name
    /// the file, so `deadbeef` lives at `<root>/de/adbeef`.
    pub fn content_path(&self, digest: &str) -> PathBuf {
        if digest.len() > 2 && digest.is_char_boundary(2) {
            let (shard, rest) = digest.split_at(2);
            self.root.join(shard).join(rest)
        } else {
            self.root.join(digest)
        }
    }

    /// Creates the cache root and its scratch directory.
    pub async fn create(&self) -> Result<()> {
        for dir in [self.root.clone(), self.temp_dir()] {
            fs::create_dir_all(&dir)
                .await
                .map_err(|source| Error::CacheDirectory { path: dir, source })?;
        }
        Ok(())
    }
}
