//! Configuration structures and defaults for download sessions.

use crate::http::{Fetcher, HttpClientConfig};
use crate::progress::ProgressOptions;
use crate::provider::ResolverRegistry;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable overriding the default cache directory.
pub const CACHE_DIR_ENV: &str = "PACKFETCH_CACHE_DIR";

/// Default cache root: `$PACKFETCH_CACHE_DIR`, or `<user cache dir>/packfetch/cache`.
pub fn default_cache_dir() -> PathBuf {
    if let Some(dir) = env::var_os(CACHE_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("packfetch")
        .join("cache")
}

/// Configuration structure for a download session.
#[derive(Clone)]
pub struct SessionConfig {
    /// Root of the content-addressable cache.
    pub cache_dir: PathBuf,
    /// Hash algorithms to compute for every file, by name.
    pub hash_algorithms: Vec<String>,
    /// Resolvers for `metadata:<provider>` mods.
    pub resolvers: ResolverRegistry,
    /// Network seam; an [`HttpFetcher`](crate::http::HttpFetcher) built from `http` when unset.
    pub fetcher: Option<Arc<dyn Fetcher>>,
    /// Client settings for the default fetcher.
    pub http: HttpClientConfig,
    /// Progress bar settings.
    pub progress: ProgressOptions,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cache_dir", &self.cache_dir)
            .field("hash_algorithms", &self.hash_algorithms)
            .field("resolvers", &self.resolvers)
            .field("fetcher", &self.fetcher.is_some())
            .field("http", &self.http)
            .field("progress", &self.progress)
            .finish()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            hash_algorithms: Vec::new(),
            resolvers: ResolverRegistry::new(),
            fetcher: None,
            http: HttpClientConfig::default(),
            progress: ProgressOptions::default(),
        }
    }
}
