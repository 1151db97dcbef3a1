//! Builder for [`DownloadSession`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use packfetch::provider::ModFile;
//! use packfetch::session::SessionBuilder;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), packfetch::Error> {
//! let mods = vec![ModFile::from_url(
//!     "Sodium",
//!     "mods/sodium.jar",
//!     "https://cdn.modrinth.com/data/AANobbMI/versions/mc1.20.1-0.5.3/sodium.jar",
//!     "sha1",
//!     "0c4a05ebba0a38d3fc3e84e1b6bd2a1e6d82f0a6",
//! )];
//! let session = SessionBuilder::new()
//!     .cache_dir(PathBuf::from(".cache/packfetch"))
//!     .hash_algorithm("sha512")
//!     .build(&mods)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use super::{config::SessionConfig, session::DownloadSession};
use crate::error::Result;
use crate::http::{Fetcher, HttpClientConfig};
use crate::progress::ProgressOptions;
use crate::provider::{ModFile, ProviderResolver};

use std::{path::PathBuf, sync::Arc};

/// A builder used to create a [`DownloadSession`].
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        SessionBuilder::default()
    }

    /// Sets the root of the content-addressable cache.
    pub fn cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.config.cache_dir = cache_dir;
        self
    }

    /// Requests an additional hash algorithm for every file.
    ///
    /// Names are validated when the session is built.
    pub fn hash_algorithm(mut self, algorithm: &str) -> Self {
        self.config.hash_algorithms.push(algorithm.to_string());
        self
    }

    /// Requests several additional hash algorithms.
    pub fn hash_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .hash_algorithms
            .extend(algorithms.into_iter().map(Into::into));
        self
    }

    /// Registers the resolver for `metadata:<provider>` mods.
    pub fn resolver(mut self, provider: &str, resolver: Arc<dyn ProviderResolver>) -> Self {
        self.config.resolvers.register(provider, resolver);
        self
    }

    /// Replaces the network layer.
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.config.fetcher = Some(fetcher);
        self
    }

    /// Sets the client settings used when no custom fetcher is given.
    pub fn http_config(mut self, http: HttpClientConfig) -> Self {
        self.config.http = http;
        self
    }

    /// Sets the progress bar options.
    pub fn progress(mut self, progress: ProgressOptions) -> Self {
        self.config.progress = progress;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resolves `mods` into fetch tasks and prepares the cache.
    pub async fn build(self, mods: &[ModFile]) -> Result<DownloadSession> {
        DownloadSession::new(self.config, mods).await
    }
}
