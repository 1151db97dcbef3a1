//! Packfetch acquires the files of a Minecraft modpack through a shared,
//! content-addressable cache.
//!
//! Mods declare where their bytes come from (a direct URL or a provider such
//! as CurseForge) and a hash. A [`DownloadSession`] resolves provider mods
//! into URLs, then a bounded pool of workers serves every file from the cache
//! or downloads it, hashing in a single streaming pass, and records every
//! known hash of the content in the cache index.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use packfetch::{ModFile, SessionBuilder, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let mods = vec![ModFile::from_url(
//!     "Sodium",
//!     "mods/sodium.jar",
//!     "https://cdn.modrinth.com/data/AANobbMI/versions/mc1.20.1-0.5.3/sodium.jar",
//!     "sha1",
//!     "0c4a05ebba0a38d3fc3e84e1b6bd2a1e6d82f0a6",
//! )];
//! let mut session = SessionBuilder::new().build(&mods).await?;
//! let mut results = session.start(4);
//! while let Some(done) = results.next().await {
//!     match done.error() {
//!         Some(e) => eprintln!("{}: {}", done.name(), e),
//!         None => println!("{} -> {:?}", done.name(), done.cache_path()),
//!     }
//! }
//! session.save_index().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`cache`] - The cache index and the on-disk layout of the cache directory
//! - [`download`] - Fetch tasks, manual downloads and completed results
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`hash`] - Supported hash algorithms and the streaming [`HashTee`]
//! - [`http`] - HTTP client construction and the [`Fetcher`] seam
//! - [`pipeline`] - The worker pool and its result stream
//! - [`progress`] - Progress bar options and display
//! - [`provider`] - Mod metadata and the provider resolver contract
//! - [`session`] - [`DownloadSession`] and its builder

pub mod cache;
pub mod download;
pub mod error;
pub mod hash;
pub mod http;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod session;

pub use cache::{CacheIndex, CacheLayout, HashWarning};
pub use download::{CompletedDownload, ContentRef, FetchTask, ManualDownload};
pub use error::{BoxError, Error, Result};
pub use hash::{HashAlgorithm, HashTee, CANONICAL_ALGORITHM};
pub use http::{create_http_client, Fetcher, FetchResponse, HttpClientConfig, HttpFetcher};
pub use pipeline::CompletedStream;
pub use progress::ProgressOptions;
pub use provider::{
    DownloadMode, ModDownload, ModFile, ProviderResolver, Resolution, ResolvedFile,
    ResolverRegistry,
};
pub use session::{default_cache_dir, DownloadSession, SessionBuilder, SessionConfig};
