//! Error handling for packfetch.
//!
//! Errors fall in two groups. Setup errors are returned while a
//! [`DownloadSession`](crate::session::DownloadSession) is being built and
//! abort the whole session before any worker starts. Task errors are
//! carried by a single [`CompletedDownload`](crate::download::CompletedDownload)
//! and never affect sibling tasks.
//!
//! Non-fatal hash inconsistencies are not errors at all; see
//! [`HashWarning`](crate::cache::HashWarning).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by external collaborators such as provider resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can happen when using packfetch.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// Captures unexpected failures that don't fit into other categories,
    /// such as a worker task panicking.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A URL could not be parsed or is missing where one is required.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The cache directory (or one of its fixed subdirectories) could not be created.
    #[error("Failed to create cache directory {path:?}")]
    CacheDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache index file exists but could not be parsed.
    #[error("Failed to parse cache index")]
    IndexParse {
        #[from]
        source: serde_json::Error,
    },

    /// The cache index was written by a newer version of packfetch.
    #[error("Cache index version {found} is newer than the supported version {supported}")]
    IncompatibleVersion { found: u32, supported: u32 },

    /// A mod declared a download mode that is neither `url` nor `metadata:<provider>`.
    #[error("Unknown download mode {mode:?} for {name}")]
    UnknownDownloadMode { name: String, mode: String },

    /// A mod uses `metadata:<provider>` but no resolver is registered for the provider.
    #[error("No resolver registered for provider {0:?}")]
    MissingResolver(String),

    /// A provider resolver failed to resolve its batch of mods.
    #[error("Resolver for provider {provider:?} failed: {source}")]
    Resolver {
        provider: String,
        #[source]
        source: BoxError,
    },

    /// A mod does not declare the hash used to look it up in the cache.
    #[error("{0} does not declare a hash")]
    MissingHash(String),

    /// A requested hash algorithm cannot be computed.
    #[error("Unsupported hash algorithm {0:?}")]
    UnsupportedHashAlgorithm(String),

    /// I/O Error.
    ///
    /// Wraps failures while creating temp files, copying into the cache or
    /// opening cached files.
    #[error("I/O error: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error from the HTTP middleware stack (retry, tracing).
    #[error("HTTP middleware error: {source}")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP status {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Freshly downloaded content does not match the hash the mod declared.
    #[error("{algorithm} hash mismatch: expected {expected}, got {actual}")]
    HashMismatch {
        algorithm: String,
        expected: String,
        actual: String,
    },

    /// A cached file's content no longer matches the digest it is stored under.
    #[error("Cached file {path:?} is corrupt: expected {expected}, got {actual}")]
    CorruptCacheEntry {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The session was cancelled before this task finished.
    #[error("Download cancelled")]
    Cancelled,
}

/// Result type alias for operations that can fail with a packfetch error.
pub type Result<T> = std::result::Result<T, Error>;
